//! Per-query patient context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why the current medication has to be replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionReason {
    /// The patient reacted to the current medication.
    Allergy,
    /// The current medication is out of stock.
    Shortage,
    #[default]
    Unspecified,
}

impl SubstitutionReason {
    /// Parses English or Spanish reason names, or the menu numbers `1`/`2`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "allergy" | "alergia" | "1" => Some(Self::Allergy),
            "shortage" | "desabastecimiento" | "2" => Some(Self::Shortage),
            "unspecified" | "none" | "" => Some(Self::Unspecified),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Allergy => "allergy",
            Self::Shortage => "shortage",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for SubstitutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clinical context for one recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    /// Free-text notes: symptoms, history and stated allergies.
    pub notes: String,
    pub diagnosis: String,
    pub reason: SubstitutionReason,
}

impl PatientContext {
    pub fn new(
        notes: impl Into<String>,
        diagnosis: impl Into<String>,
        reason: SubstitutionReason,
    ) -> Self {
        Self {
            notes: notes.into(),
            diagnosis: diagnosis.into(),
            reason,
        }
    }

    /// Builds the context from separately collected note sections.
    ///
    /// Notes are laid out as `Symptoms: ..`, `History: ..` and `Allergies: ..`
    /// on separate lines; an empty allergy field is written as `none`.
    pub fn from_parts(
        symptoms: &str,
        history: &str,
        allergies: &str,
        diagnosis: impl Into<String>,
        reason: SubstitutionReason,
    ) -> Self {
        let allergies = match allergies.trim() {
            "" => "none",
            value => value,
        };
        let notes = format!(
            "Symptoms: {}\nHistory: {}\nAllergies: {}",
            symptoms.trim(),
            history.trim(),
            allergies
        );
        Self::new(notes, diagnosis, reason)
    }
}
