//! Scored candidates and their justification trail.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Score returned for a candidate the catalog knows nothing about.
pub const NOT_FOUND_SCORE: f64 = -5.0;

/// Lower bound of the clamped score range.
pub const MIN_SCORE: f64 = 0.0;

/// Upper bound of the clamped score range.
pub const MAX_SCORE: f64 = 10.0;

/// One scoring criterion that fired for a candidate.
///
/// Variants are appended in scoring order; the order is part of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Justification {
    /// The candidate has no catalog record.
    InformationNotFound,
    ExcellentReview,
    GoodReview,
    SamePrincipalComponent,
    DifferentComponent,
    ComponentUnidentified,
    ClassAndIndicationMatch { diagnosis: String },
    NotIndicated { diagnosis: String },
    /// Indicated for the diagnosis, but the therapeutic class differs.
    IndicatedOtherClass { diagnosis: String },
    /// No diagnosis was given, so indication was not assessed.
    NoDiagnosis,
    SameChemicalClass,
    IndicatedSpecifically { diagnosis: String },
    GeneralUseMatch { diagnosis: String },
    SevereReactionRisk,
    MildIrritationRisk,
    /// The patient's notes mention an allergen present in the composition.
    AllergyDetected { allergen: String },
    /// Current drug and candidate belong to the same allergenic family.
    CrossReactivity { family: String },
    DifferentFamily,
    PartiallySimilarComposition,
    DifferentComposition,
    /// Side effects overlapping with the patient's reported symptoms.
    MayAggravateSymptoms { symptoms: Vec<String> },
}

/// How a justification reads to the clinician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Favorable,
    Neutral,
    Caution,
}

impl Justification {
    pub fn message(&self) -> String {
        match self {
            Self::InformationNotFound => "information not found".to_string(),
            Self::ExcellentReview => "excellent review score (>=80)".to_string(),
            Self::GoodReview => "good review score (50-79)".to_string(),
            Self::SamePrincipalComponent => "same principal component".to_string(),
            Self::DifferentComponent => {
                "different component, comparable therapeutic function".to_string()
            }
            Self::ComponentUnidentified => {
                "principal component could not be identified".to_string()
            }
            Self::ClassAndIndicationMatch { diagnosis } => {
                format!("same therapeutic class and indicated for {diagnosis}")
            }
            Self::NotIndicated { diagnosis } => format!("not indicated for {diagnosis}"),
            Self::IndicatedOtherClass { diagnosis } => {
                format!("indicated for {diagnosis}, different therapeutic class")
            }
            Self::NoDiagnosis => "no diagnosis given, indication not assessed".to_string(),
            Self::SameChemicalClass => "same chemical class".to_string(),
            Self::IndicatedSpecifically { diagnosis } => {
                format!("specifically indicated for {diagnosis}")
            }
            Self::GeneralUseMatch { diagnosis } => {
                format!("general uses include {diagnosis}")
            }
            Self::SevereReactionRisk => "risk of severe reaction".to_string(),
            Self::MildIrritationRisk => "may cause mild irritation".to_string(),
            Self::AllergyDetected { allergen } => format!("allergy detected: {allergen}"),
            Self::CrossReactivity { family } => format!(
                "possible cross-reactivity within the {family} family, clinician review required"
            ),
            Self::DifferentFamily => "different pharmacological family".to_string(),
            Self::PartiallySimilarComposition => "partially similar composition".to_string(),
            Self::DifferentComposition => "different composition".to_string(),
            Self::MayAggravateSymptoms { symptoms } => {
                format!("could aggravate symptoms: {}", symptoms.join(", "))
            }
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::ExcellentReview
            | Self::GoodReview
            | Self::SamePrincipalComponent
            | Self::ClassAndIndicationMatch { .. }
            | Self::SameChemicalClass
            | Self::IndicatedSpecifically { .. }
            | Self::GeneralUseMatch { .. }
            | Self::DifferentFamily
            | Self::PartiallySimilarComposition => Tone::Favorable,
            Self::DifferentComponent
            | Self::NotIndicated { .. }
            | Self::IndicatedOtherClass { .. }
            | Self::DifferentComposition => Tone::Neutral,
            Self::InformationNotFound
            | Self::ComponentUnidentified
            | Self::NoDiagnosis
            | Self::SevereReactionRisk
            | Self::MildIrritationRisk
            | Self::AllergyDetected { .. }
            | Self::CrossReactivity { .. }
            | Self::MayAggravateSymptoms { .. } => Tone::Caution,
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrigin {
    /// Listed in the substitute table for the current drug.
    DirectSubstitute,
    /// Found through the diagnosis-indication search.
    Diagnosis,
    /// Found through the therapeutic-class search.
    TherapeuticClass,
}

impl SearchOrigin {
    /// Tie-break priority; higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Diagnosis => 2,
            Self::TherapeuticClass => 1,
            Self::DirectSubstitute => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DirectSubstitute => "substitute",
            Self::Diagnosis => "diagnosis",
            Self::TherapeuticClass => "class",
        }
    }
}

impl fmt::Display for SearchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Valid,
    AllergyRejected,
    DataMissing,
}

impl CandidateStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::AllergyRejected => "allergy",
            Self::DataMissing => "no data",
        }
    }
}

/// A candidate with its score and the criteria that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Canonical name as queried.
    pub name: String,
    /// Local-language name, when known.
    pub local_name: Option<String>,
    pub score: f64,
    pub justifications: Vec<Justification>,
    pub origin: SearchOrigin,
}

impl ScoredCandidate {
    /// The "information not found" outcome.
    pub fn not_found(name: impl Into<String>, origin: SearchOrigin) -> Self {
        Self {
            name: name.into(),
            local_name: None,
            score: NOT_FOUND_SCORE,
            justifications: vec![Justification::InformationNotFound],
            origin,
        }
    }

    pub fn status(&self) -> CandidateStatus {
        let mut status = CandidateStatus::Valid;
        for justification in &self.justifications {
            match justification {
                Justification::InformationNotFound => return CandidateStatus::DataMissing,
                Justification::AllergyDetected { .. } => status = CandidateStatus::AllergyRejected,
                _ => {}
            }
        }
        status
    }

    pub fn is_valid(&self) -> bool {
        self.status() == CandidateStatus::Valid
    }

    /// Name shown to the clinician: the local name when present.
    pub fn display_name(&self) -> &str {
        self.local_name.as_deref().unwrap_or(&self.name)
    }

    /// Justification messages joined by `", "`.
    pub fn justification_text(&self) -> String {
        self.justifications
            .iter()
            .map(Justification::message)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of symptom names in the "could aggravate symptoms" fragment.
    pub fn symptom_warning_count(&self) -> usize {
        self.justifications
            .iter()
            .find_map(|justification| match justification {
                Justification::MayAggravateSymptoms { symptoms } => Some(symptoms.len()),
                _ => None,
            })
            .unwrap_or(0)
    }
}
