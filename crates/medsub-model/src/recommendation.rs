//! Resolution and recommendation results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::ScoredCandidate;
use crate::error::{MedsubError, Result};
use crate::patient::SubstitutionReason;

/// Resolver stage that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    ExactComposition,
    ExactName,
    Keyword,
    Fuzzy,
}

impl MatchStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactComposition => "exact composition",
            Self::ExactName => "exact name",
            Self::Keyword => "keyword",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The current medication after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMedication {
    /// Canonical catalog name.
    pub name: String,
    /// Local-language name, or the canonical name when none is recorded.
    pub local_name: String,
    pub composition: String,
    pub therapeutic_class: Option<String>,
    pub chemical_class: Option<String>,
    pub review_excellent: f64,
    /// Normalized principal component.
    pub principal_component: String,
    pub stage: MatchStage,
}

/// Which list the final recommendation was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    DirectSubstitute,
    Alternative,
}

impl RecommendationSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DirectSubstitute => "direct substitute",
            Self::Alternative => "therapeutic alternative",
        }
    }
}

/// The single best option for the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate: ScoredCandidate,
    pub source: RecommendationSource,
}

/// Everything produced for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub current: ResolvedMedication,
    pub reason: SubstitutionReason,
    /// Ranked direct substitutes, rejected ones included.
    pub substitutes: Vec<ScoredCandidate>,
    /// Direct substitutes that passed, in rank order.
    pub valid: Vec<ScoredCandidate>,
    /// Ranked alternatives; empty whenever `valid` is not.
    pub alternatives: Vec<ScoredCandidate>,
}

impl RecommendationResult {
    /// First valid substitute, else the first valid alternative.
    pub fn best(&self) -> Option<Recommendation> {
        if let Some(candidate) = self.valid.first() {
            return Some(Recommendation {
                candidate: candidate.clone(),
                source: RecommendationSource::DirectSubstitute,
            });
        }
        self.alternatives
            .iter()
            .find(|candidate| candidate.is_valid())
            .map(|candidate| Recommendation {
                candidate: candidate.clone(),
                source: RecommendationSource::Alternative,
            })
    }

    /// Like [`Self::best`], failing with [`MedsubError::NoOptions`].
    pub fn into_recommendation(self) -> Result<Recommendation> {
        self.best().ok_or(MedsubError::NoOptions {
            medication: self.current.name,
        })
    }

    /// Direct substitutes that did not pass.
    pub fn rejected(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.substitutes.iter().filter(|candidate| !candidate.is_valid())
    }
}
