//! Substitute recommendation engine.
//!
//! Scores the substitutes recorded for a resolved medication against a
//! patient's notes, diagnosis and substitution reason, and falls back to a
//! catalog-wide search for alternatives when none passes.

pub mod allergy;
pub mod alternatives;
pub mod options;
pub mod pipeline;
pub mod ranking;
pub mod scorer;
pub mod symptoms;

pub use allergy::{
    ALLERGEN_FAMILIES, AllergenFamily, AllergyEvidence, AllergyMatch, check as check_allergy,
    shared_family,
};
pub use alternatives::AlternativeSearch;
pub use options::{DiagnosisSynonyms, EngineOptions, ScoringWeights};
pub use pipeline::{
    COMPOSITION_NOT_FOUND, EFFECTS_NOT_AVAILABLE, Engine, composition_for, effects_for,
    local_name_for, resolve_and_score,
};
pub use ranking::rank;
pub use scorer::{PatientProfile, Scorer, score};
