//! Data model for the medication substitution engine.
//!
//! Holds the read-only catalog, the per-query patient context and the
//! result types handed back to callers.

pub mod allergen;
pub mod candidate;
pub mod catalog;
pub mod error;
pub mod medication;
pub mod patient;
pub mod recommendation;
pub mod substitute;

pub use allergen::{AllergenList, AllergenTerm};
pub use candidate::{
    CandidateStatus, Justification, MAX_SCORE, MIN_SCORE, NOT_FOUND_SCORE, ScoredCandidate,
    SearchOrigin, Tone,
};
pub use catalog::{Catalog, CatalogEntry, NormalizedRecord};
pub use error::{MedsubError, Result};
pub use medication::MedicationRecord;
pub use patient::{PatientContext, SubstitutionReason};
pub use recommendation::{
    MatchStage, Recommendation, RecommendationResult, RecommendationSource, ResolvedMedication,
};
pub use substitute::{MAX_SUBSTITUTES, SubstituteEntry, SubstitutePair, SubstituteTable};
