//! Medication resolution: maps a free-text query to one catalog record.

pub mod engine;
pub mod patterns;

pub use engine::{DEFAULT_FUZZY_THRESHOLD, MedicationResolver, NameSimilarity, resolve};
pub use patterns::{QUERY_STOP_WORDS, query_keywords};
