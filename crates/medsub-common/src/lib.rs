//! Shared utilities for the medication substitution crates.
//!
//! This crate provides the text normalization used to compare medication
//! names, compositions, indications and clinical notes.

pub mod text;

// Re-export commonly used functions at crate root for convenience
pub use text::{
    component_count, contains_word, fold, keywords, normalize_text, principal_component, tokens,
};
