use thiserror::Error;

/// Terminal outcomes surfaced to callers of the engine and its loaders.
///
/// Missing candidate data and allergy rejections are not errors; they are
/// scoring outcomes carried by [`crate::ScoredCandidate`].
#[derive(Debug, Error)]
pub enum MedsubError {
    /// The query matched no catalog record through any resolution stage.
    #[error("medication not found: {query}")]
    ResolutionFailure { query: String },
    /// Neither direct substitutes nor alternatives produced a valid option.
    #[error("no valid substitute or alternative found for {medication}")]
    NoOptions { medication: String },
    /// A dataset file lacks a required column.
    #[error("missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

impl MedsubError {
    /// True when the error means the medication query could not be resolved.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::ResolutionFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, MedsubError>;
