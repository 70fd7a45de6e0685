use thiserror::Error;

/// Errors produced by an analysis run. A run fails as a unit: any extractor
/// or collaborator failure aborts the whole report.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The post batch or profile failed validation before any processing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The text-classification collaborator could not be reached or timed out.
    #[error("classification service unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// The collaborator answered, but the payload does not match the
    /// expected taxonomy schema. The raw payload is logged, not surfaced.
    #[error("classification service returned a malformed response: {0}")]
    CollaboratorMalformed(String),
}
