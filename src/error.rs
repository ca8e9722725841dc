use thiserror::Error;

/// Message shown to end users for any failed analysis. Consumers render one
/// error panel; the variant-level detail is for logs and operators.
pub const USER_FACING_FAILURE: &str =
    "Failed to generate report. Please check your API key and try again.";

/// Every failure mode of one analysis invocation, classified at the client
/// boundary. Nothing else crosses it: internal errors are mapped into one
/// of these four before a caller sees them.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Required credential missing or configuration unloadable. Raised
    /// before any network activity; not retryable without operator
    /// intervention.
    #[error("analysis configuration error: {0}")]
    Configuration(String),

    /// Network failure or non-success response from the analysis service.
    #[error("failed to communicate with the analysis service: {0}")]
    Transport(String),

    /// Service reached but returned no usable payload. Distinct from a
    /// transport failure: the model produced a non-answer.
    #[error("analysis service returned an empty response")]
    EmptyResponse,

    /// Payload present but not valid JSON, or JSON that does not conform
    /// to the response schema.
    #[error("analysis response did not match the expected shape: {0}")]
    MalformedResponse(String),
}

impl AnalysisError {
    /// The single user-facing failure string. From the user's perspective
    /// every variant means "no usable report"; only logs distinguish them.
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FAILURE
    }

    /// Whether the failure happened before the request left the process.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Configuration(_))
    }
}
