/// Message shown in place of a result when the analysis stream fails
pub const ANALYSIS_FAILED_MESSAGE: &str = "An error occurred during analysis.";

/// Message shown when an analysis request is made with blank input
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze.";

/// Visionary error types
#[derive(Debug, thiserror::Error)]
pub enum VisionaryError {
    /// The provider's fragment sequence raised before completion
    #[error("Provider stream error: {0}")]
    ProviderStream(String),

    /// Blank input where text is required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Persisted storage read/write/decode failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VisionaryError {
    /// Create provider stream error
    pub fn provider_stream<S: Into<String>>(msg: S) -> Self {
        Self::ProviderStream(msg.into())
    }

    /// Create empty input error
    pub fn empty_input<S: Into<String>>(msg: S) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Create storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// User-facing text (what the CLI prints instead of the debug chain)
impl VisionaryError {
    /// Get the message shown to the user for this error
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderStream(_) | Self::Network(_) => ANALYSIS_FAILED_MESSAGE.to_string(),
            Self::EmptyInput(_) => EMPTY_INPUT_MESSAGE.to_string(),
            Self::Storage(msg) => format!("Could not save your changes: {}", msg),
            Self::NotFound(what) => format!("Nothing found for {}", what),
            other => other.to_string(),
        }
    }

    /// Whether the error came from the persisted storage collaborator
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_stream_failure() {
        let err = VisionaryError::provider_stream("connection reset");
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert_eq!(err.to_string(), "Provider stream error: connection reset");
    }

    #[test]
    fn test_user_message_for_empty_input() {
        let err = VisionaryError::empty_input("analysis text");
        assert_eq!(err.user_message(), EMPTY_INPUT_MESSAGE);
    }

    #[test]
    fn test_storage_classification() {
        assert!(VisionaryError::storage("quota exceeded").is_storage());
        assert!(!VisionaryError::internal("boom").is_storage());
    }
}
