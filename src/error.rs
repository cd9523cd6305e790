//! Error handling for AuraLynx
//!
//! Every error carries a stable code and, where it makes sense, a list of
//! recovery suggestions the request layer can surface to the user.

use thiserror::Error;

/// Result type alias for AuraLynx operations
pub type Result<T> = std::result::Result<T, AuraError>;

/// Main error type for AuraLynx operations
#[derive(Error, Debug)]
pub enum AuraError {
    // Input Errors
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // Synthesis Errors
    #[error("Synthesis failed during {stage}: {details}")]
    SynthesisFailure { stage: String, details: String },

    // Provider Errors
    #[error("Provider '{provider}' is unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("Provider '{provider}' failed: {reason}")]
    ProviderFailed { provider: String, reason: String },

    #[error("No {capability} provider succeeded ({} attempted)", attempts.len())]
    AllProvidersFailed {
        capability: String,
        attempts: Vec<String>,
    },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Configuration / Storage Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Song store error: {reason}")]
    Store { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<hound::Error> for AuraError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => AuraError::Io(io),
            other => AuraError::InvalidAudio {
                reason: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl AuraError {
    /// Shorthand for an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AuraError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for a `SynthesisFailure` error
    pub fn synthesis(stage: impl Into<String>, details: impl Into<String>) -> Self {
        AuraError::SynthesisFailure {
            stage: stage.into(),
            details: details.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AuraError::InvalidInput { .. } => "INVALID_INPUT",
            AuraError::SynthesisFailure { .. } => "SYNTHESIS_FAILURE",
            AuraError::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            AuraError::ProviderFailed { .. } => "PROVIDER_FAILED",
            AuraError::AllProvidersFailed { .. } => "ALL_PROVIDERS_FAILED",
            AuraError::FileNotFound { .. } => "FILE_NOT_FOUND",
            AuraError::InvalidAudio { .. } => "INVALID_AUDIO",
            AuraError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AuraError::Config { .. } => "CONFIG_ERROR",
            AuraError::Store { .. } => "STORE_ERROR",
            AuraError::Io(_) => "IO_ERROR",
            AuraError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether a caller may retry with another provider or corrected input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuraError::InvalidInput { .. }
                | AuraError::ProviderUnavailable { .. }
                | AuraError::ProviderFailed { .. }
                | AuraError::FileNotFound { .. }
                | AuraError::InvalidAudio { .. }
                | AuraError::UnsupportedFormat { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AuraError::InvalidInput { .. } => vec![
                "Check that all required fields are provided",
                "Durations must be finite and not negative",
            ],
            AuraError::SynthesisFailure { .. } => vec![
                "Use one of the built-in genres",
                "Try a shorter duration",
            ],
            AuraError::ProviderUnavailable { .. } | AuraError::ProviderFailed { .. } => vec![
                "Check the provider API token and URL",
                "The offline synthesizer will be used when no provider succeeds",
            ],
            AuraError::AllProvidersFailed { .. } => vec![
                "Configure at least one reachable provider",
                "Check network connectivity",
            ],
            AuraError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Temporary audio may have been pruned - generate it again",
            ],
            AuraError::InvalidAudio { .. } | AuraError::UnsupportedFormat { .. } => vec![
                "Convert the file to WAV first",
                "Supported input: PCM or float WAV, mono or stereo",
            ],
            AuraError::Config { .. } => vec![
                "Check AURALYNX_* environment variables",
                "Durations and timeouts must be positive",
            ],
            _ => vec![],
        }
    }
}
