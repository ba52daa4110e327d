use thiserror::Error;

/// Main error type for the claim client
#[derive(Error, Debug)]
pub enum ClaimError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Precondition errors, raised before any remote call is made
    #[error("Validation failed: {0}")]
    Validation(String),

    // Reward service answered with `success: false`
    #[error("Rejected by reward service: {0}")]
    RemoteRejection(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Wallet not tracked: {0}")]
    NotFound(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Crypto/signing errors
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Signature error: {0}")]
    Signature(String),

    // On-chain errors
    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Address parsing error: {0}")]
    AddressParsing(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ClaimError {
    /// Whether the user can repeat the same step without redoing earlier ones.
    ///
    /// Every failure is recoverable at the session level; this only answers
    /// whether an identical retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClaimError::RemoteRejection(_)
                | ClaimError::Transport(_)
                | ClaimError::Signature(_)
                | ClaimError::Contract(_)
                | ClaimError::Other(_)
        )
    }
}

/// Result type alias for ClaimError
pub type Result<T> = std::result::Result<T, ClaimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClaimError::RemoteRejection("busy".into()).is_retryable());
        assert!(ClaimError::Contract("reverted".into()).is_retryable());
        assert!(!ClaimError::Validation("missing signature".into()).is_retryable());
        assert!(!ClaimError::NotFound("0xabc".into()).is_retryable());
    }

    #[test]
    fn test_display_includes_reason() {
        let err = ClaimError::RemoteRejection("wallet already registered".into());
        assert_eq!(
            err.to_string(),
            "Rejected by reward service: wallet already registered"
        );
    }
}
