//! Error taxonomy for the enhancement pipeline

use thiserror::Error;

/// Classified failures surfaced by the enhancement pipeline.
///
/// Callers branch on these kinds; each carries a stable human-readable
/// message suitable for direct display.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// The selected provider requires credentials that are absent or invalid
    #[error("enhancement provider is not configured: missing or invalid API key")]
    NotConfigured,

    /// The provider returned a malformed or unparseable payload
    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),

    /// Generic processing failure not otherwise classified
    #[error("enhancement failed: {0}")]
    EnhancementFailed(String),

    /// Transport-level failure: timeout, connection refused, DNS, TLS
    #[error("network error: {0}")]
    Network(String),

    /// Provider-specific error surfaced with its original description
    #[error("{0}")]
    Custom(String),
}

impl EnhanceError {
    /// Classify a reqwest transport error into the taxonomy.
    ///
    /// Timeouts and connection failures map to `Network`; body decoding
    /// problems map to `InvalidResponse`; everything else is `Custom`.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnhanceError::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            EnhanceError::Network(format!("connection failed: {}", err))
        } else if err.is_decode() {
            EnhanceError::InvalidResponse(err.to_string())
        } else {
            EnhanceError::Custom(err.to_string())
        }
    }

    /// Wrap an unclassified error, preserving its description.
    pub fn custom(err: impl std::fmt::Display) -> Self {
        EnhanceError::Custom(err.to_string())
    }
}
