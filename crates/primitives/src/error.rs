//! Errors surfaced by the sponsored transaction flow

use thiserror::Error;

/// Gasless flow errors
///
/// Nothing is retried internally. The variants only tag where a failure came from so the
/// caller can decide whether to fix its input or retry later.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GaslessError {
    /// Owners or threshold can't form a valid Safe (caller error, not retryable)
    #[error("invalid configuration: {inner}")]
    InvalidConfiguration {
        /// The inner error message
        inner: String,
    },

    /// A network read (code, nonce, chain id, creation code) didn't complete (retryable)
    #[error("resolution unavailable: {inner}")]
    ResolutionUnavailable {
        /// The inner error message
        inner: String,
    },

    /// Transaction intent is malformed or can't be ABI-encoded (caller error)
    #[error("encoding error: {inner}")]
    Encoding {
        /// The inner error message
        inner: String,
    },

    /// Signer can't produce EIP-712 typed data signatures (caller error)
    #[error("unsupported signer {signer:?}: typed data signing is not available")]
    UnsupportedSigner {
        /// The signer's address
        signer: String,
    },

    /// Signer supports typed data but failed to produce a signature
    #[error("signing error: {inner}")]
    Signing {
        /// The inner error message
        inner: String,
    },

    /// Relay service refused the submission, message is kept verbatim
    #[error("relay rejected: {inner}")]
    RelayRejected {
        /// The relay's diagnostic message
        inner: String,
    },
}

impl GaslessError {
    /// Whether a caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResolutionUnavailable { .. })
    }

    pub fn invalid_configuration(inner: impl Into<String>) -> Self {
        Self::InvalidConfiguration { inner: inner.into() }
    }

    pub fn resolution_unavailable(inner: impl Into<String>) -> Self {
        Self::ResolutionUnavailable { inner: inner.into() }
    }

    pub fn encoding(inner: impl Into<String>) -> Self {
        Self::Encoding { inner: inner.into() }
    }
}
