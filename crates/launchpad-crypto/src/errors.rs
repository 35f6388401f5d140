//! Crypto errors.

use thiserror::Error;

/// Crypto error.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Jwt creation error: {source}")]
    JwtCreationFailed { source: jsonwebtoken::errors::Error },
    #[error("Jwt verification error: {source}")]
    JwtVerificationFailed { source: jsonwebtoken::errors::Error },
    #[error("Invalid encoding key: {source}")]
    InvalidEncodingKey { source: jsonwebtoken::errors::Error },
    #[error("Invalid signature header '{header}'")]
    InvalidSignatureFormat { header: String },
    #[error("Webhook secret is empty")]
    EmptySecret,
    #[error("RSA key generation failed: {source}")]
    KeyGenerationFailed {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `CryptoError`.
pub type Result<T, E = CryptoError> = ::core::result::Result<T, E>;
