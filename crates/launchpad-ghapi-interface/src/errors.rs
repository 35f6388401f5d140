//! API errors.

use thiserror::Error;

/// API error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Pull request #{number} not found on repository {repository_path}")]
    UnknownPullRequest {
        repository_path: String,
        number: u64,
    },

    #[error("GraphQL query failed: {message}")]
    GraphQlError { message: String },

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `ApiError`.
pub type Result<T, E = ApiError> = core::result::Result<T, E>;
