//! Server errors.

use actix_http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use launchpad_core::DomainError;
use launchpad_ledger_interface::LedgerError;
use thiserror::Error;

use crate::event_type::EventType;

/// Server error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Error while parsing webhook event {event_type}: {source}")]
    EventParseError {
        event_type: EventType,
        source: serde_json::Error,
    },

    #[error("Missing webhook signature.")]
    MissingWebhookSignature,

    #[error("Invalid webhook signature.")]
    InvalidWebhookSignature,

    #[error("I/O error: {source}")]
    IoError { source: std::io::Error },

    #[error(transparent)]
    DomainError { source: DomainError },

    #[error(transparent)]
    LedgerError { source: LedgerError },
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match &self {
            ServerError::MissingWebhookSignature | ServerError::InvalidWebhookSignature => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::EventParseError { .. } => StatusCode::BAD_REQUEST,
            ServerError::DomainError {
                source: DomainError::Judgment { .. } | DomainError::JudgmentTimeout { .. },
            } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

impl From<DomainError> for ServerError {
    fn from(source: DomainError) -> Self {
        Self::DomainError { source }
    }
}

/// Result alias for `ServerError`.
pub type Result<T, E = ServerError> = core::result::Result<T, E>;
