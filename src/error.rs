//! Error types for the ledger and the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Why a candidate block may not extend the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("expected index {expected}, got {got}")]
    IndexMismatch { expected: u64, got: u64 },

    #[error("block {index} prev_hash does not match the chain tail")]
    BrokenLink { index: u64 },

    #[error("block {index} hash does not match its contents")]
    HashMismatch { index: u64 },

    #[error("no index can follow {tail}")]
    IndexOverflow { tail: u64 },

    #[error("block {index} is flagged genesis but genesis is already present")]
    StrayGenesis { index: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("block rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Errors surfaced by the HTTP handlers. The body is a plain-text message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Decode { message: &'static str, detail: String },

    #[error("{message}")]
    Serialize { message: &'static str, detail: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Decode { .. } | Self::Serialize { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Ledger(LedgerError::Rejected(_)) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Decode { message, detail } | Self::Serialize { message, detail } => {
                tracing::error!(%detail, "{message}");
            }
            Self::Ledger(e) => tracing::warn!(error = %e, "append refused"),
        }
        (self.status(), self.to_string()).into_response()
    }
}
