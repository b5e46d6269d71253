//! HTTP routes for recording checkouts, reading the chain and minting book ids.

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::crypto::book_id;
use crate::error::ApiError;
use crate::model::{Block, CheckoutPayload};
use crate::validation::Violation;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_chain).post(write_block))
        .route("/new", post(new_book))
        .route("/validate", get(validate_chain))
        .route("/health", get(health))
        .with_state(state)
}

/// Checkout as submitted by clients. Missing fields decode as empty strings;
/// the genesis flag is never accepted from outside.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutRequest {
    pub book_id: String,
    pub user: String,
    pub checkout_date: String,
}

impl From<CheckoutRequest> for CheckoutPayload {
    fn from(req: CheckoutRequest) -> Self {
        CheckoutPayload::new(req.book_id, req.user, req.checkout_date)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub isbn: String,
}

fn pretty_json<T: Serialize>(value: &T, message: &'static str) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| ApiError::Serialize {
        message,
        detail: e.to_string(),
    })?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /: the whole chain, genesis first.
pub async fn get_chain(State(state): State<AppState>) -> Result<Response, ApiError> {
    let blocks = state.ledger.snapshot();
    pretty_json(&blocks, "Could not marshal blockchain")
}

/// POST /: append one checkout; returns the new block.
pub async fn write_block(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Block>, ApiError> {
    let req: CheckoutRequest = serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        message: "Could not decode request",
        detail: e.to_string(),
    })?;
    let block = state.ledger.append(req.into())?;
    tracing::info!(index = block.index, book_id = %block.data.book_id, "checkout recorded");
    Ok(Json(block))
}

/// POST /new: echo the book back with its content-derived id.
pub async fn new_book(body: Bytes) -> Result<Response, ApiError> {
    let mut book: Book = serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        message: "Could not create book",
        detail: e.to_string(),
    })?;
    book.id = book_id(&book.isbn, &book.publish_date);
    pretty_json(&book, "Could not marshal book")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResp {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// GET /validate: audit every block and link; returns { ok, errors[] }
pub async fn validate_chain(State(state): State<AppState>) -> Json<ValidateResp> {
    let errors: Vec<String> = state
        .ledger
        .verify()
        .into_iter()
        .map(|Violation { position, description }| format!("position {position}: {description}"))
        .collect();
    Json(ValidateResp {
        ok: errors.is_empty(),
        errors,
    })
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
