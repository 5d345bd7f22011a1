//! HTTP request boundary (Axum).
//!
//! Decodes payment requests, hands them to the [`TransactionStore`] and maps
//! the outcome onto a status code: `201 Created` for a first submission,
//! `200 OK` carrying the original record for a replay, `400 Bad Request` for
//! a body that cannot be decoded (the store is never reached).

pub mod error;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{Transaction, TransactionStore};
use error::ApiError;

/// Shared application state.
pub type AppState = Arc<TransactionStore>;

/// Build the application router around `store`.
pub fn app(store: AppState) -> Router {
    Router::new()
        .route("/pay", post(pay))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route("/health", get(health))
        .with_state(store)
}

/// The body is decoded regardless of its declared content type; only a
/// body that does not decode is rejected.
async fn pay(
    State(store): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let candidate = serde_json::from_slice::<Transaction>(&body).map_err(|e| {
        debug!(reason = %e, "rejected payment request");
        ApiError::bad_request("invalid request body format")
    })?;

    let outcome = store.process(candidate);
    let status = if outcome.is_duplicate() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    info!(
        transaction_id = %outcome.transaction().transaction_id,
        duplicate = outcome.is_duplicate(),
        "payment handled"
    );

    Ok((status, Json(outcome.into_transaction())))
}

async fn get_transaction(
    State(store): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    store
        .get(&transaction_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {transaction_id} not found")))
}

async fn health(State(store): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "transactions": store.len() }))
}
