//! Entry routes: list, save, payment history and delete.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use nsgd_core::ledger::{Entry, EntryDraft, coerce};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;

/// Creates entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/get-entries", get(list_entries))
        .route("/api/save-entry", post(save_entry))
        .route("/api/update-history", post(update_history))
        .route("/api/delete-entry/{uid}", delete(delete_entry))
}

/// Body of a payment history update.
#[derive(Debug, Deserialize)]
pub struct HistoryUpdate {
    /// Entry key.
    #[serde(rename = "uniqueID", default, deserialize_with = "coerce::loose_text")]
    pub unique_id: Option<String>,
    /// New payment history, any JSON shape.
    #[serde(default)]
    pub payments: Option<Value>,
}

/// GET /api/get-entries - All entries, newest first.
async fn list_entries(State(state): State<AppState>) -> ApiResult<Json<Vec<Entry>>> {
    Ok(Json(state.ledger().list_entries().await?))
}

/// POST /api/save-entry - Create or reconcile an entry.
async fn save_entry(
    State(state): State<AppState>,
    operator: AuthUser,
    Json(draft): Json<EntryDraft>,
) -> ApiResult<Json<Value>> {
    let entry = state.ledger().save_entry(draft).await?;
    info!(operator = operator.subject(), unique_id = %entry.unique_id, "Entry save request handled");

    Ok(Json(json!({ "success": true, "entry": entry })))
}

/// POST /api/update-history - Replace an entry's payment history.
async fn update_history(
    State(state): State<AppState>,
    Json(update): Json<HistoryUpdate>,
) -> ApiResult<Json<Value>> {
    let unique_id = update.unique_id.unwrap_or_default();
    let entry = state
        .ledger()
        .update_history(&unique_id, update.payments.as_ref())
        .await?;

    Ok(Json(json!({ "success": true, "entry": entry })))
}

/// DELETE /api/delete-entry/{uid} - Delete an entry and its uploads.
async fn delete_entry(
    State(state): State<AppState>,
    operator: AuthUser,
    Path(uid): Path<String>,
) -> ApiResult<Json<Value>> {
    state.ledger().delete_entry(&uid).await?;
    info!(operator = operator.subject(), unique_id = %uid, "Entry delete request handled");

    Ok(Json(json!({ "success": true })))
}
