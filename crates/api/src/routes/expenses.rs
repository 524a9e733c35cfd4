//! Expense routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use nsgd_core::ledger::{Expense, ExpenseDraft};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::ApiResult;

/// Creates expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/get-expenses", get(list_expenses))
        .route("/api/save-expense", post(save_expense))
        .route("/api/delete-expense/{id}", delete(delete_expense))
}

/// GET /api/get-expenses - All expenses, newest first.
async fn list_expenses(State(state): State<AppState>) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.ledger().list_expenses().await?))
}

/// POST /api/save-expense - Record an expense.
async fn save_expense(
    State(state): State<AppState>,
    Json(draft): Json<ExpenseDraft>,
) -> ApiResult<Json<Value>> {
    let expense = state.ledger().save_expense(draft).await?;
    Ok(Json(json!({ "success": true, "expense": expense })))
}

/// DELETE /api/delete-expense/{id} - Delete an expense.
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.ledger().delete_expense(&id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_expense_lifecycle() {
        let app = TestApp::spawn().await;

        let (status, body) = app
            .post_json(
                "/api/save-expense",
                &json!({ "date": "01/10/2026", "description": "Diesel", "amount": "1250.5" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["expense"]["amount"], json!(1250.5));
        let id = body["expense"]["_id"].as_str().expect("id").to_string();

        let (_, list) = app.get_json("/api/get-expenses").await;
        assert_eq!(list.as_array().map(Vec::len), Some(1));
        assert_eq!(list[0]["description"], "Diesel");

        let (_, deleted) = app.delete(&format!("/api/delete-expense/{id}")).await;
        assert_eq!(deleted, json!({ "success": true }));

        let (_, list) = app.get_json("/api/get-expenses").await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_expense_defaults() {
        let app = TestApp::spawn().await;
        let (_, body) = app.post_json("/api/save-expense", &json!({})).await;

        assert_eq!(body["expense"]["amount"], json!(0.0));
        assert!(body["expense"]["date"].as_str().is_some_and(|d| d.len() == 10));
    }

    #[tokio::test]
    async fn test_delete_unknown_expense() {
        let app = TestApp::spawn().await;
        let (status, body) = app.delete("/api/delete-expense/does-not-exist").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["msg"], "Expense not found");
    }
}
