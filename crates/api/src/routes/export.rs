//! Spreadsheet export.

use axum::{
    Router,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use nsgd_core::export::{CONTENT_TYPE as XLSX_CONTENT_TYPE, FILE_NAME};

use crate::AppState;
use crate::error::ApiResult;

/// Creates export routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/export-excel", get(export_excel))
}

/// GET /api/export-excel - Download every entry as an xlsx workbook.
async fn export_excel(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let bytes = state.ledger().export_workbook().await?;

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{TestApp, get};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_export_returns_workbook() {
        let app = TestApp::spawn().await;
        app.post_json(
            "/api/save-entry",
            &json!({ "uniqueID": "NSGD-1", "name": "Bob", "amount": 1000 }),
        )
        .await;

        let (status, bytes) = app
            .send_raw(get("/api/export-excel", Some(&app.bearer())))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_export_headers() {
        let app = TestApp::spawn().await;
        let response = {
            use tower::ServiceExt;
            app.router
                .clone()
                .oneshot(get("/api/export-excel", Some(&app.token)))
                .await
                .unwrap()
        };

        assert_eq!(
            response.headers()["content-type"],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"ledger.xlsx\""
        );
    }

    #[tokio::test]
    async fn test_export_requires_token() {
        let app = TestApp::spawn().await;
        let (status, _) = app.send_raw(get("/api/export-excel", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
