//! File uploads into an entry's upload directory.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use nsgd_core::storage::UploadRequest;
use nsgd_shared::AppError;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;

/// Content type assumed when a part does not declare one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Creates upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

fn bad_multipart(err: &axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed upload: {}", err.body_text()))
}

/// POST /api/upload - Store one file (`file`) under the entry named by `uid`.
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Json<Value>> {
    let mut uid = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| bad_multipart(&e))? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("uid") => {
                uid = Some(field.text().await.map_err(|e| bad_multipart(&e))?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let data = field.bytes().await.map_err(|e| bad_multipart(&e))?;
                file = Some((filename, content_type, data));
            }
            _ => {}
        }
    }

    let Some((filename, content_type, data)) = file else {
        return Err(AppError::Validation("No file uploaded".to_string()).into());
    };

    let stored = state
        .storage
        .store_upload(UploadRequest {
            uid: uid.filter(|uid| !uid.is_empty()),
            filename,
            content_type,
            data,
        })
        .await?;

    info!(uid = %stored.uid, path = %stored.path, size = stored.size, "File uploaded");
    Ok(Json(json!({ "success": true, "file": stored })))
}
