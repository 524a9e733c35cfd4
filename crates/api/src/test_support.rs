//! Test harness: the full router over in-memory SQLite and a temporary upload root.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use nsgd_core::auth::{OperatorAccount, hash_password};
use nsgd_core::storage::{StorageConfig, StorageProvider, StorageService};
use nsgd_db::migration::{Migrator, MigratorTrait};
use nsgd_shared::config::DatabaseConfig;
use nsgd_shared::{JwtConfig, JwtService};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, create_router};

pub const OPERATOR: &str = "admin";
pub const PASSWORD: &str = "1234";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
    uploads: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = nsgd_db::connect_with(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        })
        .await
        .expect("Failed to open sqlite");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let uploads = tempfile::tempdir().expect("tempdir");
        let storage =
            StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(uploads.path())))
                .expect("fs storage");

        let jwt_service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_expires_secs: 3600,
        });
        let token = jwt_service.generate_token(OPERATOR).expect("token");

        let operator =
            OperatorAccount::new(OPERATOR, hash_password(PASSWORD).expect("hash password"));

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            operator: Arc::new(operator),
            storage: Arc::new(storage),
        };

        Self {
            router: create_router(state.clone()),
            state,
            token,
            uploads,
        }
    }

    pub fn uploads_root(&self) -> &Path {
        self.uploads.path()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Sends a request; returns the status and the body parsed as JSON (`Null` if it is not JSON).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(post_json(uri, body, Some(&self.bearer()))).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        self.send(get(uri, Some(&self.bearer()))).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(AUTHORIZATION, self.bearer())
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_json(uri: &str, body: &Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}
