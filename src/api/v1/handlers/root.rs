/*
 * Responsibility
 * - GET / と GET /api-docs (既定で公開)
 * - 未定義パスの fallback (404)
 */
use axum::{Json, http::Uri};
use serde_json::{Value, json};

use crate::error::AppError;

pub async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "auth": "Authorization: Bearer <jwt> (HS256)",
        "routes": [
            { "method": "GET", "path": "/health" },
            { "method": "GET", "path": "/api/v1/me" },
            { "method": "POST", "path": "/api/v1/profile/validate" },
        ],
    }))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("{} does not exist", uri.path()))
}
