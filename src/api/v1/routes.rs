/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証の要否は URL ではなく公開ルート設定 (PUBLIC_ROUTES) で決まる
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{me::me, profile::validate_profile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/profile/validate", post(validate_profile))
}
