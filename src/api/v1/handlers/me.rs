/*
 * Responsibility
 * - GET /api/v1/me
 * - gate が extensions に載せた AuthCtx をそのまま返す (再検証しない)
 */
use axum::Json;

use crate::api::v1::extractors::{AuthCtx, AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<AuthCtx> {
    Json(ctx)
}
