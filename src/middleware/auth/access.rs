//! Bearer access token 検証 → AuthCtx を extensions に入れる
//!
//! - 公開ルートはそのまま通す (ヘッダは見ない)
//! - 保護ルートは `Authorization: Bearer <jwt>` を検証し、失敗は AppError として返す
//! - 判定そのものは `services::auth::AuthGate` 側 (ここは axum との配線のみ)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::Access;
use crate::state::AppState;

/// Router 全体に gate を掛ける。fallback (404) も gate の後ろになる。
///
/// 例：
/// ```ignore
/// let app = Router::new().nest("/api/v1", api::v1::routes());
/// let app = middleware::auth::access::apply(app, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // path only; the query string never takes part in classification
    let access = state.gate.authorize(req.uri().path(), req.headers())?;

    if let Access::Authenticated(token) = access {
        // middleware → extractor への受け渡し
        req.extensions_mut().insert(AuthCtx::from(token));
    }

    Ok(next.run(req).await)
}
