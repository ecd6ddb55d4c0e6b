/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: 起動時に組み立てた AuthGate (公開ルート + verifier)
 * - Clone 前提で持つ (内部は Arc/Clone cheap), 起動後は read-only
 */
use std::sync::Arc;

use crate::services::auth::AuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self { gate }
    }
}
