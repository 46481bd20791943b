/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::LoginService;
use crate::services::auth::capabilities::AuthCapabilities;

#[derive(Clone)]
pub struct AppState {
    pub login: Arc<LoginService>,
    pub capabilities: AuthCapabilities,
}

impl AppState {
    pub fn new(login: Arc<LoginService>) -> Self {
        Self {
            login,
            capabilities: AuthCapabilities,
        }
    }
}
