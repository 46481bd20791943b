/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /login は GET/POST 両対応 (gateway 経由の SSO は GET で飛んでくる)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    capabilities::capabilities,
    health::health,
    login::{bearer_login, password_login},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/login", get(bearer_login).post(bearer_login))
        .route("/login/password", post(password_login))
        .route("/auth/capabilities", get(capabilities))
}
