/*
 * Responsibility
 * - /login handler: bearer token でのログイン試行
 * - 成功 → 200 + session JSON / 拒否・token なし → 一律 204 (fallthrough)
 * - 拒否理由は response に出さない (通常ログイン画面にそのまま流す挙動)
 * - /login/password: この auth method では常に失敗 (401)
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::v1::dto::login::{PasswordLoginRequest, SessionResponse};
use crate::api::v1::extractors::BearerHeader;
use crate::error::AppError;
use crate::services::auth::LoginOutcome;
use crate::state::AppState;

pub async fn bearer_login(
    State(state): State<AppState>,
    BearerHeader(header): BearerHeader,
) -> Result<Response, AppError> {
    // No Authorization header at all: the normal login page takes over.
    let Some(header) = header else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    match state.login.try_bearer_login(&header).await? {
        LoginOutcome::Completed { session, identity } => {
            tracing::info!(user_id = %session.user_id, session_id = %session.id, "bearer login completed");
            Ok((
                StatusCode::OK,
                Json(SessionResponse {
                    session_id: session.id,
                    user_id: session.user_id,
                    username: identity.username,
                    created_at: session.created_at,
                }),
            )
                .into_response())
        }
        // Uniform rejection: indistinguishable from "no token present".
        LoginOutcome::Fallthrough => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Password login against this auth method never succeeds; identities are
/// established from bearer tokens only. The capability adapter owns that
/// answer, this handler just renders it.
pub async fn password_login(
    State(state): State<AppState>,
    Json(req): Json<PasswordLoginRequest>,
) -> StatusCode {
    if state
        .capabilities
        .password_login(&req.username, &req.password)
    {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}
