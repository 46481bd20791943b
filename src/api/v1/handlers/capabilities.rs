/*
 * Responsibility
 * - GET /auth/capabilities: ホスト framework が問い合わせる固定回答を JSON で返す
 */
use axum::{Json, extract::State};

use crate::api::v1::dto::capabilities::CapabilitiesResponse;
use crate::state::AppState;

pub async fn capabilities(State(state): State<AppState>) -> Json<CapabilitiesResponse> {
    let caps = &state.capabilities;

    Json(CapabilitiesResponse {
        auth_method: "jwt",
        is_internal: caps.is_internal(),
        prevent_local_passwords: caps.prevent_local_passwords(),
        can_change_password: caps.can_change_password(),
        change_password_url: caps.change_password_url().map(|u| u.to_string()),
        can_reset_password: caps.can_reset_password(),
        can_be_manually_set: caps.can_be_manually_set(),
    })
}
