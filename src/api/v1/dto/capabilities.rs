/*
 * Responsibility
 * - capabilities の response DTO
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub auth_method: &'static str,
    pub is_internal: bool,
    pub prevent_local_passwords: bool,
    pub can_change_password: bool,
    pub change_password_url: Option<String>,
    pub can_reset_password: bool,
    pub can_be_manually_set: bool,
}
