/*
 * Responsibility
 * - bearer login の一連の流れ (decode → resolve → upsert → session 完了)
 * - reject は全て同じ Fallthrough に畳む (通常ログイン画面に流す)
 * - payload の中身は絶対にログへ出さない
 */
use std::sync::Arc;

use tracing::debug;

use crate::config::PolicyConfig;
use crate::services::auth::resolver::{self, Resolution, UpsertAction};
use crate::services::auth::store::{
    Identity, LoginSession, NewIdentity, SessionCompletor, StoreError, UserStore,
};
use crate::services::auth::token;

// Tag recorded on identities this service creates.
const AUTH_METHOD: &str = "jwt";

pub struct LoginService {
    policy: PolicyConfig,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionCompletor>,
}

#[derive(Debug)]
pub enum LoginOutcome {
    /// Session established.
    Completed {
        session: LoginSession,
        identity: Identity,
    },
    /// Silent fallthrough to the normal login UI. Carries no diagnostic on
    /// purpose; the reject reason only goes to debug logs.
    Fallthrough,
}

impl LoginService {
    pub fn new(
        policy: PolicyConfig,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionCompletor>,
    ) -> Self {
        Self {
            policy,
            users,
            sessions,
        }
    }

    /// Attempt a bearer login from a raw `Authorization` header value.
    ///
    /// Malformed tokens and policy mismatches come back as
    /// `Ok(Fallthrough)`; only store failures are `Err` and abort the
    /// request.
    pub async fn try_bearer_login(&self, header_value: &str) -> Result<LoginOutcome, StoreError> {
        let claims = match token::decode_bearer(header_value) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(reason = %err, "bearer login rejected");
                return Ok(LoginOutcome::Fallthrough);
            }
        };

        let resolved = match resolver::resolve(&claims, &self.policy) {
            Resolution::Accepted(resolved) => resolved,
            Resolution::Rejected(reason) => {
                debug!(?reason, "bearer login rejected");
                return Ok(LoginOutcome::Fallthrough);
            }
        };

        let existing = self.users.find_by_email(&resolved.email).await?;

        match resolver::decide_action(existing.as_ref(), &resolved) {
            UpsertAction::Create => {
                self.users
                    .create_identity(NewIdentity {
                        username: resolved.username.clone(),
                        email: resolved.email.clone(),
                        first_name: resolved.first_name.clone(),
                        last_name: resolved.last_name.clone(),
                        auth: AUTH_METHOD.to_string(),
                        password: resolved.password.clone(),
                        confirmed: true,
                        policy_agreed: true,
                    })
                    .await?;
            }
            UpsertAction::UpdateUsername { id } => {
                self.users.update_username(id, &resolved.username).await?;
            }
            UpsertAction::NoChange => {}
        }

        // Re-fetch so the session is completed against what the store
        // actually holds, not what we proposed.
        let identity = self
            .users
            .find_by_email(&resolved.email)
            .await?
            .ok_or_else(|| StoreError::Backend("identity missing after upsert".into()))?;

        let session = self.sessions.complete_login(&identity).await?;

        Ok(LoginOutcome::Completed { session, identity })
    }
}
