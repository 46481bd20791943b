/*
 * Responsibility
 * - user store / session completor の trait 定義 (実装は repos 側)
 * - Identity / NewIdentity / LoginSession のドメイン型
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A local user record. Email is the stable key; the username is derived
/// from token claims and may be rewritten on any login.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub auth: String,
    pub password: Option<String>,
    pub confirmed: bool,
    pub policy_agreed: bool,
}

/// Fields for a CREATE. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub auth: String,
    pub password: Option<String>,
    pub confirmed: bool,
    pub policy_agreed: bool,
}

/// An established login session.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn create_identity(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    /// Rewrite the username only. Email and names are never touched on the
    /// update path.
    async fn update_username(&self, id: Uuid, username: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SessionCompletor: Send + Sync {
    /// Establish an authenticated session for the identity. Any failure here
    /// is a request-level fault the caller propagates, not a fallthrough.
    async fn complete_login(&self, identity: &Identity) -> Result<LoginSession, StoreError>;
}
