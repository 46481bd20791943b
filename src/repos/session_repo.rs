/*
 * Responsibility
 * - login_sessions テーブル向け SQLx 操作
 * - SessionCompletor trait の Postgres 実装
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::store::{Identity, LoginSession, SessionCompletor, StoreError};

#[derive(Debug, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

pub async fn create(db: &PgPool, user_id: Uuid) -> Result<SessionRow, RepoError> {
    let row = sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO login_sessions (user_id)
        VALUES ($1)
        RETURNING id, user_id, created_at
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub struct PgSessionCompletor {
    db: PgPool,
}

impl PgSessionCompletor {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionCompletor for PgSessionCompletor {
    async fn complete_login(&self, identity: &Identity) -> Result<LoginSession, StoreError> {
        let row = create(&self.db, identity.id).await?;

        Ok(LoginSession {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}
