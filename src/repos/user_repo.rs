/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り find/create/update を提供
 * - UserStore trait の Postgres 実装 (行 → Identity の変換もここ)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::store::{Identity, NewIdentity, StoreError, UserStore};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub auth: String,
    pub password: Option<String>,
    pub confirmed: bool,
    pub policyagreed: bool,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Identity {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.firstname,
            last_name: row.lastname,
            auth: row.auth,
            password: row.password,
            confirmed: row.confirmed,
            policy_agreed: row.policyagreed,
        }
    }
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, firstname, lastname, auth, password, confirmed, policyagreed
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, new: &NewIdentity) -> Result<UserRow, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, email, firstname, lastname, auth, password, confirmed, policyagreed)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, username, email, firstname, lastname, auth, password, confirmed, policyagreed
        "#,
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.auth)
    .bind(&new.password)
    .bind(new.confirmed)
    .bind(new.policy_agreed)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update_username(db: &PgPool, id: Uuid, username: &str) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        UPDATE users
        SET username = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(username)
    .execute(db)
    .await?;

    Ok(())
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let row = find_by_email(&self.db, email).await?;
        Ok(row.map(Identity::from))
    }

    async fn create_identity(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let row = create(&self.db, &new).await?;
        Ok(row.into())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> Result<(), StoreError> {
        update_username(&self.db, id, username).await?;
        Ok(())
    }
}
