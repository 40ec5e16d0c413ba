use rocket_db_pools::sqlx::{self, PgPool, Postgres, Transaction};
use std::ops::DerefMut;

use crate::models::{User, UserRole};
use crate::store::{Entity, Repository};

impl Entity for User {
    const TABLE: &'static str = "users";
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Persistence-backed lookup and mutation of identity records. Username
/// uniqueness is enforced by the table constraint; a violating insert
/// surfaces as a database error for the caller to re-signal.
#[derive(Clone)]
pub struct UserStore {
    repo: Repository<User>,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.repo.pool()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool())
            .await
    }

    pub async fn insert(&self, user: NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, username, password, user_role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(self.pool())
        .await
    }

    pub async fn list_active(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE is_active = TRUE ORDER BY id")
            .fetch_all(self.pool())
            .await
    }

    /// Partial profile update; absent fields are left untouched. Touches
    /// `updated_at`.
    pub async fn update_profile(
        &self,
        id: i32,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(self.pool())
        .await
    }

    /// Role reassignment inside a caller-owned transaction, used when a
    /// student or instructor profile is attached to the user.
    pub async fn set_role_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        role: UserRole,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET user_role = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(tx.deref_mut())
            .await?;
        Ok(())
    }
}
