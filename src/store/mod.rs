//! Data-access layer: one generic repository for by-id access plus typed
//! per-entity stores.
//!
//! Stores are cheap clones around the shared connection pool. Filtered
//! listings use tagged filter enums compiled to SQL with bound parameters;
//! there is no free-form key/value filtering anywhere.

use std::marker::PhantomData;

use rocket_db_pools::sqlx::{self, FromRow, PgPool, postgres::PgRow};

pub mod catalog;
pub mod courses;
pub mod enrollments;
pub mod instructors;
pub mod schedules;
pub mod students;
pub mod users;

/// A table-backed entity addressable by a serial `id` primary key.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
}

/// Generic by-id capability set, implemented once and instantiated per
/// entity. Entity-specific inserts, updates, and lookups live on the typed
/// stores wrapping this.
#[derive(Debug)]
pub struct Repository<E> {
    pool: PgPool,
    _entity: PhantomData<E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<E>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
