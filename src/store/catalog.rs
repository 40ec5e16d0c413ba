use rocket_db_pools::sqlx::{self, PgPool};

use crate::models::{Faculty, Group};
use crate::store::{Entity, Repository};

impl Entity for Group {
    const TABLE: &'static str = "groups";
}

impl Entity for Faculty {
    const TABLE: &'static str = "faculties";
}

/// Shared store shape for the simple named lookup entities (groups and
/// faculties): insert by name, find, delete.
pub struct NamedStore<E> {
    repo: Repository<E>,
}

impl<E> Clone for NamedStore<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<E: Entity> NamedStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.repo.pool()
    }

    pub async fn insert(&self, name: &str) -> Result<E, sqlx::Error> {
        let sql = format!("INSERT INTO {} (name) VALUES ($1) RETURNING *", E::TABLE);
        sqlx::query_as::<_, E>(&sql)
            .bind(name)
            .fetch_one(self.pool())
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<E>, sqlx::Error> {
        self.repo.find_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.repo.delete_by_id(id).await
    }
}

pub type GroupStore = NamedStore<Group>;
pub type FacultyStore = NamedStore<Faculty>;
