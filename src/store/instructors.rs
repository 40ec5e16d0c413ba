use rocket_db_pools::sqlx::{self, PgPool, Postgres, QueryBuilder, Transaction};
use std::ops::DerefMut;

use crate::models::Instructor;
use crate::store::{Entity, Repository};

impl Entity for Instructor {
    const TABLE: &'static str = "instructors";
}

#[derive(Debug, Clone)]
pub struct NewInstructor {
    pub user_id: i32,
    pub position: String,
    pub department: String,
    pub academic_degree: String,
}

#[derive(Debug, Clone)]
pub enum InstructorFilter {
    Department(String),
    Id(i32),
}

#[derive(Clone)]
pub struct InstructorStore {
    repo: Repository<Instructor>,
}

impl InstructorStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.repo.pool()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Instructor>, sqlx::Error> {
        self.repo.find_by_id(id).await
    }

    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        instructor: NewInstructor,
    ) -> Result<Instructor, sqlx::Error> {
        sqlx::query_as::<_, Instructor>(
            "INSERT INTO instructors (user_id, position, department, academic_degree) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(instructor.user_id)
        .bind(&instructor.position)
        .bind(&instructor.department)
        .bind(&instructor.academic_degree)
        .fetch_one(tx.deref_mut())
        .await
    }

    pub async fn find_all(
        &self,
        filters: &[InstructorFilter],
    ) -> Result<Vec<Instructor>, sqlx::Error> {
        let mut query = QueryBuilder::new("SELECT * FROM instructors");
        let mut separator = " WHERE ";
        for filter in filters {
            query.push(separator);
            separator = " AND ";
            match filter {
                InstructorFilter::Department(department) => {
                    query.push("department = ").push_bind(department.clone());
                }
                InstructorFilter::Id(id) => {
                    query.push("id = ").push_bind(*id);
                }
            }
        }
        query.push(" ORDER BY id");
        query
            .build_query_as::<Instructor>()
            .fetch_all(self.pool())
            .await
    }
}
