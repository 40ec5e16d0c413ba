use rocket_db_pools::sqlx::{self, PgPool, Postgres, QueryBuilder, Transaction};
use std::ops::DerefMut;

use crate::models::Student;
use crate::store::{Entity, Repository};

impl Entity for Student {
    const TABLE: &'static str = "students";
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub user_id: i32,
    pub student_number: String,
    pub group_id: i32,
    pub enrollment_year: i32,
    pub faculty_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub student_number: Option<String>,
    pub group_id: Option<i32>,
    pub enrollment_year: Option<i32>,
    pub faculty_id: Option<i32>,
}

/// Supported student listing predicates. One variant per filterable column.
#[derive(Debug, Clone)]
pub enum StudentFilter {
    Group(i32),
    EnrollmentYear(i32),
    Faculty(i32),
}

#[derive(Clone)]
pub struct StudentStore {
    repo: Repository<Student>,
}

impl StudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.repo.pool()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Student>, sqlx::Error> {
        self.repo.find_by_id(id).await
    }

    /// Insert within a caller-owned transaction so the linked user's role
    /// flip commits atomically with the profile row.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        student: NewStudent,
    ) -> Result<Student, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            "INSERT INTO students (user_id, student_number, group_id, enrollment_year, faculty_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(student.user_id)
        .bind(&student.student_number)
        .bind(student.group_id)
        .bind(student.enrollment_year)
        .bind(student.faculty_id)
        .fetch_one(tx.deref_mut())
        .await
    }

    pub async fn update(
        &self,
        id: i32,
        changes: StudentChanges,
    ) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            "UPDATE students SET student_number = COALESCE($2, student_number), \
             group_id = COALESCE($3, group_id), \
             enrollment_year = COALESCE($4, enrollment_year), \
             faculty_id = COALESCE($5, faculty_id) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.student_number)
        .bind(changes.group_id)
        .bind(changes.enrollment_year)
        .bind(changes.faculty_id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn find_all(&self, filters: &[StudentFilter]) -> Result<Vec<Student>, sqlx::Error> {
        let mut query = QueryBuilder::new("SELECT * FROM students");
        let mut separator = " WHERE ";
        for filter in filters {
            query.push(separator);
            separator = " AND ";
            match filter {
                StudentFilter::Group(group_id) => {
                    query.push("group_id = ").push_bind(*group_id);
                }
                StudentFilter::EnrollmentYear(year) => {
                    query.push("enrollment_year = ").push_bind(*year);
                }
                StudentFilter::Faculty(faculty_id) => {
                    query.push("faculty_id = ").push_bind(*faculty_id);
                }
            }
        }
        query.push(" ORDER BY id");
        query
            .build_query_as::<Student>()
            .fetch_all(self.pool())
            .await
    }
}
