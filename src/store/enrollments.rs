use chrono::{DateTime, Utc};
use rocket_db_pools::sqlx::{self, PgPool, QueryBuilder};

use crate::models::{Enrollment, EnrollmentStatus};

/// Enrollments are keyed by (student_id, course_id), so this store does not
/// go through the by-id `Repository`.
#[derive(Clone)]
pub struct EnrollmentStore {
    pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i32,
    pub course_id: i32,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

#[derive(Debug, Clone)]
pub enum EnrollmentFilter {
    Course(i32),
    Student(i32),
    Status(EnrollmentStatus),
}

impl EnrollmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn insert(&self, enrollment: NewEnrollment) -> Result<Enrollment, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (student_id, course_id, enrollment_date, status) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(enrollment.student_id)
        .bind(enrollment.course_id)
        .bind(enrollment.enrollment_date)
        .bind(enrollment.status)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_all(
        &self,
        filters: &[EnrollmentFilter],
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let mut query = QueryBuilder::new("SELECT * FROM enrollments");
        let mut separator = " WHERE ";
        for filter in filters {
            query.push(separator);
            separator = " AND ";
            match filter {
                EnrollmentFilter::Course(course_id) => {
                    query.push("course_id = ").push_bind(*course_id);
                }
                EnrollmentFilter::Student(student_id) => {
                    query.push("student_id = ").push_bind(*student_id);
                }
                EnrollmentFilter::Status(status) => {
                    query.push("status = ").push_bind(*status);
                }
            }
        }
        query.push(" ORDER BY student_id, course_id");
        query
            .build_query_as::<Enrollment>()
            .fetch_all(&self.pool)
            .await
    }
}
