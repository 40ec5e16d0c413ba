use rocket_db_pools::sqlx::{self, PgPool, QueryBuilder};

use crate::models::{Course, Semester};
use crate::store::{Entity, Repository};

impl Entity for Course {
    const TABLE: &'static str = "courses";
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub credits: i32,
    pub instructor_id: i32,
    pub semester: Semester,
    pub year: i32,
}

/// Partial course update. Ownership stays with the original instructor;
/// reassignment is not an update operation.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_code: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<Semester>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub enum CourseFilter {
    Semester(Semester),
    Year(i32),
    Instructor(i32),
}

#[derive(Clone)]
pub struct CourseStore {
    repo: Repository<Course>,
}

impl CourseStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.repo.pool()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Course>, sqlx::Error> {
        self.repo.find_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.repo.delete_by_id(id).await
    }

    pub async fn insert(&self, course: NewCourse) -> Result<Course, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses (title, description, course_code, credits, instructor_id, semester, year) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.course_code)
        .bind(course.credits)
        .bind(course.instructor_id)
        .bind(course.semester)
        .bind(course.year)
        .fetch_one(self.pool())
        .await
    }

    pub async fn update(
        &self,
        id: i32,
        changes: CourseChanges,
    ) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "UPDATE courses SET title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             course_code = COALESCE($4, course_code), \
             credits = COALESCE($5, credits), \
             semester = COALESCE($6, semester), \
             year = COALESCE($7, year) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.course_code)
        .bind(changes.credits)
        .bind(changes.semester)
        .bind(changes.year)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn find_all(&self, filters: &[CourseFilter]) -> Result<Vec<Course>, sqlx::Error> {
        let mut query = QueryBuilder::new("SELECT * FROM courses");
        let mut separator = " WHERE ";
        for filter in filters {
            query.push(separator);
            separator = " AND ";
            match filter {
                CourseFilter::Semester(semester) => {
                    query.push("semester = ").push_bind(*semester);
                }
                CourseFilter::Year(year) => {
                    query.push("year = ").push_bind(*year);
                }
                CourseFilter::Instructor(instructor_id) => {
                    query.push("instructor_id = ").push_bind(*instructor_id);
                }
            }
        }
        query.push(" ORDER BY id");
        query
            .build_query_as::<Course>()
            .fetch_all(self.pool())
            .await
    }
}
