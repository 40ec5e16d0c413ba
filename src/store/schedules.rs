use chrono::{DateTime, Utc};
use rocket_db_pools::sqlx::{self, PgPool};

use crate::models::{LessonType, Schedule};
use crate::store::{Entity, Repository};

impl Entity for Schedule {
    const TABLE: &'static str = "schedules";
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub course_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub classroom: String,
    pub lesson_type: LessonType,
}

#[derive(Clone)]
pub struct ScheduleStore {
    repo: Repository<Schedule>,
}

impl ScheduleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.repo.pool()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Schedule>, sqlx::Error> {
        self.repo.find_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.repo.delete_by_id(id).await
    }

    pub async fn insert(&self, slot: NewSchedule) -> Result<Schedule, sqlx::Error> {
        sqlx::query_as::<_, Schedule>(
            "INSERT INTO schedules (course_id, start_time, end_time, classroom, lesson_type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(slot.course_id)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(&slot.classroom)
        .bind(slot.lesson_type)
        .fetch_one(self.pool())
        .await
    }

    pub async fn list_for_course(&self, course_id: i32) -> Result<Vec<Schedule>, sqlx::Error> {
        sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE course_id = $1 ORDER BY start_time",
        )
        .bind(course_id)
        .fetch_all(self.pool())
        .await
    }
}
