use chrono::{DateTime, Utc};
use rocket::FromFormField;
use rocket_db_pools::sqlx::{self, FromRow};
use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ===== Enumerations (mapped to Postgres enum types) =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Student,
    Instructor,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, FromFormField, sqlx::Type,
)]
#[sqlx(type_name = "semester", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    Autumn,
    Spring,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, FromFormField, sqlx::Type,
)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "lesson_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Lecture,
    Practice,
    Lab,
}

// ===== Entity Rows =====

/// Identity anchor. The `password` column holds an argon2 hash; it is kept out
/// of every user-facing view except the registration echo (see
/// `auth::responses::RegisterResponse`).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: i32,
    pub user_id: i32,
    pub student_number: String,
    pub group_id: i32,
    pub enrollment_year: i32,
    pub faculty_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Instructor {
    pub id: i32,
    pub user_id: i32,
    pub position: String,
    pub department: String,
    pub academic_degree: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub credits: i32,
    pub instructor_id: i32,
    pub semester: Semester,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Enrollment {
    pub student_id: i32,
    pub course_id: i32,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Group {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Faculty {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Schedule {
    pub id: i32,
    pub course_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub classroom: String,
    pub lesson_type: LessonType,
}

// ===== API Views =====

/// Public projection of a user row. Excludes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserInfo {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            user_role: user.user_role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
}

/// Student view enriched with group and faculty names resolved at read time;
/// the names are not stored redundantly on the student row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StudentInfo {
    pub id: i32,
    pub user_id: i32,
    pub student_number: String,
    pub group_name: String,
    pub enrollment_year: i32,
    pub faculty_name: String,
}
