use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, RequireAdmin};
use crate::error::ApiError;
use crate::models::{EnrollmentStatus, StudentInfo};
use crate::services::StudentService;
use crate::store::students::{NewStudent, StudentChanges};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateStudentRequest {
    pub user_id: i32,
    pub student_number: String,
    pub group_id: i32,
    pub enrollment_year: i32,
    pub faculty_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStudentRequest {
    pub student_number: Option<String>,
    pub group_id: Option<i32>,
    pub enrollment_year: Option<i32>,
    pub faculty_id: Option<i32>,
}

/// Create a student profile. Admin only; the linked user's role becomes
/// STUDENT as a side effect.
#[openapi(tag = "Students")]
#[post("/students", data = "<payload>")]
pub async fn create_student(
    service: &State<StudentService>,
    _admin: RequireAdmin,
    payload: Json<CreateStudentRequest>,
) -> Result<Json<StudentInfo>, ApiError> {
    let payload = payload.into_inner();
    let student = service
        .create(NewStudent {
            user_id: payload.user_id,
            student_number: payload.student_number,
            group_id: payload.group_id,
            enrollment_year: payload.enrollment_year,
            faculty_id: payload.faculty_id,
        })
        .await?;
    Ok(Json(student))
}

#[openapi(tag = "Students")]
#[get("/students/<student_id>")]
pub async fn get_student(
    service: &State<StudentService>,
    student_id: i32,
    _user: AuthUser,
) -> Result<Json<StudentInfo>, ApiError> {
    Ok(Json(service.info(student_id).await?))
}

/// Filtered student listing; course and enrollment-status filters are
/// resolved through the enrollments join.
#[openapi(tag = "Students")]
#[get("/students?<group_id>&<enrollment_year>&<faculty_id>&<course_id>&<enrollment_status>")]
pub async fn list_students(
    service: &State<StudentService>,
    group_id: Option<i32>,
    enrollment_year: Option<i32>,
    faculty_id: Option<i32>,
    course_id: Option<i32>,
    enrollment_status: Option<EnrollmentStatus>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<StudentInfo>>, ApiError> {
    let students = service
        .list(
            group_id,
            enrollment_year,
            faculty_id,
            course_id,
            enrollment_status,
        )
        .await?;
    Ok(Json(students))
}

#[openapi(tag = "Students")]
#[put("/students/<student_id>", data = "<payload>")]
pub async fn update_student(
    service: &State<StudentService>,
    student_id: i32,
    _admin: RequireAdmin,
    payload: Json<UpdateStudentRequest>,
) -> Result<Json<StudentInfo>, ApiError> {
    let payload = payload.into_inner();
    let student = service
        .update(
            student_id,
            StudentChanges {
                student_number: payload.student_number,
                group_id: payload.group_id,
                enrollment_year: payload.enrollment_year,
                faculty_id: payload.faculty_id,
            },
        )
        .await?;
    Ok(Json(student))
}
