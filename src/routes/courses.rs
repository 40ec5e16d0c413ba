use chrono::{DateTime, Utc};
use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, RequireAdmin, RequireStaff};
use crate::error::ApiError;
use crate::models::{Course, Enrollment, LessonType, Schedule, Semester};
use crate::services::CourseService;
use crate::store::courses::{CourseChanges, NewCourse};
use crate::store::schedules::NewSchedule;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub credits: i32,
    pub instructor_id: i32,
    pub semester: Semester,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_code: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<Semester>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnrollStudentRequest {
    pub student_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateScheduleRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub classroom: String,
    pub lesson_type: LessonType,
}

/// Create a course. Admins and instructors only.
#[openapi(tag = "Courses")]
#[post("/courses", data = "<payload>")]
pub async fn create_course(
    service: &State<CourseService>,
    _staff: RequireStaff,
    payload: Json<CreateCourseRequest>,
) -> Result<Json<Course>, ApiError> {
    let payload = payload.into_inner();
    let course = service
        .create(NewCourse {
            title: payload.title,
            description: payload.description,
            course_code: payload.course_code,
            credits: payload.credits,
            instructor_id: payload.instructor_id,
            semester: payload.semester,
            year: payload.year,
        })
        .await?;
    Ok(Json(course))
}

#[openapi(tag = "Courses")]
#[get("/courses/<course_id>")]
pub async fn get_course(
    service: &State<CourseService>,
    course_id: i32,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(service.get(course_id).await?))
}

#[openapi(tag = "Courses")]
#[get("/courses?<semester>&<year>&<instructor_id>")]
pub async fn list_courses(
    service: &State<CourseService>,
    semester: Option<Semester>,
    year: Option<i32>,
    instructor_id: Option<i32>,
) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(service.list(semester, year, instructor_id).await?))
}

/// Update a course. The guard admits staff; the service then requires the
/// caller to be the owning instructor or an admin.
#[openapi(tag = "Courses")]
#[put("/courses/<course_id>", data = "<payload>")]
pub async fn update_course(
    service: &State<CourseService>,
    course_id: i32,
    staff: RequireStaff,
    payload: Json<UpdateCourseRequest>,
) -> Result<Json<Course>, ApiError> {
    let payload = payload.into_inner();
    let course = service
        .update(
            course_id,
            &staff.0,
            CourseChanges {
                title: payload.title,
                description: payload.description,
                course_code: payload.course_code,
                credits: payload.credits,
                semester: payload.semester,
                year: payload.year,
            },
        )
        .await?;
    Ok(Json(course))
}

#[openapi(tag = "Courses")]
#[delete("/courses/<course_id>")]
pub async fn delete_course(
    service: &State<CourseService>,
    course_id: i32,
    staff: RequireStaff,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(service.delete(course_id, &staff.0).await?))
}

/// Enroll a student into a course. Admin only; the enrollment starts ACTIVE.
#[openapi(tag = "Enrollments")]
#[post("/courses/<course_id>/enrollments", data = "<payload>")]
pub async fn enroll_student(
    service: &State<CourseService>,
    course_id: i32,
    _admin: RequireAdmin,
    payload: Json<EnrollStudentRequest>,
) -> Result<Json<Enrollment>, ApiError> {
    Ok(Json(service.enroll(course_id, payload.student_id).await?))
}

#[openapi(tag = "Enrollments")]
#[get("/courses/<course_id>/enrollments")]
pub async fn list_enrollments(
    service: &State<CourseService>,
    course_id: i32,
    _staff: RequireStaff,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    Ok(Json(service.enrollments(course_id).await?))
}

#[openapi(tag = "Schedules")]
#[get("/courses/<course_id>/schedule")]
pub async fn get_course_schedule(
    service: &State<CourseService>,
    course_id: i32,
    _user: AuthUser,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    Ok(Json(service.schedule(course_id).await?))
}

/// Add a schedule slot. Restricted to the course's instructor or an admin.
#[openapi(tag = "Schedules")]
#[post("/courses/<course_id>/schedule", data = "<payload>")]
pub async fn add_schedule_slot(
    service: &State<CourseService>,
    course_id: i32,
    staff: RequireStaff,
    payload: Json<CreateScheduleRequest>,
) -> Result<Json<Schedule>, ApiError> {
    let payload = payload.into_inner();
    let slot = service
        .add_schedule_slot(
            course_id,
            &staff.0,
            NewSchedule {
                course_id,
                start_time: payload.start_time,
                end_time: payload.end_time,
                classroom: payload.classroom,
                lesson_type: payload.lesson_type,
            },
        )
        .await?;
    Ok(Json(slot))
}

#[openapi(tag = "Schedules")]
#[delete("/schedule/<slot_id>")]
pub async fn delete_schedule_slot(
    service: &State<CourseService>,
    slot_id: i32,
    staff: RequireStaff,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(service.delete_schedule_slot(slot_id, &staff.0).await?))
}
