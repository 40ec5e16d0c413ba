use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::models::Instructor;
use crate::services::InstructorService;
use crate::store::instructors::NewInstructor;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateInstructorRequest {
    pub user_id: i32,
    pub position: String,
    pub department: String,
    pub academic_degree: String,
}

/// Create an instructor profile. Admin only; the linked user's role becomes
/// INSTRUCTOR as a side effect.
#[openapi(tag = "Instructors")]
#[post("/instructors", data = "<payload>")]
pub async fn create_instructor(
    service: &State<InstructorService>,
    _admin: RequireAdmin,
    payload: Json<CreateInstructorRequest>,
) -> Result<Json<Instructor>, ApiError> {
    let payload = payload.into_inner();
    let instructor = service
        .create(NewInstructor {
            user_id: payload.user_id,
            position: payload.position,
            department: payload.department,
            academic_degree: payload.academic_degree,
        })
        .await?;
    Ok(Json(instructor))
}

#[openapi(tag = "Instructors")]
#[get("/instructors/<instructor_id>")]
pub async fn get_instructor(
    service: &State<InstructorService>,
    instructor_id: i32,
) -> Result<Json<Instructor>, ApiError> {
    Ok(Json(service.get(instructor_id).await?))
}

/// List instructors, optionally filtered by department or by the course they
/// teach.
#[openapi(tag = "Instructors")]
#[get("/instructors?<department>&<course_id>")]
pub async fn list_instructors(
    service: &State<InstructorService>,
    department: Option<String>,
    course_id: Option<i32>,
) -> Result<Json<Vec<Instructor>>, ApiError> {
    Ok(Json(service.list(department, course_id).await?))
}
