use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::auth::RequireAdmin;
use crate::error::{ApiError, write_conflict};
use crate::models::Faculty;
use crate::store::catalog::FacultyStore;

/// Create a faculty. Admin only; the name arrives as a query parameter to
/// match the historical API shape.
#[openapi(tag = "Faculty")]
#[post("/faculty?<name>")]
pub async fn create_faculty(
    store: &State<FacultyStore>,
    name: String,
    _admin: RequireAdmin,
) -> Result<Json<Faculty>, ApiError> {
    let faculty = store
        .insert(&name)
        .await
        .map_err(|err| write_conflict("failed to create faculty", err))?;
    Ok(Json(faculty))
}

#[openapi(tag = "Faculty")]
#[delete("/faculty/<faculty_id>")]
pub async fn delete_faculty(
    store: &State<FacultyStore>,
    faculty_id: i32,
    _admin: RequireAdmin,
) -> Result<Json<bool>, ApiError> {
    let deleted = store
        .delete_by_id(faculty_id)
        .await
        .map_err(|err| write_conflict("failed to delete faculty", err))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Faculty {faculty_id} not found")));
    }
    Ok(Json(true))
}
