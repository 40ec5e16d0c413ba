use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::openapi;

use crate::auth::RequireAdmin;
use crate::error::{ApiError, write_conflict};
use crate::models::Group;
use crate::store::catalog::GroupStore;

/// Create a group. Admin only; the name arrives as a query parameter to
/// match the historical API shape.
#[openapi(tag = "Groups")]
#[post("/groups?<name>")]
pub async fn create_group(
    store: &State<GroupStore>,
    name: String,
    _admin: RequireAdmin,
) -> Result<Json<Group>, ApiError> {
    let group = store
        .insert(&name)
        .await
        .map_err(|err| write_conflict("failed to create group", err))?;
    Ok(Json(group))
}

#[openapi(tag = "Groups")]
#[delete("/groups/<group_id>")]
pub async fn delete_group(
    store: &State<GroupStore>,
    group_id: i32,
    _admin: RequireAdmin,
) -> Result<Json<bool>, ApiError> {
    let deleted = store
        .delete_by_id(group_id)
        .await
        .map_err(|err| write_conflict("failed to delete group", err))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Group {group_id} not found")));
    }
    Ok(Json(true))
}
