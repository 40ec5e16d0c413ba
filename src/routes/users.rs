use rocket::State;
use rocket::serde::json::Json;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{UserInfo, UserListResponse};
use crate::services::UserService;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// List all active users. The admin check lives in the service so the route
/// reports 403 with a message rather than a bare guard failure.
#[openapi(tag = "Users")]
#[post("/users")]
pub async fn list_users(
    service: &State<UserService>,
    user: AuthUser,
) -> Result<Json<UserListResponse>, ApiError> {
    Ok(Json(service.list_all(&user).await?))
}

#[openapi(tag = "Users")]
#[get("/users/<user_id>")]
pub async fn get_user(
    service: &State<UserService>,
    user_id: i32,
    _user: AuthUser,
) -> Result<Json<UserInfo>, ApiError> {
    Ok(Json(service.get(user_id).await?))
}

/// Update a profile. Allowed for the profile owner or an admin.
#[openapi(tag = "Users")]
#[put("/users/<user_id>", data = "<payload>")]
pub async fn update_user(
    service: &State<UserService>,
    user_id: i32,
    user: AuthUser,
    payload: Json<UpdateUserRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    let updated = service
        .update(
            user_id,
            &user,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
        )
        .await?;
    Ok(Json(updated))
}

/// Deactivate (soft-delete) a user. Allowed for the user themselves or an
/// admin.
#[openapi(tag = "Users")]
#[delete("/users/deactivate/<user_id>")]
pub async fn deactivate_user(
    service: &State<UserService>,
    user_id: i32,
    user: AuthUser,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(service.deactivate(user_id, &user).await?))
}

/// Reactivate a user. Admin only.
#[openapi(tag = "Users")]
#[patch("/users/activate/<user_id>")]
pub async fn activate_user(
    service: &State<UserService>,
    user_id: i32,
    user: AuthUser,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(service.activate(user_id, &user).await?))
}
