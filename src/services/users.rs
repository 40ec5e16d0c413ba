use crate::auth::AuthUser;
use crate::error::{ApiError, write_conflict};
use crate::models::{UserInfo, UserListResponse};
use crate::store::users::UserStore;

#[derive(Clone)]
pub struct UserService {
    users: UserStore,
}

impl UserService {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }

    pub async fn list_all(&self, caller: &AuthUser) -> Result<UserListResponse, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden("Only admin can get all users".into()));
        }

        let users = self.users.list_active().await?;
        Ok(UserListResponse {
            users: users.iter().map(UserInfo::from).collect(),
        })
    }

    pub async fn get(&self, user_id: i32) -> Result<UserInfo, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")))?;
        Ok(UserInfo::from(&user))
    }

    pub async fn update(
        &self,
        user_id: i32,
        caller: &AuthUser,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<UserInfo, ApiError> {
        self.get(user_id).await?;

        if caller.id() != user_id && !caller.is_admin() {
            return Err(ApiError::Forbidden("You can only update yourself".into()));
        }

        let user = self
            .users
            .update_profile(user_id, first_name, last_name)
            .await
            .map_err(|err| write_conflict("failed to update user", err))?
            .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")))?;

        Ok(UserInfo::from(&user))
    }

    /// Soft delete: flips `is_active` off, the row stays.
    pub async fn deactivate(&self, user_id: i32, caller: &AuthUser) -> Result<bool, ApiError> {
        self.get(user_id).await?;

        if caller.id() != user_id && !caller.is_admin() {
            return Err(ApiError::Forbidden("You can only delete yourself".into()));
        }

        self.users
            .set_active(user_id, false)
            .await
            .map_err(|err| write_conflict("failed to deactivate user", err))?;
        Ok(true)
    }

    pub async fn activate(&self, user_id: i32, caller: &AuthUser) -> Result<bool, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden("Only admin can activate a user".into()));
        }

        self.get(user_id).await?;

        self.users
            .set_active(user_id, true)
            .await
            .map_err(|err| write_conflict("failed to activate user", err))?;
        Ok(true)
    }
}
