use rocket::Request;
use rocket::State;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket_okapi::request::OpenApiFromRequest;

use crate::auth::{AuthError, AuthResult, AuthState, TokenKind};
use crate::models::{User, UserRole};
use crate::store::users::UserStore;

/// The caller's resolved identity, derived from the access-token cookie.
///
/// Resolution order: cookie present, signature/expiry valid, subject claim
/// present, subject resolves to a stored user, user still active. The first
/// four failures are 401; a deactivated user is 403 so a still-valid token
/// for a disabled account is distinguishable from a bad token.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.0.user_role, UserRole::Admin)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.0.user_role, UserRole::Admin | UserRole::Instructor)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match resolve_user(request).await {
            Ok(user) => Outcome::Success(AuthUser(user)),
            Err(err) => Outcome::Error((err.status(), err)),
        }
    }
}

/// Base resolution plus `role == ADMIN`.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct RequireAdmin(pub AuthUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequireAdmin {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthUser::from_request(request).await {
            Outcome::Success(user) => {
                if user.is_admin() {
                    Outcome::Success(RequireAdmin(user))
                } else {
                    Outcome::Error((Status::Forbidden, AuthError::Forbidden))
                }
            }
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Forward(_) => Outcome::Error((Status::Unauthorized, AuthError::TokenMissing)),
        }
    }
}

/// Base resolution plus `role in {ADMIN, INSTRUCTOR}`.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct RequireStaff(pub AuthUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequireStaff {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthUser::from_request(request).await {
            Outcome::Success(user) => {
                if user.is_staff() {
                    Outcome::Success(RequireStaff(user))
                } else {
                    Outcome::Error((Status::Forbidden, AuthError::Forbidden))
                }
            }
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Forward(_) => Outcome::Error((Status::Unauthorized, AuthError::TokenMissing)),
        }
    }
}

async fn resolve_user(request: &Request<'_>) -> AuthResult<User> {
    let auth_state = request
        .guard::<&State<AuthState>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("AuthState missing from state".into()))?;

    let user_store = request
        .guard::<&State<UserStore>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("UserStore missing from state".into()))?;

    let cookie = request
        .cookies()
        .get(&auth_state.config.access_cookie_name)
        .ok_or(AuthError::TokenMissing)?;

    let claims = auth_state
        .token_codec
        .verify(TokenKind::Access, cookie.value())?;

    let user = user_store
        .find_by_username(&claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !user.is_active {
        return Err(AuthError::Deactivated);
    }

    Ok(user)
}
