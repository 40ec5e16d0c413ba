use chrono::Utc;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, post};
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use time::Duration as TimeDuration;

use crate::auth::responses::{LoginRequest, RegisterRequest, RegisterResponse, TokenPairResponse};
use crate::auth::tokens::TokenPair;
use crate::auth::{AuthError, AuthState, TokenKind};
use crate::store::users::{NewUser, UserStore};

type AuthRouteResult<T> = Result<Json<T>, status::Custom<Json<AuthErrorResponse>>>;

#[derive(Debug, serde::Serialize, JsonSchema)]
pub struct AuthErrorResponse {
    pub status: u16,
    pub message: String,
}

/// Create a new account. The assigned role comes from
/// `AuthConfig::default_role`; no cookies are set, the caller still has to
/// log in.
#[openapi(tag = "Auth")]
#[post("/auth/register", data = "<payload>")]
pub async fn register(
    state: &State<AuthState>,
    user_store: &State<UserStore>,
    payload: Json<RegisterRequest>,
) -> AuthRouteResult<RegisterResponse> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(respond_message(
            Status::BadRequest,
            "Username and password are required",
        ));
    }

    let existing = user_store
        .find_by_username(username)
        .await
        .map_err(|err| respond_error(AuthError::from(err)))?;
    if existing.is_some() {
        return Err(respond_message(
            Status::Conflict,
            "Username is already registered",
        ));
    }

    let hash = state
        .password_service
        .hash_password(&payload.password)
        .map_err(respond_error)?;

    let user = user_store
        .insert(NewUser {
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            username: username.to_string(),
            password_hash: hash,
            role: state.config.default_role,
        })
        .await
        .map_err(|err| respond_message(Status::Conflict, format!("failed to create user: {err}")))?;

    Ok(Json(RegisterResponse {
        first_name: user.first_name,
        last_name: user.last_name,
        username: user.username,
        password: user.password,
        user_role: user.user_role,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }))
}

/// Exchange credentials for an access+refresh pair. Both tokens are also set
/// as bearer cookies. A deactivated account can still log in; the guard layer
/// rejects its requests with 403 instead.
#[openapi(tag = "Auth")]
#[post("/auth/login", data = "<payload>")]
pub async fn login(
    state: &State<AuthState>,
    user_store: &State<UserStore>,
    cookies: &CookieJar<'_>,
    payload: Json<LoginRequest>,
) -> AuthRouteResult<TokenPairResponse> {
    let user = user_store
        .find_by_username(payload.username.trim())
        .await
        .map_err(|err| respond_error(AuthError::from(err)))?;

    let user = match user {
        Some(user) => user,
        None => return Err(respond_error(AuthError::InvalidCredentials)),
    };

    let verified = state
        .password_service
        .verify_password(&payload.password, &user.password)
        .map_err(respond_error)?;
    if !verified {
        return Err(respond_error(AuthError::InvalidCredentials));
    }

    let pair = state
        .token_codec
        .issue_pair(&user.username, Utc::now())
        .map_err(respond_error)?;

    set_token_cookies(cookies, state, &pair);

    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// Rotate the token pair using the refresh cookie. A new access and a new
/// refresh token are issued; the old refresh token is not reused but stays
/// valid until its natural expiry (stateless design, no revocation list).
#[openapi(tag = "Auth")]
#[post("/auth/refresh")]
pub async fn refresh(
    state: &State<AuthState>,
    user_store: &State<UserStore>,
    cookies: &CookieJar<'_>,
) -> AuthRouteResult<TokenPairResponse> {
    let refresh_cookie = match cookies.get(&state.config.refresh_cookie_name) {
        Some(cookie) => cookie.value().to_string(),
        None => return Err(respond_error(AuthError::TokenMissing)),
    };

    let claims = state
        .token_codec
        .verify(TokenKind::Refresh, &refresh_cookie)
        .map_err(respond_error)?;

    let user = user_store
        .find_by_username(&claims.sub)
        .await
        .map_err(|err| respond_error(AuthError::from(err)))?
        .ok_or_else(|| respond_error(AuthError::UserNotFound))?;

    let pair = state
        .token_codec
        .issue_pair(&user.username, Utc::now())
        .map_err(respond_error)?;

    set_token_cookies(cookies, state, &pair);

    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// Clear both bearer cookies. Idempotent; issued tokens remain valid until
/// expiry because nothing is tracked server-side.
#[openapi(tag = "Auth")]
#[post("/auth/logout")]
pub async fn logout(state: &State<AuthState>, cookies: &CookieJar<'_>) -> Status {
    clear_token_cookies(cookies, state);
    Status::NoContent
}

fn respond_error(err: AuthError) -> status::Custom<Json<AuthErrorResponse>> {
    let status = err.status();
    status::Custom(
        status,
        Json(AuthErrorResponse {
            status: status.code,
            message: err.to_string(),
        }),
    )
}

fn respond_message(
    status: Status,
    message: impl Into<String>,
) -> status::Custom<Json<AuthErrorResponse>> {
    status::Custom(
        status,
        Json(AuthErrorResponse {
            status: status.code,
            message: message.into(),
        }),
    )
}

fn set_token_cookies(cookies: &CookieJar<'_>, state: &State<AuthState>, pair: &TokenPair) {
    let entries = [
        (
            state.config.access_cookie_name.clone(),
            &pair.access_token,
            state.config.access_ttl_secs(),
        ),
        (
            state.config.refresh_cookie_name.clone(),
            &pair.refresh_token,
            state.config.refresh_ttl_secs(),
        ),
    ];

    for (name, token, max_age_secs) in entries {
        let cookie = Cookie::build((name, format!("Bearer {token}")))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(state.config.cookie_secure)
            .max_age(TimeDuration::seconds(max_age_secs))
            .build();
        cookies.add(cookie);
    }
}

fn clear_token_cookies(cookies: &CookieJar<'_>, state: &State<AuthState>) {
    for name in [
        state.config.access_cookie_name.clone(),
        state.config.refresh_cookie_name.clone(),
    ] {
        let cookie = Cookie::build((name, String::new()))
            .path("/")
            .removal()
            .build();
        cookies.add(cookie);
    }
}
