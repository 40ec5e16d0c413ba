use crate::auth::{AuthError, AuthResult};
use crate::models::UserRole;

/// Authentication configuration loaded from environment variables.
///
/// Access and refresh tokens are signed with independent secrets and live
/// independently; TTLs are configured in minutes to match the deployment
/// convention and converted to seconds where cookies need them.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    pub cookie_secure: bool,
    /// Role assigned to self-registered users. Defaults to `Admin`, matching
    /// the historical behavior; almost certainly a policy gap, kept explicit
    /// here so deployments can override it (`UNIVERSITY_DEFAULT_ROLE`).
    pub default_role: UserRole,
}

impl AuthConfig {
    pub fn from_env() -> AuthResult<Self> {
        let access_secret = std::env::var("UNIVERSITY_ACCESS_SECRET")
            .map_err(|_| AuthError::Config("UNIVERSITY_ACCESS_SECRET is required".into()))?;
        let refresh_secret = std::env::var("UNIVERSITY_REFRESH_SECRET")
            .map_err(|_| AuthError::Config("UNIVERSITY_REFRESH_SECRET is required".into()))?;
        let access_ttl_minutes = std::env::var("UNIVERSITY_ACCESS_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);
        let refresh_ttl_minutes = std::env::var("UNIVERSITY_REFRESH_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7 * 24 * 60);
        let access_cookie_name = std::env::var("UNIVERSITY_ACCESS_COOKIE_NAME")
            .unwrap_or_else(|_| "access_token".into());
        let refresh_cookie_name = std::env::var("UNIVERSITY_REFRESH_COOKIE_NAME")
            .unwrap_or_else(|_| "refresh_token".into());
        let cookie_secure = std::env::var("UNIVERSITY_COOKIE_SECURE")
            .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "on"))
            .unwrap_or(true);
        let default_role = match std::env::var("UNIVERSITY_DEFAULT_ROLE").as_deref() {
            Ok("student") => UserRole::Student,
            Ok("instructor") => UserRole::Instructor,
            _ => UserRole::Admin,
        };

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl_minutes,
            refresh_ttl_minutes,
            access_cookie_name,
            refresh_cookie_name,
            cookie_secure,
            default_role,
        })
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_minutes * 60
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_minutes * 60
    }
}
