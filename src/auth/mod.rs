//! Authentication module: configuration, credential handling, token minting,
//! Rocket request guards, and HTTP route handlers.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod guards;
pub mod passwords;
pub mod responses;
pub mod routes;
pub mod tokens;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use guards::{AuthUser, RequireAdmin, RequireStaff};
pub use passwords::PasswordService;
pub use tokens::{TokenCodec, TokenKind};

#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub password_service: Arc<PasswordService>,
    pub token_codec: Arc<TokenCodec>,
}

impl AuthState {
    pub fn new(config: AuthConfig, password_service: PasswordService, token_codec: TokenCodec) -> Self {
        Self {
            config,
            password_service: Arc::new(password_service),
            token_codec: Arc::new(token_codec),
        }
    }
}
