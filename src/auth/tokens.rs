use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::auth::{AuthConfig, AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Bearer token class. Access and refresh tokens share the claim schema but
/// are signed with independent secrets and live independently, so a token of
/// one kind deterministically fails verification as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed claims payload: subject (username) and unix expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Transient access/refresh credential pair. Never persisted.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    pub fn from_config(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token past its exp is invalid, full stop.
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::minutes(config.refresh_ttl_minutes),
            validation,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn encoding_key(&self, kind: TokenKind) -> &EncodingKey {
        match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        }
    }

    fn decoding_key(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        }
    }

    /// Sign a token of `kind` for `subject`, expiring `ttl(kind)` after `now`.
    pub fn issue(&self, kind: TokenKind, subject: &str, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + self.ttl(kind)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, self.encoding_key(kind))?;
        Ok(token)
    }

    /// Issue a fresh access+refresh pair bound to the same subject.
    pub fn issue_pair(&self, subject: &str, now: DateTime<Utc>) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, subject, now)?,
            refresh_token: self.issue(TokenKind::Refresh, subject, now)?,
        })
    }

    /// Verify a token of `kind`, tolerating an optional `"Bearer "` prefix.
    ///
    /// Signature mismatch, malformed payload, and past expiry all collapse
    /// into [`AuthError::InvalidToken`]; callers answer 401 without learning
    /// which failure occurred.
    pub fn verify(&self, kind: TokenKind, token: &str) -> AuthResult<Claims> {
        let token = strip_bearer(token);
        let data = decode::<Claims>(token, self.decoding_key(kind), &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims)
    }
}

/// Strip the transport-level `"Bearer "` prefix if present.
pub fn strip_bearer(token: &str) -> &str {
    token.strip_prefix(BEARER_PREFIX).unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn make_test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-test-secret".into(),
            refresh_secret: "refresh-test-secret".into(),
            access_ttl_minutes: 1,
            refresh_ttl_minutes: 10,
            access_cookie_name: "access_token".into(),
            refresh_cookie_name: "refresh_token".into(),
            cookie_secure: false,
            default_role: UserRole::Admin,
        }
    }

    #[test]
    fn issues_and_verifies_both_kinds() {
        let codec = TokenCodec::from_config(&make_test_config());
        let now = Utc::now();

        let pair = codec.issue_pair("alice", now).expect("issue pair");

        let access = codec
            .verify(TokenKind::Access, &pair.access_token)
            .expect("access verifies");
        assert_eq!(access.sub, "alice");
        assert!(access.exp > now.timestamp());

        let refresh = codec
            .verify(TokenKind::Refresh, &pair.refresh_token)
            .expect("refresh verifies");
        assert_eq!(refresh.sub, "alice");
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn rejects_token_of_the_wrong_kind() {
        let codec = TokenCodec::from_config(&make_test_config());
        let pair = codec.issue_pair("alice", Utc::now()).expect("issue pair");

        assert!(codec.verify(TokenKind::Refresh, &pair.access_token).is_err());
        assert!(codec.verify(TokenKind::Access, &pair.refresh_token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let codec = TokenCodec::from_config(&make_test_config());
        let issued_at = Utc::now() - Duration::minutes(5);
        let token = codec
            .issue(TokenKind::Access, "alice", issued_at)
            .expect("issue token");

        assert!(matches!(
            codec.verify(TokenKind::Access, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_token_without_subject() {
        let config = make_test_config();
        let codec = TokenCodec::from_config(&config);

        #[derive(serde::Serialize)]
        struct BareClaims {
            exp: i64,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &BareClaims {
                exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            },
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .expect("encode claims");

        assert!(matches!(
            codec.verify(TokenKind::Access, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_tampered_token() {
        let codec = TokenCodec::from_config(&make_test_config());
        let token = codec
            .issue(TokenKind::Access, "alice", Utc::now())
            .expect("issue token");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(codec.verify(TokenKind::Access, &tampered).is_err());
        assert!(codec.verify(TokenKind::Access, "not-a-jwt").is_err());
    }

    #[test]
    fn tolerates_bearer_prefix() {
        let codec = TokenCodec::from_config(&make_test_config());
        let token = codec
            .issue(TokenKind::Access, "alice", Utc::now())
            .expect("issue token");

        let prefixed = format!("Bearer {token}");
        let claims = codec
            .verify(TokenKind::Access, &prefixed)
            .expect("prefixed token verifies");
        assert_eq!(claims.sub, "alice");

        let bare = codec
            .verify(TokenKind::Access, &token)
            .expect("bare token verifies");
        assert_eq!(bare.sub, "alice");
    }
}
