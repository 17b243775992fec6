//! Admin authentication: password hashing and session tokens.
//!
//! Passwords are stored as Argon2id PHC strings. A successful login yields
//! an HS256 JWT carrying `{id, username}` that stays valid for seven days;
//! the token itself is the session, nothing is stored server-side.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::repos::{AdminRepo, DbError};

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "admin_session";

/// Session lifetime in seconds (7 days)
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Minimal descriptor of an authenticated admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub id: i32,
    pub username: String,
}

/// JWT claims. Field types are enforced on decode.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
    username: String,
    iat: i64,
    nbf: i64,
    exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("session secret must not be empty")]
    EmptySecret,

    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Issues and verifies session tokens, checks credentials.
#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthService {
    /// Build from the shared signing secret.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "iat"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Check credentials against the admin table.
    ///
    /// Unknown user and wrong password both yield `Ok(None)`.
    pub async fn authenticate(
        &self,
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<Option<AdminSession>, AuthError> {
        let Some(admin) = AdminRepo::new(pool).find_by_username(username).await? else {
            tracing::debug!(username, "login for unknown admin");
            return Ok(None);
        };

        let password = password.to_owned();
        let hash = admin.password.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        if !valid {
            tracing::debug!(username, "login with wrong password");
            return Ok(None);
        }

        Ok(Some(AdminSession {
            id: admin.id,
            username: admin.username,
        }))
    }

    /// Sign a token for `session`, valid from now for seven days.
    pub fn issue_token(&self, session: &AdminSession) -> Result<String, AuthError> {
        self.issue_token_at(session, Utc::now())
    }

    /// Sign a token as if issued at `issued_at`.
    pub fn issue_token_at(
        &self,
        session: &AdminSession,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            id: session.id,
            username: session.username.clone(),
            iat,
            nbf: iat,
            exp: (issued_at + Duration::seconds(SESSION_MAX_AGE_SECS)).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify signature, expiry and not-before; return the embedded session.
    pub fn verify_token(&self, token: &str) -> Result<AdminSession, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(AdminSession {
            id: data.claims.id,
            username: data.claims.username,
        })
    }

    /// Whether `token` is a currently valid session token.
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify_token(token).is_ok()
    }
}

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash. Unparseable hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
