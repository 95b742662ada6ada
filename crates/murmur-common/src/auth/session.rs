//! Session credential utilities
//!
//! Issues and verifies the signed session token (HS256 JWT) used for
//! authenticated endpoints. The claims carry a denormalized snapshot of the
//! user at sign-in time; they are only refreshed by re-authenticating, so the
//! accepting-messages flag in a live token can lag behind the store.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use murmur_core::{Snowflake, User};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name of the http-only cookie carrying the session token
pub const SESSION_COOKIE: &str = "murmur_session";

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Username at issuance time
    pub username: String,
    /// Email at issuance time
    pub email: String,
    /// Whether the account was verified at issuance time
    pub verified: bool,
    /// Accepting-messages snapshot; the store is the live source
    #[serde(rename = "acceptingMessages")]
    pub accepting_messages: bool,
    /// Session ID
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Get the user ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a Snowflake
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        self.sub
            .parse::<i64>()
            .map(Snowflake::new)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// A freshly issued session credential
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub expires_in: i64,
}

/// Service for issuing and verifying session tokens
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: i64,
}

impl SessionService {
    /// Create a new session service with the given secret and lifetime
    #[must_use]
    pub fn new(secret: &str, session_ttl: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
        }
    }

    /// Issue a session token for an authenticated user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, user: &User) -> Result<IssuedSession, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            verified: user.is_verified,
            accepting_messages: user.is_accepting_messages,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.session_ttl)).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode session token")))?;

        Ok(IssuedSession {
            token,
            expires_in: self.session_ttl,
        })
    }

    /// Decode and validate a session token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let validation = Validation::default();

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Lifetime of issued sessions, in seconds
    #[must_use]
    pub fn session_ttl(&self) -> i64 {
        self.session_ttl
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}
