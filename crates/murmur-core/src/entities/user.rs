//! User entity - an account that owns an anonymous-feedback inbox

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::Snowflake;

/// How long a verification code stays valid after issuance, in seconds.
pub const VERIFY_CODE_TTL_SECS: i64 = 3600;

/// User entity representing an inbox owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub verify_code: String,
    pub verify_code_expiry: DateTime<Utc>,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified User with a pending verification code
    ///
    /// The code expiry is set one hour out; the inbox starts open.
    pub fn new(id: Snowflake, username: String, email: String, verify_code: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            verify_code,
            verify_code_expiry: now + Duration::seconds(VERIFY_CODE_TTL_SECS),
            is_verified: false,
            is_accepting_messages: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the verification window has passed
    #[inline]
    pub fn verification_expired(&self) -> bool {
        Utc::now() >= self.verify_code_expiry
    }

    /// Check a submitted code against the stored one
    #[inline]
    pub fn code_matches(&self, code: &str) -> bool {
        self.verify_code == code
    }

    /// A user can sign in only once their email is verified
    #[inline]
    pub fn can_sign_in(&self) -> bool {
        self.is_verified
    }

    /// Mark the account as verified
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.updated_at = Utc::now();
    }

    /// Open or close the inbox for new anonymous messages
    pub fn set_accepting_messages(&mut self, accepting: bool) {
        self.is_accepting_messages = accepting;
        self.updated_at = Utc::now();
    }

    /// Replace the verification code and restart its expiry window
    pub fn reissue_verification(&mut self, verify_code: String) {
        let now = Utc::now();
        self.verify_code = verify_code;
        self.verify_code_expiry = now + Duration::seconds(VERIFY_CODE_TTL_SECS);
        self.updated_at = now;
    }
}

/// Generate a random 6-digit numeric verification code
pub fn generate_verify_code() -> String {
    use rand::Rng;

    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
