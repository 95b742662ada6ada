//! Account service
//!
//! Handles registration, email verification, sign-in, the accepting-messages
//! flag, and account deletion.

use chrono::{Duration, Utc};
use murmur_common::auth::{hash_password, verify_password, IssuedSession};
use murmur_core::entities::User;
use murmur_core::{
    generate_verify_code, is_valid_username, DomainError, Snowflake, VERIFY_CODE_TTL_SECS,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    DeleteAccountRequest, SignInRequest, SignUpRequest, VerifyCodeRequest, USERNAME_RULES,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and send its verification code
    ///
    /// The registration record is persisted before the email goes out; a
    /// dispatch failure leaves the pending account in place so the same
    /// sign-up can be retried.
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: SignUpRequest) -> ServiceResult<()> {
        // Validate the username shape before touching the store
        if !is_valid_username(&request.username) {
            return Err(ServiceError::validation(USERNAME_RULES));
        }

        // Only verified holders make a username unavailable
        if self
            .ctx
            .user_repo()
            .verified_username_exists(&request.username)
            .await?
        {
            return Err(DomainError::UsernameTaken.into());
        }

        let password_hash = hash_password(&request.password).map_err(ServiceError::from)?;
        let verify_code = generate_verify_code();

        let user = match self.ctx.user_repo().find_by_email(&request.email).await? {
            Some(existing) if existing.is_verified => {
                warn!(user_id = %existing.id, "Registration rejected: email belongs to a verified account");
                return Err(DomainError::EmailAlreadyExists.into());
            }
            Some(_) => {
                // Unverified holder: take the registration over in place.
                // The stored username is kept; only the credentials and the
                // code window change.
                let expiry = Utc::now() + Duration::seconds(VERIFY_CODE_TTL_SECS);
                let reclaimed = self
                    .ctx
                    .user_repo()
                    .reclaim_unverified_by_email(
                        &request.email,
                        &password_hash,
                        &verify_code,
                        expiry,
                    )
                    .await?;

                match reclaimed {
                    Some(user) => user,
                    // A concurrent verification can land between the lookup
                    // and the guarded update
                    None => return Err(DomainError::EmailAlreadyExists.into()),
                }
            }
            None => {
                // Evict a stale unverified holder before claiming the
                // username; a live pending one surfaces as a unique violation
                let released = self
                    .ctx
                    .user_repo()
                    .release_expired_username(&request.username)
                    .await?;
                if released {
                    info!(username = %request.username, "Released expired unverified registration");
                }

                let user = User::new(
                    self.ctx.generate_id(),
                    request.username,
                    request.email,
                    verify_code,
                );
                self.ctx.user_repo().create(&user, &password_hash).await?;
                user
            }
        };

        info!(user_id = %user.id, "User registered, verification pending");

        self.ctx
            .mailer()
            .send_verification(&user.email, &user.username, &user.verify_code)
            .await
            .map_err(|e| {
                warn!(user_id = %user.id, error = %e, "Verification email did not go out");
                ServiceError::from(e)
            })?;

        Ok(())
    }

    /// Verify a pending account with its emailed code
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn verify_code(&self, request: VerifyCodeRequest) -> ServiceResult<()> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or(ServiceError::Domain(DomainError::UserNotFound))?;

        if user.is_verified {
            return Err(DomainError::AlreadyVerified.into());
        }

        // Expiry wins over correctness: a right code past the window still
        // requires a fresh sign-up
        if user.verification_expired() {
            return Err(DomainError::VerificationExpired.into());
        }

        if !user.code_matches(&request.code) {
            warn!(user_id = %user.id, "Verification failed: code mismatch");
            return Err(DomainError::IncorrectCode.into());
        }

        self.ctx.user_repo().mark_verified(user.id).await?;

        info!(user_id = %user.id, "User verified");
        Ok(())
    }

    /// Sign in with a username or email plus password
    #[instrument(skip(self, request), fields(identifier = %request.identifier))]
    pub async fn authenticate(
        &self,
        request: SignInRequest,
    ) -> ServiceResult<(IssuedSession, User)> {
        let user = self
            .ctx
            .user_repo()
            .find_by_identifier(&request.identifier)
            .await?
            .ok_or_else(|| {
                warn!("Sign-in failed: no matching account");
                ServiceError::Domain(DomainError::InvalidCredentials)
            })?;

        // Verification is checked before the password
        if !user.can_sign_in() {
            warn!(user_id = %user.id, "Sign-in rejected: account not verified");
            return Err(DomainError::NotVerified.into());
        }

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Sign-in failed: no password hash");
                ServiceError::Domain(DomainError::InvalidCredentials)
            })?;

        let is_valid =
            verify_password(&request.password, &password_hash).map_err(ServiceError::from)?;

        if !is_valid {
            warn!(user_id = %user.id, "Sign-in failed: wrong password");
            return Err(DomainError::InvalidCredentials.into());
        }

        let session = self
            .ctx
            .session_service()
            .issue(&user)
            .map_err(ServiceError::from)?;

        info!(user_id = %user.id, "User signed in");
        Ok((session, user))
    }

    /// Read the accepting-messages flag from the store
    ///
    /// Session claims carry a snapshot of this flag, but it can go stale the
    /// moment the owner toggles it; this reads the current value.
    #[instrument(skip(self))]
    pub async fn get_accepting_messages(&self, user_id: Snowflake) -> ServiceResult<bool> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::UserNotFound))?;

        Ok(user.is_accepting_messages)
    }

    /// Open or close the caller's inbox, returning the updated user
    #[instrument(skip(self))]
    pub async fn set_accepting_messages(
        &self,
        user_id: Snowflake,
        accepting: bool,
    ) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .set_accepting_messages(user_id, accepting)
            .await?
            .ok_or(ServiceError::Domain(DomainError::UserNotFound))?;

        info!(user_id = %user_id, accepting, "Inbox acceptance updated");
        Ok(user)
    }

    /// Delete the caller's account and, by cascade, every received message
    ///
    /// The request must repeat the account's username exactly; anything else
    /// is rejected without touching the record.
    #[instrument(skip(self, request))]
    pub async fn delete_account(
        &self,
        user_id: Snowflake,
        request: DeleteAccountRequest,
    ) -> ServiceResult<()> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::UserNotFound))?;

        if user.username != request.username {
            warn!(user_id = %user_id, "Account deletion rejected: confirmation mismatch");
            return Err(ServiceError::validation(
                "Username confirmation does not match",
            ));
        }

        self.ctx.user_repo().delete(user_id).await?;

        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
