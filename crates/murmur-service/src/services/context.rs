//! Service context - dependency container for services
//!
//! Holds the repositories, outbound mailer, and session machinery that the
//! account and inbox services run against. Everything behind a trait object
//! here can be swapped for an in-memory double in tests.

use std::sync::Arc;

use murmur_common::SessionService;
use murmur_core::traits::{MessageRepository, UserRepository, VerificationMailer};
use murmur_core::{Snowflake, SnowflakeGenerator};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services.
/// It provides access to:
/// - The user and message repositories
/// - The verification mailer
/// - The session service for issuing and verifying tokens
/// - The Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    message_repo: Arc<dyn MessageRepository>,

    // Outbound email
    mailer: Arc<dyn VerificationMailer>,

    // Services
    session_service: Arc<SessionService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        message_repo: Arc<dyn MessageRepository>,
        mailer: Arc<dyn VerificationMailer>,
        session_service: Arc<SessionService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo,
            message_repo,
            mailer,
            session_service,
            snowflake_generator,
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    // === Outbound Email ===

    /// Get the verification mailer
    pub fn mailer(&self) -> &dyn VerificationMailer {
        self.mailer.as_ref()
    }

    // === Services ===

    /// Get the session service
    pub fn session_service(&self) -> &SessionService {
        self.session_service.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("mailer", &"...")
            .field("session_service", &"SessionService")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    mailer: Option<Arc<dyn VerificationMailer>>,
    session_service: Option<Arc<SessionService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            message_repo: None,
            mailer: None,
            session_service: None,
            snowflake_generator: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn mailer(mut self, mailer: Arc<dyn VerificationMailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn session_service(mut self, service: Arc<SessionService>) -> Self {
        self.session_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| super::error::ServiceError::internal("user_repo is required"))?,
            self.message_repo
                .ok_or_else(|| super::error::ServiceError::internal("message_repo is required"))?,
            self.mailer
                .ok_or_else(|| super::error::ServiceError::internal("mailer is required"))?,
            self.session_service
                .ok_or_else(|| {
                    super::error::ServiceError::internal("session_service is required")
                })?,
            self.snowflake_generator.ok_or_else(|| {
                super::error::ServiceError::internal("snowflake_generator is required")
            })?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
