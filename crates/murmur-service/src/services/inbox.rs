//! Inbox service
//!
//! Handles anonymous message submission, the owner's inbox listing and
//! deletes, and the public username availability check.

use murmur_core::entities::Message;
use murmur_core::{is_valid_username, DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{SendMessageRequest, USERNAME_RULES};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Inbox service
pub struct InboxService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InboxService<'a> {
    /// Create a new InboxService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit an anonymous message to a user's public link
    ///
    /// Unverified recipients are still addressable; only the
    /// accepting-messages flag closes an inbox. Nothing about the sender is
    /// recorded, and the content never reaches the logs.
    #[instrument(skip(self, request), fields(target = %request.username))]
    pub async fn submit_message(&self, request: SendMessageRequest) -> ServiceResult<()> {
        let target = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or(ServiceError::Domain(DomainError::UserNotFound))?;

        if !target.is_accepting_messages {
            warn!(recipient_id = %target.id, "Message rejected: inbox closed");
            return Err(DomainError::NotAcceptingMessages.into());
        }

        let message = Message::new(self.ctx.generate_id(), target.id, request.content);
        self.ctx.message_repo().create(&message).await?;

        info!(recipient_id = %target.id, message_id = %message.id, "Anonymous message delivered");
        Ok(())
    }

    /// List the caller's messages, newest first
    ///
    /// An empty inbox is an ordinary empty list, not an error.
    #[instrument(skip(self))]
    pub async fn list_messages(&self, user_id: Snowflake) -> ServiceResult<Vec<Message>> {
        // A live session can outlast its account row
        if self.ctx.user_repo().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound.into());
        }

        Ok(self.ctx.message_repo().find_by_recipient(user_id).await?)
    }

    /// Delete one message from the caller's inbox
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<()> {
        let removed = self
            .ctx
            .message_repo()
            .delete_owned(user_id, message_id)
            .await?;

        if !removed {
            return Err(DomainError::MessageNotFound.into());
        }

        info!(user_id = %user_id, message_id = %message_id, "Message deleted");
        Ok(())
    }

    /// Check whether a username is free to claim
    ///
    /// Available means no verified holder; a pending unverified registration
    /// does not reserve the name.
    #[instrument(skip(self))]
    pub async fn check_username_available(&self, username: &str) -> ServiceResult<bool> {
        if !is_valid_username(username) {
            return Err(ServiceError::validation(USERNAME_RULES));
        }

        let taken = self
            .ctx
            .user_repo()
            .verified_username_exists(username)
            .await?;

        Ok(!taken)
    }
}
