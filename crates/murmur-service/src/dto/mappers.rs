//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use murmur_core::entities::{Message, User};

use super::responses::{MessageResponse, UserResponse};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
            is_accepting_messages: user.is_accepting_messages,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}
