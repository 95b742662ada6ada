//! Message entity <-> model mapper

use murmur_core::{Message, Snowflake};

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            recipient_id: Snowflake::new(model.recipient_id),
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// Convert Message entity reference to values for database insertion
pub struct MessageInsert<'a> {
    pub id: i64,
    pub recipient_id: i64,
    pub content: &'a str,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            recipient_id: message.recipient_id.into_inner(),
            content: &message.content,
        }
    }
}
