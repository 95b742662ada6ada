//! Message entity - an anonymous note left in a user's inbox

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Message entity
///
/// Owned by exactly one recipient and never edited after creation; the only
/// mutation it ever sees is deletion by its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub recipient_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message addressed to a recipient
    pub fn new(id: Snowflake, recipient_id: Snowflake, content: String) -> Self {
        Self {
            id,
            recipient_id,
            content,
            created_at: Utc::now(),
        }
    }
}
