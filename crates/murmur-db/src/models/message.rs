//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
