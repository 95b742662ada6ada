//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use murmur_core::{Message, MessageRepository, RepoResult, Snowflake};

use crate::mappers::MessageInsert;
use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        let insert = MessageInsert::new(message);

        sqlx::query(
            r"
            INSERT INTO messages (id, recipient_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(insert.id)
        .bind(insert.recipient_id)
        .bind(insert.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_recipient(&self, recipient_id: Snowflake) -> RepoResult<Vec<Message>> {
        // Ties on created_at fall back to id, which is also time-ordered
        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, recipient_id, content, created_at
            FROM messages
            WHERE recipient_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(recipient_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_owned(
        &self,
        recipient_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<bool> {
        // Scoping to the recipient keeps one owner from deleting another's mail
        let result = sqlx::query(
            r"
            DELETE FROM messages
            WHERE id = $1 AND recipient_id = $2
            ",
        )
        .bind(message_id.into_inner())
        .bind(recipient_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn count_by_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM messages WHERE recipient_id = $1
            ",
        )
        .bind(recipient_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
