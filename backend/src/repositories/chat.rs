//! Conversation transcript store
//!
//! Append-only per user. Order is `(created_at, seq)`; `seq` settles turns
//! written within the same timestamp.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use fitness_trainer_shared::{ChatRole, ChatTurn};
use sqlx::PgPool;
use uuid::Uuid;

/// Transcript row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatMessageRecord {
    pub seq: i64,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageRecord {
    pub fn role(&self) -> Result<ChatRole> {
        self.role.parse().map_err(|e: String| anyhow!(e))
    }
}

impl TryFrom<ChatMessageRecord> for ChatTurn {
    type Error = anyhow::Error;

    fn try_from(record: ChatMessageRecord) -> Result<Self> {
        Ok(ChatTurn {
            role: record.role()?,
            content: record.content,
        })
    }
}

pub struct ChatRepository;

impl ChatRepository {
    /// The `limit` newest messages, newest first
    pub async fn recent(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessageRecord>> {
        let records = sqlx::query_as::<_, ChatMessageRecord>(
            r#"
            SELECT seq, role, content, created_at
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// The `limit` newest messages in reading order (oldest first)
    pub async fn history(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessageRecord>> {
        let mut records = Self::recent(pool, user_id, limit).await?;
        records.reverse();
        Ok(records)
    }

    /// Persist a user message and the assistant reply as one unit
    pub async fn append_exchange(
        pool: &PgPool,
        user_id: Uuid,
        message: &str,
        sent_at: DateTime<Utc>,
        reply: &str,
        replied_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = pool.begin().await?;

        for (role, content, created_at) in [
            (ChatRole::User, message, sent_at),
            (ChatRole::Assistant, reply, replied_at),
        ] {
            sqlx::query(
                r#"
                INSERT INTO chat_messages (user_id, role, content, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_id)
            .bind(role.as_str())
            .bind(content)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn count(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_messages WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Delete the whole transcript; returns how many messages went
    pub async fn clear(pool: &PgPool, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_turn() {
        let record = ChatMessageRecord {
            seq: 1,
            role: "assistant".to_string(),
            content: "Drink water".to_string(),
            created_at: Utc::now(),
        };
        let turn = ChatTurn::try_from(record).unwrap();
        assert_eq!(turn, ChatTurn::assistant("Drink water"));
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let record = ChatMessageRecord {
            seq: 1,
            role: "system".to_string(),
            content: String::new(),
            created_at: Utc::now(),
        };
        assert!(ChatTurn::try_from(record).is_err());
    }
}
