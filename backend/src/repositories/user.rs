//! User repository: accounts and the per-user streak record

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_trainer_shared::StreakState;
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Streak columns of a user row, with the version used for compare-and-set
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StreakRecord {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_workout_at: Option<DateTime<Utc>>,
    pub streak_version: i64,
}

impl StreakRecord {
    pub fn state(&self) -> StreakState {
        StreakState {
            current: u32::try_from(self.current_streak).unwrap_or(0),
            longest: u32::try_from(self.longest_streak).unwrap_or(0),
            last_workout_at: self.last_workout_at,
        }
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a user together with an empty training profile
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Current streak and its version; `None` if the user does not exist
    pub async fn get_streak(pool: &PgPool, user_id: Uuid) -> Result<Option<StreakRecord>> {
        let record = sqlx::query_as::<_, StreakRecord>(
            r#"
            SELECT current_streak, longest_streak, last_workout_at, streak_version
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Write a new streak only if nobody else has since `expected_version`
    ///
    /// Returns `false` when the version moved on and the caller must retry.
    pub async fn compare_and_set_streak(
        pool: &PgPool,
        user_id: Uuid,
        expected_version: i64,
        next: &StreakState,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                current_streak = $3,
                longest_streak = $4,
                last_workout_at = $5,
                streak_version = streak_version + 1,
                updated_at = NOW()
            WHERE id = $1 AND streak_version = $2
            "#,
        )
        .bind(user_id)
        .bind(expected_version)
        .bind(i32::try_from(next.current)?)
        .bind(i32::try_from(next.longest)?)
        .bind(next.last_workout_at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_streak_record_is_empty_state() {
        let record = StreakRecord {
            current_streak: 0,
            longest_streak: 0,
            last_workout_at: None,
            streak_version: 0,
        };
        assert!(record.state().is_empty());
        assert_eq!(record.state(), StreakState::empty());
    }

    #[test]
    fn test_streak_record_maps_counts() {
        let at = Utc::now();
        let record = StreakRecord {
            current_streak: 3,
            longest_streak: 7,
            last_workout_at: Some(at),
            streak_version: 12,
        };
        let state = record.state();
        assert_eq!((state.current, state.longest), (3, 7));
        assert_eq!(state.last_workout_at, Some(at));
    }
}
