//! Training profile repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_trainer_shared::ProfileSnapshot;
use sqlx::PgPool;
use uuid::Uuid;

/// Training profile row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub fitness_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub equipment: Vec<String>,
    pub workout_duration: Option<i32>,
    pub injuries: Vec<String>,
    pub weekly_workouts: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRecord> for ProfileSnapshot {
    fn from(record: ProfileRecord) -> Self {
        ProfileSnapshot {
            fitness_level: record.fitness_level,
            fitness_goal: record.fitness_goal,
            equipment: record.equipment,
            workout_duration: record.workout_duration.and_then(|m| u32::try_from(m).ok()),
            injuries: record.injuries,
            weekly_workouts: record.weekly_workouts.and_then(|w| u32::try_from(w).ok()),
        }
    }
}

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT user_id, fitness_level, fitness_goal, equipment, workout_duration,
                   injuries, weekly_workouts, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Replace the whole profile, creating the row if needed
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        profile: &ProfileSnapshot,
    ) -> Result<ProfileRecord> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            INSERT INTO user_profiles (user_id, fitness_level, fitness_goal, equipment,
                                       workout_duration, injuries, weekly_workouts)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                fitness_level = EXCLUDED.fitness_level,
                fitness_goal = EXCLUDED.fitness_goal,
                equipment = EXCLUDED.equipment,
                workout_duration = EXCLUDED.workout_duration,
                injuries = EXCLUDED.injuries,
                weekly_workouts = EXCLUDED.weekly_workouts,
                updated_at = NOW()
            RETURNING user_id, fitness_level, fitness_goal, equipment, workout_duration,
                      injuries, weekly_workouts, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&profile.fitness_level)
        .bind(&profile.fitness_goal)
        .bind(&profile.equipment)
        .bind(profile.workout_duration.and_then(|m| i32::try_from(m).ok()))
        .bind(&profile.injuries)
        .bind(profile.weekly_workouts.and_then(|w| i32::try_from(w).ok()))
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
