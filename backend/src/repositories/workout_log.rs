//! Workout event store
//!
//! Events are written once and only ever read or deleted afterwards. Every
//! query is scoped by the owning user id.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use fitness_trainer_shared::{ActivityTotals, ExerciseEntry, NewWorkout, WorkoutEvent};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Workout log row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_name: String,
    pub exercises: Json<Vec<ExerciseEntry>>,
    pub duration_minutes: Decimal,
    pub calories_burned: Decimal,
    pub difficulty: String,
    pub mood: String,
    pub notes: String,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WorkoutLogRecord> for WorkoutEvent {
    type Error = anyhow::Error;

    fn try_from(record: WorkoutLogRecord) -> Result<Self> {
        Ok(WorkoutEvent {
            id: record.id,
            user_id: record.user_id,
            workout_name: record.workout_name,
            exercises: record.exercises.0,
            duration_minutes: record.duration_minutes.to_f64().unwrap_or_default(),
            calories_burned: record.calories_burned.to_f64().unwrap_or_default(),
            difficulty: record.difficulty.parse().map_err(|e: String| anyhow!(e))?,
            mood: record.mood.parse().map_err(|e: String| anyhow!(e))?,
            notes: record.notes,
            completed_at: record.completed_at,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TotalsRow {
    total_workouts: i64,
    workouts_this_week: i64,
    total_calories: Decimal,
    total_minutes: Decimal,
}

const COLUMNS: &str = "id, user_id, workout_name, exercises, duration_minutes, calories_burned, \
                       difficulty, mood, notes, completed_at, created_at";

/// Workout log repository
pub struct WorkoutLogRepository;

impl WorkoutLogRepository {
    /// Append a validated workout
    pub async fn create(pool: &PgPool, user_id: Uuid, workout: &NewWorkout) -> Result<WorkoutLogRecord> {
        let duration = Decimal::from_f64(workout.duration_minutes)
            .ok_or_else(|| anyhow!("Duration {} is not representable", workout.duration_minutes))?;
        let calories = Decimal::from_f64(workout.calories_burned)
            .ok_or_else(|| anyhow!("Calories {} is not representable", workout.calories_burned))?;

        let record = sqlx::query_as::<_, WorkoutLogRecord>(&format!(
            r#"
            INSERT INTO workout_logs (user_id, workout_name, exercises, duration_minutes,
                                      calories_burned, difficulty, mood, notes, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&workout.workout_name)
        .bind(Json(&workout.exercises))
        .bind(duration)
        .bind(calories)
        .bind(workout.difficulty.as_str())
        .bind(workout.mood.as_str())
        .bind(&workout.notes)
        .bind(workout.completed_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get one workout, only if it belongs to `user_id`
    pub async fn get_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<WorkoutLogRecord>> {
        let record = sqlx::query_as::<_, WorkoutLogRecord>(&format!(
            "SELECT {COLUMNS} FROM workout_logs WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn count(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(total)
    }

    /// One page of a user's workouts, newest first
    pub async fn page(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutLogRecord>> {
        let records = sqlx::query_as::<_, WorkoutLogRecord>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM workout_logs
            WHERE user_id = $1
            ORDER BY completed_at DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Most recent workouts, newest first
    pub async fn recent(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<WorkoutLogRecord>> {
        Self::page(pool, user_id, limit, 0).await
    }

    /// Count and sums over the whole ledger, computed by the database
    ///
    /// The weekly count covers `[week_start, now]`.
    pub async fn totals(
        pool: &PgPool,
        user_id: Uuid,
        week_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ActivityTotals> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT COUNT(*) AS total_workouts,
                   COUNT(*) FILTER (WHERE completed_at >= $2 AND completed_at <= $3) AS workouts_this_week,
                   COALESCE(SUM(calories_burned), 0) AS total_calories,
                   COALESCE(SUM(duration_minutes), 0) AS total_minutes
            FROM workout_logs
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(week_start)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(ActivityTotals {
            total_workouts: row.total_workouts,
            workouts_this_week: row.workouts_this_week,
            total_calories: row.total_calories,
            total_minutes: row.total_minutes,
        })
    }

    /// Every completion time in the ledger, used to rebuild a streak
    pub async fn completion_times(pool: &PgPool, user_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let times = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT completed_at FROM workout_logs WHERE user_id = $1 ORDER BY completed_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(times)
    }

    /// Hard delete; `false` when nothing matched the id for this owner
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workout_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
