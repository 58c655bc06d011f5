//! Workout ledger service
//!
//! Logging runs `validate -> persist -> streak`. Once the event is stored the
//! request succeeds; a streak failure after that point only marks the
//! response stale.

use crate::error::ApiError;
use crate::repositories::{UserRepository, WorkoutLogRecord, WorkoutLogRepository};
use crate::state::AppState;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use fitness_trainer_shared::types::{
    LogWorkoutRequest, LogWorkoutResponse, MessageResponse, Pagination, StatsBody, StatsResponse,
    StreakResponse, WorkoutDetailResponse, WorkoutHistoryQuery, WorkoutHistoryResponse,
    WorkoutResponse,
};
use fitness_trainer_shared::validation::validate_log_workout;
use fitness_trainer_shared::{
    BackdatedPolicy, StreakCalculator, StreakState, StreakTransition, WorkoutEvent,
};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What the streak step has to do for one newly logged workout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakPlan {
    /// Stored state is already correct
    Keep(StreakState),
    /// Write this state back
    Write(StreakState),
    /// Rebuild from the full ledger, then write
    Rebuild,
}

impl StreakPlan {
    pub fn decide(
        calculator: &StreakCalculator,
        policy: BackdatedPolicy,
        previous: &StreakState,
        completed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let advance = calculator.advance(previous, completed_at, now);
        match advance.transition {
            StreakTransition::Backdated if policy == BackdatedPolicy::Recompute => StreakPlan::Rebuild,
            _ if advance.changed() => StreakPlan::Write(advance.state),
            _ => StreakPlan::Keep(advance.state),
        }
    }
}

pub struct WorkoutService;

impl WorkoutService {
    /// Log a workout and bring the owner's streak up to date
    pub async fn log_workout(
        state: &AppState,
        user_id: Uuid,
        req: LogWorkoutRequest,
    ) -> Result<LogWorkoutResponse, ApiError> {
        let now = Utc::now();
        let workout = validate_log_workout(req, now)?;

        let record = WorkoutLogRepository::create(state.db(), user_id, &workout)
            .await
            .map_err(|e| {
                let missing_user = matches!(
                    e.downcast_ref::<sqlx::Error>(),
                    Some(sqlx::Error::Database(db)) if db.is_foreign_key_violation()
                );
                if missing_user {
                    ApiError::NotFound("User not found".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;
        let event = WorkoutEvent::try_from(record).map_err(ApiError::Internal)?;

        info!(user_id = %user_id, workout_id = %event.id, "Workout logged");
        metrics::counter!("workouts_logged_total").increment(1);

        let streak = match Self::update_streak(state, user_id, event.completed_at, now).await {
            Ok(streak) => Some(StreakResponse::from(streak)),
            Err(e) => {
                warn!(user_id = %user_id, workout_id = %event.id, error = %e, "Streak left stale");
                metrics::counter!("streak_updates_stale_total").increment(1);
                None
            }
        };

        Ok(LogWorkoutResponse {
            success: true,
            message: "Workout logged successfully".to_string(),
            workout: WorkoutResponse::from(event),
            streak_stale: streak.is_none(),
            streak,
        })
    }

    /// Optimistic read-advance-write loop on the user's streak record
    async fn update_streak(
        state: &AppState,
        user_id: Uuid,
        completed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<StreakState> {
        let db = state.db();
        let calculator = state.streak_calculator();
        let ledger = &state.config().ledger;
        let attempts = ledger.streak_max_retries.max(1);

        for attempt in 1..=attempts {
            let stored = UserRepository::get_streak(db, user_id)
                .await?
                .ok_or_else(|| anyhow!("no streak record for user {}", user_id))?;
            let previous = stored.state();

            let next = match StreakPlan::decide(
                &calculator,
                ledger.backdated_policy,
                &previous,
                completed_at,
                now,
            ) {
                StreakPlan::Keep(state) => return Ok(state),
                StreakPlan::Write(state) => state,
                StreakPlan::Rebuild => {
                    let completions = WorkoutLogRepository::completion_times(db, user_id).await?;
                    let rebuilt = calculator.rebuild(completions, &previous, now);
                    if rebuilt == previous {
                        return Ok(previous);
                    }
                    rebuilt
                }
            };

            if UserRepository::compare_and_set_streak(db, user_id, stored.streak_version, &next)
                .await?
            {
                debug!(user_id = %user_id, current = next.current, longest = next.longest, "Streak updated");
                return Ok(next);
            }

            debug!(user_id = %user_id, attempt, "Streak version conflict, retrying");
            metrics::counter!("streak_update_conflicts_total").increment(1);
        }

        Err(anyhow!(
            "streak update for user {} lost {} consecutive races",
            user_id,
            attempts
        ))
    }

    /// One page of history, newest first
    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        query: &WorkoutHistoryQuery,
    ) -> Result<WorkoutHistoryResponse, ApiError> {
        let (page, limit) = query.normalize();

        let total = WorkoutLogRepository::count(db, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let pagination = Pagination::new(page, limit, total);

        let records = if pagination.is_past_end() {
            Vec::new()
        } else {
            WorkoutLogRepository::page(db, user_id, limit, pagination.offset())
                .await
                .map_err(ApiError::Internal)?
        };

        Ok(WorkoutHistoryResponse {
            success: true,
            workouts: to_responses(records)?,
            pagination,
        })
    }

    /// Totals, weekly count, streak and recent workouts
    pub async fn stats(state: &AppState, user_id: Uuid) -> Result<StatsResponse, ApiError> {
        let db = state.db();
        let now = Utc::now();
        let aggregator = state.stats_aggregator();

        let totals = WorkoutLogRepository::totals(db, user_id, aggregator.week_start(now), now)
            .await
            .map_err(ApiError::Internal)?;

        let limit = i64::try_from(state.config().ledger.recent_workouts_limit).unwrap_or(i64::MAX);
        let recent = WorkoutLogRepository::recent(db, user_id, limit)
            .await
            .map_err(ApiError::Internal)?;

        let streak = UserRepository::get_streak(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|record| record.state())
            .unwrap_or_default();

        Ok(StatsResponse {
            success: true,
            stats: StatsBody {
                total_workouts: totals.total_workouts,
                workouts_this_week: totals.workouts_this_week,
                total_calories: totals.total_calories_f64(),
                total_minutes: totals.total_minutes_f64(),
                total_hours: totals.total_hours_display(),
                streak: StreakResponse::from(streak),
            },
            recent_workouts: to_responses(recent)?,
        })
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<WorkoutDetailResponse, ApiError> {
        let record = WorkoutLogRepository::get_by_id(db, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

        Ok(WorkoutDetailResponse {
            success: true,
            workout: WorkoutEvent::try_from(record)
                .map(WorkoutResponse::from)
                .map_err(ApiError::Internal)?,
        })
    }

    /// Delete one of the caller's workouts; the streak is left as it is
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<MessageResponse, ApiError> {
        let deleted = WorkoutLogRepository::delete(db, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Workout not found".to_string()));
        }

        info!(user_id = %user_id, workout_id = %id, "Workout deleted");
        Ok(MessageResponse::ok("Workout deleted successfully"))
    }
}

fn to_responses(records: Vec<WorkoutLogRecord>) -> Result<Vec<WorkoutResponse>, ApiError> {
    records
        .into_iter()
        .map(|record| {
            WorkoutEvent::try_from(record)
                .map(WorkoutResponse::from)
                .map_err(ApiError::Internal)
        })
        .collect()
}
