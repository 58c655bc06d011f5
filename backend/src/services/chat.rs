//! Trainer chat service
//!
//! A chat turn is `load history -> build context -> ask the trainer ->
//! persist both turns`. Nothing is written unless the trainer answered.

use crate::ai::AiTrainer;
use crate::error::ApiError;
use crate::repositories::{ChatRepository, ProfileRepository, UserRepository};
use crate::state::AppState;
use chrono::Utc;
use fitness_trainer_shared::context::{exercise_prompt, workout_plan_prompt};
use fitness_trainer_shared::types::{
    ChatHistoryEntry, ChatHistoryQuery, ChatHistoryResponse, ChatReplyResponse,
    ClearHistoryResponse, ExerciseFilters, ExerciseRecommendationRequest,
    ExerciseRecommendationResponse, SendMessageRequest, WorkoutPlanResponse,
};
use fitness_trainer_shared::validation::validate_chat_message;
use fitness_trainer_shared::{ChatTurn, ContextBuilder, ProfileSnapshot, CONTEXT_WINDOW};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_EQUIPMENT: &str = "bodyweight";
const DEFAULT_EXERCISE_DIFFICULTY: &str = "intermediate";

pub struct ChatService;

impl ChatService {
    /// Send one message to the trainer and record the exchange
    pub async fn send_message(
        state: &AppState,
        user_id: Uuid,
        req: SendMessageRequest,
    ) -> Result<ChatReplyResponse, ApiError> {
        let message = validate_chat_message(req.message.as_deref())?;
        let sent_at = Utc::now();
        let db = state.db();

        Self::require_user(db, user_id).await?;

        let history = ChatRepository::recent(db, user_id, CONTEXT_WINDOW as i64)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(ChatTurn::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(ApiError::Internal)?;
        let profile = Self::load_profile(db, user_id).await?;

        let turns = ContextBuilder::build(history, &message, Some(&profile));
        let reply = Self::exchange(state.trainer(), &turns).await?;
        let replied_at = Utc::now();

        ChatRepository::append_exchange(db, user_id, &message, sent_at, &reply, replied_at)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, context_turns = turns.len(), "Chat exchange recorded");

        Ok(ChatReplyResponse {
            success: true,
            message: reply,
            timestamp: replied_at,
        })
    }

    /// Ask the trainer for a reply to an assembled context
    ///
    /// Storage-free so the all-or-nothing rule can be checked without a
    /// database: on `Err` the caller has nothing to persist.
    pub async fn exchange(trainer: &dyn AiTrainer, turns: &[ChatTurn]) -> Result<String, ApiError> {
        trainer.chat(turns).await.map_err(|e| {
            warn!(error = %e, "Trainer reply failed, exchange discarded");
            ApiError::Dependency(e)
        })
    }

    /// The newest `limit` messages, oldest first
    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        query: &ChatHistoryQuery,
    ) -> Result<ChatHistoryResponse, ApiError> {
        let records = ChatRepository::history(db, user_id, query.normalize())
            .await
            .map_err(ApiError::Internal)?;

        let history = records
            .into_iter()
            .map(|record| -> anyhow::Result<ChatHistoryEntry> {
                Ok(ChatHistoryEntry {
                    role: record.role()?,
                    content: record.content,
                    timestamp: record.created_at,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(ApiError::Internal)?;

        Ok(ChatHistoryResponse {
            success: true,
            count: history.len(),
            history,
        })
    }

    pub async fn clear_history(db: &PgPool, user_id: Uuid) -> Result<ClearHistoryResponse, ApiError> {
        let deleted_count = ChatRepository::clear(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, deleted_count, "Chat history cleared");

        Ok(ClearHistoryResponse {
            success: true,
            message: "Chat history cleared".to_string(),
            deleted_count,
        })
    }

    /// Generate a weekly plan from the profile; not part of the transcript
    pub async fn workout_plan(state: &AppState, user_id: Uuid) -> Result<WorkoutPlanResponse, ApiError> {
        let db = state.db();
        Self::require_user(db, user_id).await?;

        let profile = Self::load_profile(db, user_id).await?.with_plan_defaults();
        let workout_plan = state
            .trainer()
            .generate(&workout_plan_prompt(&profile))
            .await?;

        Ok(WorkoutPlanResponse {
            success: true,
            workout_plan,
            user_profile: profile,
        })
    }

    /// Suggest exercises for a muscle group; not part of the transcript
    pub async fn recommend_exercises(
        trainer: &dyn AiTrainer,
        req: ExerciseRecommendationRequest,
    ) -> Result<ExerciseRecommendationResponse, ApiError> {
        let filters = Self::exercise_filters(req)?;
        let exercises = trainer
            .generate(&exercise_prompt(
                &filters.muscle_group,
                &filters.equipment,
                &filters.difficulty,
            ))
            .await?;

        Ok(ExerciseRecommendationResponse {
            success: true,
            exercises,
            filters,
        })
    }

    fn exercise_filters(req: ExerciseRecommendationRequest) -> Result<ExerciseFilters, ApiError> {
        fn or_default(value: Option<String>, fallback: &str) -> String {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        }

        let muscle_group = req
            .muscle_group
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ApiError::Validation("Please specify a muscle group".to_string()))?;

        Ok(ExerciseFilters {
            muscle_group,
            equipment: or_default(req.equipment, DEFAULT_EQUIPMENT),
            difficulty: or_default(req.difficulty, DEFAULT_EXERCISE_DIFFICULTY),
        })
    }

    async fn require_user(db: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
        if UserRepository::exists(db, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            Ok(())
        } else {
            Err(ApiError::NotFound("User not found".to_string()))
        }
    }

    async fn load_profile(db: &PgPool, user_id: Uuid) -> Result<ProfileSnapshot, ApiError> {
        Ok(ProfileRepository::get(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(ProfileSnapshot::from)
            .unwrap_or_default())
    }
}
