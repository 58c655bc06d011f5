//! API request and response types
//!
//! Request bodies accept both the snake_case field names and the camelCase
//! names used by the web client (`workoutName`, `caloriesBurned`, ...).
//! Responses are always snake_case and carry a `success` flag.

use crate::models::{ChatRole, Difficulty, ExerciseEntry, Mood, ProfileSnapshot, StreakState, WorkoutEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default and maximum page sizes for workout history
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Default and maximum number of transcript entries returned by chat history
pub const DEFAULT_CHAT_HISTORY_LIMIT: i64 = 50;
pub const MAX_CHAT_HISTORY_LIMIT: i64 = 200;

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Workout Ledger
// ============================================================================

/// Body of `POST /workouts/log`
///
/// Required fields are optional here so that a missing value surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogWorkoutRequest {
    #[serde(default, alias = "workoutName")]
    pub workout_name: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    /// Total duration in minutes
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, alias = "caloriesBurned")]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutResponse {
    pub id: String,
    pub workout_name: String,
    pub exercises: Vec<ExerciseEntry>,
    pub duration: f64,
    pub calories_burned: f64,
    pub difficulty: Difficulty,
    pub mood: Mood,
    pub notes: String,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<WorkoutEvent> for WorkoutResponse {
    fn from(event: WorkoutEvent) -> Self {
        Self {
            id: event.id.to_string(),
            workout_name: event.workout_name,
            exercises: event.exercises,
            duration: event.duration_minutes,
            calories_burned: event.calories_burned,
            difficulty: event.difficulty,
            mood: event.mood,
            notes: event.notes,
            completed_at: event.completed_at,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakResponse {
    pub current: u32,
    pub longest: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_workout_at: Option<DateTime<Utc>>,
}

impl From<StreakState> for StreakResponse {
    fn from(state: StreakState) -> Self {
        Self {
            current: state.current,
            longest: state.longest,
            last_workout_at: state.last_workout_at,
        }
    }
}

/// Body returned after logging a workout
///
/// `streak` is `None` and `streak_stale` is set when the workout was saved
/// but the streak could not be brought up to date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWorkoutResponse {
    pub success: bool,
    pub message: String,
    pub workout: WorkoutResponse,
    pub streak: Option<StreakResponse>,
    pub streak_stale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetailResponse {
    pub success: bool,
    pub workout: WorkoutResponse,
}

/// Query string of `GET /workouts/history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutHistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl WorkoutHistoryQuery {
    /// Resolved `(page, limit)` with defaults applied and bounds enforced
    pub fn normalize(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        (page, limit)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// Rows to skip; saturates for pages far past the end
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// True when this page starts after the last row
    pub fn is_past_end(&self) -> bool {
        self.offset() >= self.total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutHistoryResponse {
    pub success: bool,
    pub workouts: Vec<WorkoutResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsBody {
    pub total_workouts: i64,
    pub workouts_this_week: i64,
    pub total_calories: f64,
    pub total_minutes: f64,
    /// Hours with one decimal, e.g. "0.0"
    pub total_hours: String,
    pub streak: StreakResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: StatsBody,
    pub recent_workouts: Vec<WorkoutResponse>,
}

// ============================================================================
// Trainer Chat
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReplyResponse {
    pub success: bool,
    /// Assistant reply text
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatHistoryQuery {
    pub limit: Option<i64>,
}

impl ChatHistoryQuery {
    pub fn normalize(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_CHAT_HISTORY_LIMIT)
            .clamp(1, MAX_CHAT_HISTORY_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatHistoryEntry {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub success: bool,
    pub history: Vec<ChatHistoryEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanResponse {
    pub success: bool,
    pub workout_plan: String,
    pub user_profile: ProfileSnapshot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseRecommendationRequest {
    #[serde(default, alias = "muscleGroup")]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseFilters {
    pub muscle_group: String,
    pub equipment: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecommendationResponse {
    pub success: bool,
    pub exercises: String,
    pub filters: ExerciseFilters,
}

// ============================================================================
// Training Profile
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "fitnessLevel")]
    pub fitness_level: Option<String>,
    #[serde(default, alias = "fitnessGoal")]
    pub fitness_goal: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default, alias = "workoutDuration")]
    pub workout_duration: Option<u32>,
    #[serde(default)]
    pub injuries: Vec<String>,
    #[serde(default, alias = "weeklyWorkouts")]
    pub weekly_workouts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileSnapshot,
}
