//! Database repositories
//!
//! Thin `sqlx` wrappers returning `anyhow::Result`; services decide what a
//! failure means to the caller.

pub mod chat;
pub mod profile;
pub mod user;
pub mod workout_log;

pub use chat::{ChatMessageRecord, ChatRepository};
pub use profile::{ProfileRecord, ProfileRepository};
pub use user::{StreakRecord, UserRecord, UserRepository};
pub use workout_log::{WorkoutLogRecord, WorkoutLogRepository};
