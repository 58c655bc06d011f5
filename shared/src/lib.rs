//! Fitness Trainer Shared Library
//!
//! Pure domain logic for the activity ledger and engagement engine:
//! streak transitions, aggregate statistics, conversation context assembly,
//! plus the API request/response types used by the backend.
//!
//! Nothing in this crate performs I/O.

pub mod calendar;
pub mod context;
pub mod errors;
pub mod models;
pub mod stats;
pub mod streak;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use calendar::DayBoundary;
pub use context::{ContextBuilder, CONTEXT_WINDOW};
pub use errors::*;
pub use models::{
    ChatRole, ChatTurn, Difficulty, ExerciseEntry, Mood, NewWorkout, ProfileSnapshot,
    StreakState, WorkoutEvent,
};
pub use stats::{ActivityTotals, StatsAggregator};
pub use streak::{BackdatedPolicy, StreakAdvance, StreakCalculator, StreakTransition};
