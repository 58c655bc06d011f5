//! Business logic services
//!
//! Services coordinate repositories, the trainer client and the pure
//! domain logic in the shared crate.

pub mod chat;
pub mod profile;
pub mod user;
pub mod workout;

pub use chat::ChatService;
pub use profile::ProfileService;
pub use user::UserService;
pub use workout::{StreakPlan, WorkoutService};
