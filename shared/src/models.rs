//! Domain models for the activity ledger and trainer conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Perceived difficulty of a logged workout
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very-hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "hard" => Ok(Difficulty::Hard),
            "very-hard" | "very_hard" => Ok(Difficulty::VeryHard),
            other => Err(format!(
                "Unknown difficulty '{}'. Expected easy, moderate, hard or very-hard",
                other
            )),
        }
    }
}

/// How the user felt after a workout
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    #[default]
    Good,
    Okay,
    Tired,
    Exhausted,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Tired => "tired",
            Mood::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" => Ok(Mood::Okay),
            "tired" => Ok(Mood::Tired),
            "exhausted" => Ok(Mood::Exhausted),
            other => Err(format!(
                "Unknown mood '{}'. Expected great, good, okay, tired or exhausted",
                other
            )),
        }
    }
}

/// One exercise performed within a workout, in the order it was logged
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub name: String,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A validated workout ready to be appended to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub workout_name: String,
    pub exercises: Vec<ExerciseEntry>,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub difficulty: Difficulty,
    pub mood: Mood,
    pub notes: String,
    pub completed_at: DateTime<Utc>,
}

/// A persisted workout event
///
/// Immutable once written; the only lifecycle transition is deletion by its
/// owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_name: String,
    pub exercises: Vec<ExerciseEntry>,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub difficulty: Difficulty,
    pub mood: Mood,
    pub notes: String,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Consecutive-day streak derived from the workout ledger
///
/// `last_workout_at == None` is the distinguished "no prior workout" state.
/// `longest >= current` holds for every value produced by the calculator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_workout_at: Option<DateTime<Utc>>,
}

impl StreakState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.last_workout_at.is_none()
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(format!("Unknown chat role '{}'", other)),
        }
    }
}

/// A role-tagged piece of conversation text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Read-only snapshot of the user's training profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub fitness_level: Option<String>,
    pub fitness_goal: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Preferred session length in minutes
    pub workout_duration: Option<u32>,
    #[serde(default)]
    pub injuries: Vec<String>,
    pub weekly_workouts: Option<u32>,
}

impl ProfileSnapshot {
    /// Fill gaps with the defaults used when planning a training week
    pub fn with_plan_defaults(self) -> Self {
        Self {
            fitness_level: self.fitness_level.or_else(|| Some("beginner".to_string())),
            fitness_goal: self.fitness_goal.or_else(|| Some("maintenance".to_string())),
            equipment: if self.equipment.is_empty() {
                vec!["bodyweight".to_string()]
            } else {
                self.equipment
            },
            workout_duration: self.workout_duration.or(Some(30)),
            injuries: self.injuries,
            weekly_workouts: self.weekly_workouts.or(Some(3)),
        }
    }
}
