//! Input validation functions
//!
//! Leaf validators return `Result<(), String>` with a user-facing message.
//! `validate_log_workout` turns a raw request into a [`NewWorkout`] with
//! defaults applied.

use crate::errors::AppError;
use crate::models::{Difficulty, ExerciseEntry, Mood, NewWorkout};
use crate::types::{LogWorkoutRequest, UpdateProfileRequest};
use chrono::{DateTime, Utc};
use validator::ValidateEmail;

pub const FITNESS_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];
pub const FITNESS_GOALS: &[&str] = &[
    "weight-loss",
    "muscle-gain",
    "maintenance",
    "endurance",
    "flexibility",
];

const MAX_NAME_LEN: usize = 200;
const MAX_CHAT_MESSAGE_LEN: usize = 4000;

/// One workout cannot outlast a day
pub const MAX_DURATION_MINUTES: f64 = 1440.0;
pub const MAX_CALORIES: f64 = 100_000.0;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a display name
pub fn validate_display_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name must be at most {} characters", MAX_NAME_LEN));
    }
    Ok(())
}

/// Duration of a workout in minutes, in `(0, MAX_DURATION_MINUTES]`
pub fn validate_duration(minutes: f64) -> Result<(), String> {
    if !minutes.is_finite() {
        return Err("Duration must be a valid number".to_string());
    }
    if minutes <= 0.0 {
        return Err("Duration must be greater than zero".to_string());
    }
    if minutes > MAX_DURATION_MINUTES {
        return Err(format!(
            "Duration must be at most {} minutes",
            MAX_DURATION_MINUTES
        ));
    }
    Ok(())
}

/// Calories burned; zero is allowed
pub fn validate_calories(calories: f64) -> Result<(), String> {
    if !calories.is_finite() {
        return Err("Calories must be a valid number".to_string());
    }
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > MAX_CALORIES {
        return Err(format!("Calories must be at most {}", MAX_CALORIES));
    }
    Ok(())
}

fn validate_exercise(index: usize, exercise: &ExerciseEntry) -> Result<(), String> {
    let position = index + 1;
    if exercise.name.trim().is_empty() {
        return Err(format!("Exercise {} is missing a name", position));
    }
    if !exercise.weight.is_finite() || exercise.weight < 0.0 {
        return Err(format!("Exercise {} has an invalid weight", position));
    }
    if !exercise.duration.is_finite() || exercise.duration < 0.0 {
        return Err(format!("Exercise {} has an invalid duration", position));
    }
    Ok(())
}

/// Validate a log request and resolve it into a ledger entry
///
/// `completed_at` defaults to `now`; future timestamps are kept here and
/// clamped by the streak calculator.
pub fn validate_log_workout(
    req: LogWorkoutRequest,
    now: DateTime<Utc>,
) -> Result<NewWorkout, AppError> {
    let workout_name = req
        .workout_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::validation("Workout name and duration are required"))?
        .to_string();

    if workout_name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Workout name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    let duration_minutes = req
        .duration
        .ok_or_else(|| AppError::validation("Workout name and duration are required"))?;
    validate_duration(duration_minutes).map_err(AppError::Validation)?;

    let calories_burned = req.calories_burned.unwrap_or(0.0);
    validate_calories(calories_burned).map_err(AppError::Validation)?;

    for (index, exercise) in req.exercises.iter().enumerate() {
        validate_exercise(index, exercise).map_err(AppError::Validation)?;
    }

    let difficulty = match non_blank(req.difficulty.as_deref()) {
        Some(value) => value.parse::<Difficulty>().map_err(AppError::Validation)?,
        None => Difficulty::default(),
    };
    let mood = match non_blank(req.mood.as_deref()) {
        Some(value) => value.parse::<Mood>().map_err(AppError::Validation)?,
        None => Mood::default(),
    };

    let exercises = req
        .exercises
        .into_iter()
        .map(|mut exercise| {
            exercise.name = exercise.name.trim().to_string();
            exercise
        })
        .collect();

    Ok(NewWorkout {
        workout_name,
        exercises,
        duration_minutes,
        calories_burned,
        difficulty,
        mood,
        notes: req.notes.unwrap_or_default(),
        completed_at: req.completed_at.unwrap_or(now),
    })
}

/// Validate and trim a chat message
pub fn validate_chat_message(message: Option<&str>) -> Result<String, AppError> {
    let message = message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::validation("Message is required"))?;

    if message.chars().count() > MAX_CHAT_MESSAGE_LEN {
        return Err(AppError::validation(format!(
            "Message must be at most {} characters",
            MAX_CHAT_MESSAGE_LEN
        )));
    }
    Ok(message.to_string())
}

/// Validate fitness level vocabulary
pub fn validate_fitness_level(level: &str) -> Result<(), String> {
    if FITNESS_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(format!(
            "Invalid fitness level. Must be one of: {}",
            FITNESS_LEVELS.join(", ")
        ))
    }
}

/// Validate fitness goal vocabulary
pub fn validate_fitness_goal(goal: &str) -> Result<(), String> {
    if FITNESS_GOALS.contains(&goal) {
        Ok(())
    } else {
        Err(format!(
            "Invalid fitness goal. Must be one of: {}",
            FITNESS_GOALS.join(", ")
        ))
    }
}

/// Validate a profile update
pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), AppError> {
    if let Some(level) = non_blank(req.fitness_level.as_deref()) {
        validate_fitness_level(level).map_err(AppError::Validation)?;
    }
    if let Some(goal) = non_blank(req.fitness_goal.as_deref()) {
        validate_fitness_goal(goal).map_err(AppError::Validation)?;
    }
    if let Some(minutes) = req.workout_duration {
        if !(5..=300).contains(&minutes) {
            return Err(AppError::validation(
                "Workout duration must be between 5 and 300 minutes",
            ));
        }
    }
    if let Some(weekly) = req.weekly_workouts {
        if !(1..=14).contains(&weekly) {
            return Err(AppError::validation(
                "Weekly workouts must be between 1 and 14",
            ));
        }
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
