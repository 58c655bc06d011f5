//! Conversation context builder
//!
//! Turns a user's persisted transcript into the ordered list of turns sent to
//! the AI trainer. Storage hands history over newest-first (the cheap bounded
//! query); the builder reverses it so the model always reads oldest to newest.

use crate::models::{ChatRole, ChatTurn, ProfileSnapshot};

/// Maximum number of stored messages ever loaded into a context
pub const CONTEXT_WINDOW: usize = 20;

/// Persona grounding sent as the opening user turn of a cold conversation
pub const TRAINER_PERSONA: &str = "You are an expert AI Fitness Trainer and Health Coach with certifications in:
- Personal Training (CPT)
- Nutrition Science
- Exercise Physiology
- Sports Medicine

Your personality:
- Encouraging and motivating
- Professional yet friendly
- Evidence-based and scientifically accurate
- Adaptive to user's fitness level

Your capabilities:
1. Create personalized workout plans
2. Provide exercise form corrections and tips
3. Suggest nutrition and meal plans
4. Track progress and adjust recommendations
5. Answer fitness and health questions
6. Provide motivation and support
7. Suggest exercises based on available equipment
8. Help with injury prevention and recovery

Guidelines:
- Always prioritize user safety
- Ask for medical clearance if user mentions injuries or health conditions
- Be specific with exercise instructions (sets, reps, rest time)
- Encourage proper form over heavy weights
- Recommend gradual progression
- Stay within fitness and nutrition domain
- Use emojis occasionally to be engaging

When asked about workouts, provide structured responses with:
- Exercise name
- Muscle group targeted
- Sets and reps
- Rest time
- Form tips
- Alternatives if needed
";

/// Assistant reply paired with the persona turn
pub const TRAINER_GREETING: &str = "Hello! I'm your AI Fitness Trainer. I'm here to help you with personalized workout plans, exercise guidance, nutrition advice, and achieve your fitness goals. How can I assist you today?";

const NOT_SPECIFIED: &str = "Not specified";
const NONE_MENTIONED: &str = "None mentioned";
const DEFAULT_SESSION_MINUTES: u32 = 30;

/// Assembles the turns for one chat request
pub struct ContextBuilder;

impl ContextBuilder {
    /// Build the ordered context for a new user message
    ///
    /// `history_newest_first` is the transcript exactly as the bounded storage
    /// query returns it. Anything beyond [`CONTEXT_WINDOW`] entries is
    /// dropped from the old end. The returned turns end with the new user
    /// message, prefixed by the profile block when a profile is supplied.
    pub fn build(
        history_newest_first: Vec<ChatTurn>,
        new_message: &str,
        profile: Option<&ProfileSnapshot>,
    ) -> Vec<ChatTurn> {
        let mut turns: Vec<ChatTurn> = history_newest_first
            .into_iter()
            .take(CONTEXT_WINDOW)
            .collect();
        turns.reverse();

        if turns.is_empty() {
            // The completion API rejects a conversation that opens with an
            // assistant turn, so the persona rides on a user turn.
            turns.push(ChatTurn::user(TRAINER_PERSONA));
            turns.push(ChatTurn::assistant(TRAINER_GREETING));
        }

        let outgoing = match profile {
            Some(profile) => format!("{}\n\n{}", Self::profile_block(profile), new_message),
            None => new_message.to_string(),
        };
        turns.push(ChatTurn {
            role: ChatRole::User,
            content: outgoing,
        });

        turns
    }

    /// Fixed-shape profile summary; every field is always present
    pub fn profile_block(profile: &ProfileSnapshot) -> String {
        format!(
            "User Profile Context:\n\
             - Fitness Level: {}\n\
             - Goals: {}\n\
             - Equipment Available: {}\n\
             - Workout Duration Preference: {} minutes\n\
             - Injuries/Limitations: {}",
            text_or(profile.fitness_level.as_deref(), NOT_SPECIFIED),
            text_or(profile.fitness_goal.as_deref(), NOT_SPECIFIED),
            list_or(&profile.equipment, NOT_SPECIFIED),
            profile.workout_duration.unwrap_or(DEFAULT_SESSION_MINUTES),
            list_or(&profile.injuries, NONE_MENTIONED),
        )
    }
}

/// One-shot prompt asking for a weekly plan
///
/// Expects a profile that already went through
/// [`ProfileSnapshot::with_plan_defaults`].
pub fn workout_plan_prompt(profile: &ProfileSnapshot) -> String {
    format!(
        "Create a personalized weekly workout plan based on this profile:\n\n\
         Fitness Level: {}\n\
         Goal: {}\n\
         Equipment: {}\n\
         Workouts per week: {}\n\
         Duration per session: {} minutes\n\
         Injuries/Limitations: {}\n\n\
         Please provide:\n\
         1. Weekly structure (which days, what focus)\n\
         2. For each workout day:\n   \
         - Workout focus/type\n   \
         - 5-7 specific exercises\n   \
         - Sets, reps, and rest times\n   \
         - Total estimated duration\n\
         3. Recovery/rest day recommendations\n\
         4. Progressive overload suggestions\n\n\
         Format the response in a clear, structured way.",
        text_or(profile.fitness_level.as_deref(), "beginner"),
        text_or(profile.fitness_goal.as_deref(), "general fitness"),
        list_or(&profile.equipment, "bodyweight"),
        profile.weekly_workouts.unwrap_or(3),
        profile.workout_duration.unwrap_or(DEFAULT_SESSION_MINUTES),
        list_or(&profile.injuries, "None"),
    )
}

/// One-shot prompt asking for five exercises
pub fn exercise_prompt(muscle_group: &str, equipment: &str, difficulty: &str) -> String {
    format!(
        "Suggest 5 effective exercises for:\n\
         Muscle Group: {}\n\
         Equipment: {}\n\
         Difficulty: {}\n\n\
         For each exercise provide:\n\
         1. Exercise name\n\
         2. How to perform (brief instructions)\n\
         3. Sets and reps recommendation\n\
         4. Key form tips\n\
         5. Common mistakes to avoid\n\n\
         Be specific and practical.",
        muscle_group, equipment, difficulty
    )
}

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

fn list_or(items: &[String], fallback: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}
