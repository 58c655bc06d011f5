//! Streak calculator
//!
//! A streak counts consecutive local calendar days that contain at least one
//! logged workout. The calculator is a pure transition function: callers
//! supply the previous state, the completion time of the new workout and the
//! current wall-clock time, and persist whatever comes back.

use crate::calendar::DayBoundary;
use crate::models::StreakState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// What to do with a workout dated before the streak's last counted day
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackdatedPolicy {
    /// Leave the streak untouched
    #[default]
    Ignore,
    /// Rebuild the streak from every workout day in the ledger
    Recompute,
}

impl FromStr for BackdatedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(BackdatedPolicy::Ignore),
            "recompute" => Ok(BackdatedPolicy::Recompute),
            other => Err(format!("Unknown back-dated policy '{}'", other)),
        }
    }
}

/// Which rule fired for a given workout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTransition {
    /// First workout ever recorded
    Started,
    /// Another workout on the last counted day
    SameDay,
    /// Workout on the day after the last counted day
    Extended,
    /// Gap of two or more days
    Broken,
    /// Workout dated before the last counted day
    Backdated,
}

/// Result of applying one workout to a streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakAdvance {
    pub state: StreakState,
    pub transition: StreakTransition,
}

impl StreakAdvance {
    /// Whether the state needs to be written back
    pub fn changed(&self) -> bool {
        matches!(
            self.transition,
            StreakTransition::Started | StreakTransition::Extended | StreakTransition::Broken
        )
    }
}

/// Pure streak transition logic bound to a day-boundary policy
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator {
    boundary: DayBoundary,
}

impl StreakCalculator {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }

    /// Apply a newly logged workout to the previous streak state
    ///
    /// Completion times later than `now` are counted as `now`, so a clock-skewed
    /// client cannot pre-book tomorrow's streak day.
    pub fn advance(
        &self,
        state: &StreakState,
        completed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> StreakAdvance {
        let counted_at = completed_at.min(now);

        let Some(last) = state.last_workout_at else {
            return StreakAdvance {
                state: StreakState {
                    current: 1,
                    longest: state.longest.max(1),
                    last_workout_at: Some(counted_at),
                },
                transition: StreakTransition::Started,
            };
        };

        match self.boundary.days_between(last, counted_at) {
            0 => StreakAdvance {
                state: *state,
                transition: StreakTransition::SameDay,
            },
            1 => {
                let current = state.current.saturating_add(1);
                StreakAdvance {
                    state: StreakState {
                        current,
                        longest: current.max(state.longest),
                        last_workout_at: Some(counted_at),
                    },
                    transition: StreakTransition::Extended,
                }
            }
            diff if diff >= 2 => StreakAdvance {
                state: StreakState {
                    current: 1,
                    longest: state.longest.max(1),
                    last_workout_at: Some(counted_at),
                },
                transition: StreakTransition::Broken,
            },
            _ => StreakAdvance {
                state: *state,
                transition: StreakTransition::Backdated,
            },
        }
    }

    /// Rebuild a streak from every completion time in a user's ledger
    ///
    /// `current` is the run of consecutive days ending on the latest workout
    /// day. `longest` never drops below the previously recorded value.
    pub fn rebuild<I>(&self, completions: I, previous: &StreakState, now: DateTime<Utc>) -> StreakState
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut latest: Option<DateTime<Utc>> = None;

        for completed_at in completions {
            let counted_at = completed_at.min(now);
            days.insert(self.boundary.local_date(counted_at));
            latest = Some(latest.map_or(counted_at, |l| l.max(counted_at)));
        }

        let mut longest_run = 0u32;
        let mut run = 0u32;
        let mut previous_day: Option<NaiveDate> = None;
        for day in &days {
            run = match previous_day {
                Some(prev) if (*day - prev).num_days() == 1 => run.saturating_add(1),
                _ => 1,
            };
            longest_run = longest_run.max(run);
            previous_day = Some(*day);
        }

        StreakState {
            current: run,
            longest: longest_run.max(previous.longest),
            last_workout_at: latest,
        }
    }
}
