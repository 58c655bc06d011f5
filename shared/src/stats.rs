//! Statistics aggregator
//!
//! Aggregate metrics over a user's workout ledger. The backend pushes the
//! counting and summing into SQL; this module owns the semantics (week
//! boundary, hour rounding, zero handling) and an in-memory reference
//! implementation over a slice of events.

use crate::calendar::DayBoundary;
use crate::models::WorkoutEvent;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of recent workouts returned alongside the totals
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Counted and summed metrics for one user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTotals {
    pub total_workouts: i64,
    pub workouts_this_week: i64,
    pub total_calories: Decimal,
    pub total_minutes: Decimal,
}

impl ActivityTotals {
    /// Total duration in hours, rounded half-up to one decimal place
    pub fn total_hours(&self) -> Decimal {
        minutes_to_hours(self.total_minutes)
    }

    /// Hours formatted with exactly one decimal, e.g. "0.0" or "12.5"
    pub fn total_hours_display(&self) -> String {
        format!("{:.1}", self.total_hours())
    }

    pub fn total_calories_f64(&self) -> f64 {
        self.total_calories.to_f64().unwrap_or(0.0)
    }

    pub fn total_minutes_f64(&self) -> f64 {
        self.total_minutes.to_f64().unwrap_or(0.0)
    }
}

/// Convert minutes to hours with half-up rounding at one decimal
pub fn minutes_to_hours(minutes: Decimal) -> Decimal {
    (minutes / Decimal::from(60)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Totals plus the newest workouts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityStats {
    pub totals: ActivityTotals,
    pub recent: Vec<WorkoutEvent>,
}

/// In-memory aggregation over a set of workout events
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator {
    boundary: DayBoundary,
    recent_limit: usize,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(DayBoundary::utc(), DEFAULT_RECENT_LIMIT)
    }
}

impl StatsAggregator {
    pub fn new(boundary: DayBoundary, recent_limit: usize) -> Self {
        Self {
            boundary,
            recent_limit,
        }
    }

    /// Inclusive lower bound of "this week" for `now`
    pub fn week_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.boundary.week_start(now)
    }

    pub fn compute(&self, events: &[WorkoutEvent], now: DateTime<Utc>) -> ActivityStats {
        let week_start = self.week_start(now);

        let totals = events.iter().fold(ActivityTotals::default(), |mut acc, event| {
            acc.total_workouts += 1;
            if event.completed_at >= week_start && event.completed_at <= now {
                acc.workouts_this_week += 1;
            }
            acc.total_calories += to_decimal(event.calories_burned);
            acc.total_minutes += to_decimal(event.duration_minutes);
            acc
        });

        let mut recent: Vec<WorkoutEvent> = events.to_vec();
        recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        recent.truncate(self.recent_limit);

        ActivityStats { totals, recent }
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Mood};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::str::FromStr;
    use uuid::Uuid;

    fn event(completed_at: DateTime<Utc>, minutes: f64, calories: f64) -> WorkoutEvent {
        WorkoutEvent {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            workout_name: "Session".to_string(),
            exercises: Vec::new(),
            duration_minutes: minutes,
            calories_burned: calories,
            difficulty: Difficulty::Moderate,
            mood: Mood::Good,
            notes: String::new(),
            completed_at,
            created_at: completed_at,
        }
    }

    #[test]
    fn test_empty_ledger_yields_zeroes() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let stats = StatsAggregator::default().compute(&[], now);

        assert_eq!(stats.totals.total_workouts, 0);
        assert_eq!(stats.totals.workouts_this_week, 0);
        assert_eq!(stats.totals.total_calories, Decimal::ZERO);
        assert_eq!(stats.totals.total_hours_display(), "0.0");
        assert!(stats.recent.is_empty());
    }

    #[rstest]
    #[case("0", "0.0")]
    #[case("30", "0.5")]
    #[case("3", "0.1")] // 0.05 rounds up
    #[case("87", "1.5")] // 1.45 rounds up
    #[case("86", "1.4")] // 1.4333...
    #[case("600", "10.0")]
    #[case("45.5", "0.8")] // 0.7583...
    fn test_hours_round_half_up(#[case] minutes: &str, #[case] expected: &str) {
        let totals = ActivityTotals {
            total_minutes: Decimal::from_str(minutes).unwrap(),
            ..Default::default()
        };
        assert_eq!(totals.total_hours_display(), expected);
    }

    #[test]
    fn test_weekly_count_starts_sunday_midnight() {
        // Wednesday 2024-01-10; week began Sunday 2024-01-07T00:00Z
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let events = vec![
            event(Utc.with_ymd_and_hms(2024, 1, 6, 23, 59, 59).unwrap(), 30.0, 100.0),
            event(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap(), 45.0, 200.0),
            event(Utc.with_ymd_and_hms(2024, 1, 9, 18, 0, 0).unwrap(), 60.0, 350.0),
        ];
        let stats = StatsAggregator::default().compute(&events, now);

        assert_eq!(stats.totals.total_workouts, 3);
        assert_eq!(stats.totals.workouts_this_week, 2);
        assert_eq!(stats.totals.total_calories, Decimal::from(650));
        assert_eq!(stats.totals.total_minutes, Decimal::from(135));
        assert_eq!(stats.totals.total_hours_display(), "2.3");
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let events: Vec<WorkoutEvent> = (0..8)
            .map(|i| event(now - Duration::days(i * 2), 30.0, 0.0))
            .rev()
            .collect();
        let stats = StatsAggregator::new(DayBoundary::utc(), 3).compute(&events, now);

        assert_eq!(stats.recent.len(), 3);
        assert_eq!(stats.recent[0].completed_at, now);
        assert!(stats.recent[0].completed_at > stats.recent[1].completed_at);
        assert!(stats.recent[1].completed_at > stats.recent[2].completed_at);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_totals_are_sums(
            entries in prop::collection::vec((1u32..300, 0u32..2000, 0i64..60), 0..50)
        ) {
            let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
            let events: Vec<WorkoutEvent> = entries
                .iter()
                .map(|(m, c, ago)| event(now - Duration::days(*ago), *m as f64, *c as f64))
                .collect();
            let stats = StatsAggregator::default().compute(&events, now);

            let minutes: u32 = entries.iter().map(|(m, _, _)| m).sum();
            let calories: u32 = entries.iter().map(|(_, c, _)| c).sum();

            prop_assert_eq!(stats.totals.total_workouts, entries.len() as i64);
            prop_assert_eq!(stats.totals.total_minutes, Decimal::from(minutes));
            prop_assert_eq!(stats.totals.total_calories, Decimal::from(calories));
            prop_assert!(stats.totals.workouts_this_week <= stats.totals.total_workouts);
            prop_assert!(stats.recent.len() <= DEFAULT_RECENT_LIMIT);
        }
    }
}
