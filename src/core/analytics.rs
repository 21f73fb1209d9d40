//! Cross-habit statistics, recomputed on demand from a snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::day::DayKey;
use super::habit::Habit;

/// Days shown in the weekly trend chart.
pub const WEEK_WINDOW: u32 = 7;

/// Completions across all habits on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: DayKey,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_completions: usize,
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Per-day completion counts for the last `window_days` days, oldest first,
/// ending at `today`.
pub fn trailing_completion_series(
    habits: &[Habit],
    today: DayKey,
    window_days: u32,
) -> Vec<DayCount> {
    (0..window_days)
        .rev()
        .map(|n| {
            let day = today.days_before(n);
            let count = habits.iter().filter(|h| h.is_completed_on(day)).count();
            DayCount { day, count }
        })
        .collect()
}

/// Habits not yet completed today.
pub fn pending_today(habits: &[Habit], today: DayKey) -> usize {
    habits.iter().filter(|h| h.is_due(today)).count()
}

pub fn top_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(|h| h.streak).max().unwrap_or(0)
}

pub fn best_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(Habit::best_streak).max().unwrap_or(0)
}

pub fn total_completions(habits: &[Habit]) -> usize {
    habits.iter().map(Habit::completion_count).sum()
}

/// Distinct category tags, compared exactly.
pub fn category_count(habits: &[Habit]) -> usize {
    habits
        .iter()
        .map(|h| h.category.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Percentage of habit-days completed over the window, counting only days on
/// or after each habit's creation day.
pub fn consistency_score(habits: &[Habit], today: DayKey, window_days: u32) -> u8 {
    let mut eligible = 0usize;
    let mut done = 0usize;

    for habit in habits {
        let created = habit.created_day().unwrap_or(today.days_before(window_days));
        for n in 0..window_days {
            let day = today.days_before(n);
            if day < created {
                break;
            }
            eligible += 1;
            if habit.is_completed_on(day) {
                done += 1;
            }
        }
    }

    if eligible == 0 {
        return 0;
    }
    // done <= eligible, so the result is within 0..=100
    ((done * 100 + eligible / 2) / eligible) as u8
}

pub fn user_stats(habits: &[Habit]) -> UserStats {
    UserStats {
        total_completions: total_completions(habits),
        current_streak: top_streak(habits),
        best_streak: best_streak(habits),
    }
}

/// Everything the overview and trends screens show, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: DayKey,
    pub habit_count: usize,
    pub pending_today: usize,
    pub top_streak: u32,
    pub best_streak: u32,
    pub total_completions: usize,
    pub category_count: usize,
    pub consistency: u8,
    pub week: Vec<DayCount>,
}

impl Dashboard {
    pub fn compute(habits: &[Habit], today: DayKey) -> Self {
        Self {
            today,
            habit_count: habits.len(),
            pending_today: pending_today(habits, today),
            top_streak: top_streak(habits),
            best_streak: best_streak(habits),
            total_completions: total_completions(habits),
            category_count: category_count(habits),
            consistency: consistency_score(habits, today, WEEK_WINDOW),
            week: trailing_completion_series(habits, today, WEEK_WINDOW),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::day::{Clock, FixedClock};
    use crate::core::habit::HabitDraft;
    use crate::core::store::HabitStore;

    fn today() -> DayKey {
        DayKey::from_ymd(2026, 2, 10).unwrap()
    }

    /// Store whose habits were all created two weeks before `today()`.
    fn store() -> HabitStore<FixedClock> {
        HabitStore::with_clock(FixedClock::new(today().days_before(14)))
    }

    fn at_today(mut store: HabitStore<FixedClock>) -> HabitStore<FixedClock> {
        store.clock().set(today());
        store.refresh_streaks();
        store
    }

    #[test]
    fn trailing_series_counts_per_day() {
        let mut s = store();
        let a = s.add(HabitDraft::named("A")).id;
        let b = s.add(HabitDraft::named("B")).id;
        let mut s = at_today(s);
        s.toggle_on(a, today().days_before(1));
        s.toggle_on(a, today().days_before(3));
        s.toggle_on(b, today().days_before(3));

        let series = trailing_completion_series(s.snapshot(), today(), 7);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].day, today().days_before(6));
        assert_eq!(series[6].day, today());
        let counts: Vec<usize> = series.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 2, 0, 1, 0]);
    }

    #[test]
    fn empty_collection() {
        assert_eq!(top_streak(&[]), 0);
        assert_eq!(pending_today(&[], today()), 0);
        assert_eq!(category_count(&[]), 0);
        assert_eq!(consistency_score(&[], today(), 7), 0);
        assert_eq!(user_stats(&[]), UserStats::default());
        assert!(trailing_completion_series(&[], today(), 0).is_empty());
    }

    #[test]
    fn pending_total_and_categories() {
        let mut s = store();
        let a = s.add(HabitDraft {
            category: Some("Health".into()),
            ..HabitDraft::named("A")
        })
        .id;
        s.add(HabitDraft {
            category: Some("Health".into()),
            ..HabitDraft::named("B")
        });
        s.add(HabitDraft::named("C"));
        let mut s = at_today(s);
        s.toggle(a);
        s.toggle_on(a, today().days_before(1));

        let habits = s.snapshot();
        assert_eq!(pending_today(habits, today()), 2);
        assert_eq!(total_completions(habits), 2);
        assert_eq!(category_count(habits), 2);
        assert_eq!(top_streak(habits), 2);
    }

    #[test]
    fn best_streak_outlives_current() {
        let mut s = store();
        let a = s.add(HabitDraft::named("A")).id;
        let mut s = at_today(s);
        for n in 4..9 {
            s.toggle_on(a, today().days_before(n));
        }
        s.toggle(a);
        let stats = user_stats(s.snapshot());
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 5);
        assert_eq!(stats.total_completions, 6);
    }

    #[test]
    fn consistency_only_counts_days_since_creation() {
        let clock = FixedClock::new(today().days_before(1));
        let mut s = HabitStore::with_clock(clock);
        let a = s.add(HabitDraft::named("New")).id;
        s.clock().set(today());
        s.toggle(a);
        // eligible: yesterday and today, one done
        assert_eq!(consistency_score(s.snapshot(), today(), 7), 50);
    }

    #[test]
    fn consistency_full_week() {
        let mut s = store();
        let a = s.add(HabitDraft::named("A")).id;
        let mut s = at_today(s);
        for n in 0..7 {
            s.toggle_on(a, today().days_before(n));
        }
        assert_eq!(consistency_score(s.snapshot(), today(), 7), 100);
        let dash = Dashboard::compute(s.snapshot(), s.clock().today());
        assert_eq!(dash.consistency, 100);
        assert_eq!(dash.top_streak, 7);
        assert_eq!(dash.week.len(), WEEK_WINDOW as usize);
        assert_eq!(dash.pending_today, 0);
    }
}
