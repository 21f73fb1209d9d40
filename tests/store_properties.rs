use std::collections::{BTreeSet, HashSet};

use habitflow::core::analytics::{
    pending_today, top_streak, total_completions, trailing_completion_series,
};
use habitflow::core::streak::current_streak;
use habitflow::core::{DayKey, FixedClock, HabitDraft, HabitStore};
use proptest::prelude::*;

fn today() -> DayKey {
    DayKey::from_ymd(2026, 3, 3).unwrap()
}

fn store() -> HabitStore<FixedClock> {
    HabitStore::with_clock(FixedClock::new(today()))
}

/// Streak over "days before today" offsets, counted the slow way.
fn reference_streak(offsets: &BTreeSet<u32>) -> u32 {
    let start = if offsets.contains(&0) {
        0
    } else if offsets.contains(&1) {
        1
    } else {
        return 0;
    };
    (start..).take_while(|o| offsets.contains(o)).count() as u32
}

proptest! {
    #[test]
    fn ids_are_unique(n in 0usize..60) {
        let mut s = store();
        let ids: HashSet<_> = (0..n).map(|_| s.add(HabitDraft::default()).id).collect();
        prop_assert_eq!(ids.len(), n);
    }

    #[test]
    fn double_toggle_is_identity(
        initial in prop::collection::btree_set(0u32..30, 0..20),
        day in 0u32..30,
    ) {
        let mut s = store();
        let id = s.add(HabitDraft::named("Read")).id;
        for &n in &initial {
            s.toggle_on(id, today().days_before(n));
        }
        let before = s.get(id).unwrap().clone();

        s.toggle_on(id, today().days_before(day));
        s.toggle_on(id, today().days_before(day));

        let after = s.get(id).unwrap();
        prop_assert_eq!(&after.completed_dates, &before.completed_dates);
        prop_assert_eq!(after.streak, before.streak);
    }

    #[test]
    fn streak_matches_reference_after_any_toggles(
        toggles in prop::collection::vec(0u32..15, 0..60),
    ) {
        let mut s = store();
        let id = s.add(HabitDraft::named("Run")).id;
        let mut model = BTreeSet::new();

        for n in toggles {
            if !model.remove(&n) {
                model.insert(n);
            }
            let habit = s.toggle_on(id, today().days_before(n)).unwrap();
            prop_assert_eq!(habit.streak, reference_streak(&model));
            prop_assert_eq!(habit.streak, current_streak(&habit.completed_dates, today()));
            prop_assert_eq!(habit.completed_dates.len(), model.len());
        }
    }

    #[test]
    fn aggregates_agree_with_habits(
        plan in prop::collection::vec(prop::collection::vec(0u32..10, 0..12), 0..8)
    ) {
        let mut s = store();
        for toggles in &plan {
            let id = s.add(HabitDraft::default()).id;
            for &n in toggles {
                s.toggle_on(id, today().days_before(n));
            }
        }
        let habits = s.snapshot();

        let total: usize = habits.iter().map(|h| h.completed_dates.len()).sum();
        prop_assert_eq!(total_completions(habits), total);

        let lacking = habits.iter().filter(|h| !h.completed_dates.contains(&today())).count();
        prop_assert_eq!(pending_today(habits, today()), lacking);

        prop_assert_eq!(top_streak(habits), habits.iter().map(|h| h.streak).max().unwrap_or(0));

        let week = trailing_completion_series(habits, today(), 7);
        let in_week: usize = week.iter().map(|d| d.count).sum();
        let expected: usize = habits
            .iter()
            .map(|h| h.completed_dates.iter().filter(|d| **d > today().days_before(7)).count())
            .sum();
        prop_assert_eq!(in_week, expected);
    }
}

#[test]
fn three_day_run_then_untoggle_today() {
    let mut s = store();
    let id = s.add(HabitDraft::named("Journal")).id;
    for n in [2, 0, 1] {
        s.toggle_on(id, today().days_before(n));
    }
    assert_eq!(s.get(id).unwrap().streak, 3);
    s.toggle(id);
    assert_eq!(s.get(id).unwrap().streak, 2);
}

#[test]
fn week_series_for_two_habits() {
    let mut s = store();
    let a = s.add(HabitDraft::named("A")).id;
    let b = s.add(HabitDraft::named("B")).id;
    s.toggle_on(a, today().days_before(1));
    s.toggle_on(a, today().days_before(3));
    s.toggle_on(b, today().days_before(3));

    let series = trailing_completion_series(s.snapshot(), today(), 7);
    let expected: Vec<(DayKey, usize)> = (0..7u32)
        .rev()
        .map(|n| {
            let count = match n {
                3 => 2,
                1 => 1,
                _ => 0,
            };
            (today().days_before(n), count)
        })
        .collect();
    let actual: Vec<(DayKey, usize)> = series.iter().map(|d| (d.day, d.count)).collect();
    assert_eq!(actual, expected);
}
