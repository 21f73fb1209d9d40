use std::collections::BTreeSet;

use super::day::DayKey;

/// Count consecutive completed days ending at `today`, or at yesterday when
/// today is not done yet. Anything older than yesterday breaks the streak.
pub fn current_streak(days: &BTreeSet<DayKey>, today: DayKey) -> u32 {
    let yesterday = today.pred();
    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0u32;
    while days.contains(&cursor) {
        streak += 1;
        let prev = cursor.pred();
        if prev == cursor {
            break;
        }
        cursor = prev;
    }
    streak
}

/// Longest run of consecutive days anywhere in the history.
pub fn best_streak(days: &BTreeSet<DayKey>) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut last: Option<DayKey> = None;

    for &day in days {
        run = match last {
            Some(prev) if prev.succ() == day => run + 1,
            _ => 1,
        };
        best = best.max(run);
        last = Some(day);
    }
    best
}
