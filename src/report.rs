//! Plain-text views of habits and statistics.

use crate::core::analytics::Dashboard;
use crate::core::day::DayKey;
use crate::core::habit::{DEFAULT_CATEGORY, DEFAULT_NAME, Habit, HabitDraft};

/// Days shown in each habit's completion grid.
pub const GRID_DAYS: u32 = 14;

const DONE: char = '\u{25CF}';
const MISSED: char = '\u{25CB}';
const BAR: char = '\u{2588}';

/// 14-day completion grid, oldest day first.
pub fn habit_grid(habit: &Habit, today: DayKey) -> String {
    (0..GRID_DAYS)
        .rev()
        .map(|days_ago| {
            if habit.is_completed_on(today.days_before(days_ago)) {
                DONE
            } else {
                MISSED
            }
        })
        .collect()
}

/// One habit: checkbox, title, grid and streak figures.
pub fn habit_line(habit: &Habit, today: DayKey) -> String {
    let check = if habit.is_due(today) { "[ ]" } else { "[x]" };
    let short_id: String = habit.id.to_string().chars().take(8).collect();
    format!(
        "{} {} {}  {}  {}d streak (best {})  {} \u{00B7} {}",
        check,
        short_id,
        habit.name,
        habit_grid(habit, today),
        habit.streak,
        habit.best_streak(),
        habit.category,
        habit.frequency.as_str(),
    )
}

pub fn habit_list(habits: &[Habit], today: DayKey) -> String {
    if habits.is_empty() {
        return "No habits yet. Add one with `habitflow add <name>`.\n".to_string();
    }
    let mut out = String::new();
    for habit in habits {
        out.push_str(&habit_line(habit, today));
        out.push('\n');
        if !habit.description.is_empty() {
            out.push_str(&format!("      {}\n", habit.description));
        }
    }
    out
}

pub fn dashboard(d: &Dashboard) -> String {
    let mut out = format!("Today {}\n", d.today);
    out.push_str(&format!(
        "  Pending today:     {} of {}\n",
        d.pending_today, d.habit_count
    ));
    out.push_str(&format!("  Top streak:        {}d\n", d.top_streak));
    out.push_str(&format!("  Best streak:       {}d\n", d.best_streak));
    out.push_str(&format!("  Total completions: {}\n", d.total_completions));
    out.push_str(&format!("  Categories:        {}\n", d.category_count));
    out.push_str(&format!("  Consistency:       {}%\n", d.consistency));
    out.push_str("\nLast 7 days\n");
    for entry in &d.week {
        let bar: String = std::iter::repeat_n(BAR, entry.count).collect();
        out.push_str(&format!(
            "  {} {}  {:<10} {}\n",
            entry.day.weekday_label(),
            entry.day,
            bar,
            entry.count
        ));
    }
    out
}

pub fn suggestions(drafts: &[HabitDraft]) -> String {
    let mut out = String::new();
    for (i, draft) in drafts.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} [{}]\n",
            i + 1,
            draft.name.as_deref().unwrap_or(DEFAULT_NAME),
            draft.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
        ));
        if let Some(description) = draft.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("   {}\n", description));
        }
    }
    out
}
