pub mod analytics;
pub mod day;
pub mod habit;
pub mod store;
pub mod streak;

pub use day::{Clock, DayKey, FixedClock, SystemClock};
pub use habit::{Frequency, Habit, HabitDraft, HabitSummary};
pub use store::HabitStore;
