use uuid::Uuid;

use super::day::{Clock, DayKey, SystemClock};
use super::habit::{Habit, HabitDraft};

/// In-memory owner of the habit collection.
///
/// Every mutation keeps each habit's `streak` equal to a full recomputation
/// from its completed days, evaluated against the store's clock.
#[derive(Debug)]
pub struct HabitStore<C: Clock = SystemClock> {
    habits: Vec<Habit>,
    clock: C,
}

impl Default for HabitStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> HabitStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            habits: Vec::new(),
            clock,
        }
    }

    /// Take ownership of previously persisted habits. Streaks are re-derived
    /// since days may have passed since they were stored.
    pub fn from_habits(habits: Vec<Habit>, clock: C) -> Self {
        let mut store = Self { habits, clock };
        let healed = store.refresh_streaks();
        if healed > 0 {
            log::info!("Refreshed {} stale streak(s) on load", healed);
        }
        store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> DayKey {
        self.clock.today()
    }

    pub fn add(&mut self, draft: HabitDraft) -> Habit {
        let habit = Habit::from_draft(draft, self.fresh_id(), self.clock.now_millis());
        log::debug!("Adding habit {} ({})", habit.name, habit.id);
        self.habits.push(habit.clone());
        habit
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    /// Remove a habit. Unknown ids are ignored; returns whether anything was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        let removed = self.habits.len() != before;
        if removed {
            log::debug!("Removed habit {}", id);
        }
        removed
    }

    /// Flip today's completion for a habit.
    pub fn toggle(&mut self, id: Uuid) -> Option<&Habit> {
        let today = self.clock.today();
        self.toggle_on(id, today)
    }

    /// Flip completion of `day` for a habit. The streak is always measured
    /// against the clock's today, whichever day was toggled.
    pub fn toggle_on(&mut self, id: Uuid, day: DayKey) -> Option<&Habit> {
        let today = self.clock.today();
        let habit = self.habits.iter_mut().find(|h| h.id == id)?;
        let completed = habit.toggle_day(day, today);
        log::debug!(
            "Toggled {} on {}: completed={}, streak={}",
            habit.name,
            day,
            completed,
            habit.streak
        );
        Some(&*habit)
    }

    pub fn snapshot(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Resolve a user-typed selector: full id, exact name (case-insensitive),
    /// unique id prefix, or unique name prefix.
    pub fn find(&self, selector: &str) -> Option<&Habit> {
        let s = selector.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(id) = Uuid::parse_str(s) {
            return self.get(id);
        }

        let needle = s.to_lowercase();

        let exact = self
            .habits
            .iter()
            .filter(|h| h.name.to_lowercase() == needle)
            .collect();
        if let Some(h) = single(exact) {
            return Some(h);
        }

        if needle.len() >= 4 && needle.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            let by_id = self
                .habits
                .iter()
                .filter(|h| h.id.to_string().starts_with(&needle))
                .collect();
            if let Some(h) = single(by_id) {
                return Some(h);
            }
        }

        let prefixed = self
            .habits
            .iter()
            .filter(|h| h.name.to_lowercase().starts_with(&needle))
            .collect();
        single(prefixed)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Drop every habit.
    pub fn clear(&mut self) {
        log::info!("Clearing {} habit(s)", self.habits.len());
        self.habits.clear();
    }

    /// Re-derive every streak against today. Returns how many changed.
    pub fn refresh_streaks(&mut self) -> usize {
        let today = self.clock.today();
        let mut changed = 0;
        for habit in &mut self.habits {
            let before = habit.streak;
            habit.recalculate_streak(today);
            if habit.streak != before {
                changed += 1;
            }
        }
        changed
    }

    pub fn into_habits(self) -> Vec<Habit> {
        self.habits
    }
}

fn single<T>(mut matches: Vec<T>) -> Option<T> {
    if matches.len() == 1 { matches.pop() } else { None }
}
