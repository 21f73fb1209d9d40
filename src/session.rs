use uuid::Uuid;

use crate::config::Preferences;
use crate::core::analytics::Dashboard;
use crate::core::day::{Clock, DayKey, SystemClock};
use crate::core::habit::{Habit, HabitDraft};
use crate::core::store::HabitStore;
use crate::storage::{self, HABITS_KEY, KeyValueStore, StorageError};

/// A running app: the habit store plus its persistence. Every mutation
/// writes the full collection back out.
pub struct Session<S: KeyValueStore, C: Clock = SystemClock> {
    store: HabitStore<C>,
    kv: S,
    prefs: Preferences,
    save_error: Option<StorageError>,
}

impl<S: KeyValueStore> Session<S, SystemClock> {
    pub fn open(kv: S) -> Self {
        Self::open_with_clock(kv, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Session<S, C> {
    pub fn open_with_clock(kv: S, clock: C) -> Self {
        let habits = storage::load_habits(&kv);
        let prefs = Preferences::load(&kv);
        log::info!("Loaded {} habit(s)", habits.len());
        Self {
            store: HabitStore::from_habits(habits, clock),
            kv,
            prefs,
            save_error: None,
        }
    }

    pub fn store(&self) -> &HabitStore<C> {
        &self.store
    }

    pub fn habits(&self) -> &[Habit] {
        self.store.snapshot()
    }

    pub fn today(&self) -> DayKey {
        self.store.today()
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn set_preferences(&mut self, prefs: Preferences) -> Result<(), StorageError> {
        prefs.save(&mut self.kv)?;
        self.prefs = prefs;
        Ok(())
    }

    /// Add a habit. A draft without a color takes the theme's accent color.
    pub fn add(&mut self, draft: HabitDraft) -> Habit {
        let habit = self.store.add(with_accent(draft, self.prefs.theme.primary_hex()));
        log::info!("Added habit: {}", habit.name);
        self.persist();
        habit
    }

    /// Add the habits the coach suggested and the user accepted.
    pub fn accept_suggestions(
        &mut self,
        drafts: impl IntoIterator<Item = HabitDraft>,
    ) -> Vec<Habit> {
        let accent = self.prefs.theme.primary_hex();
        let added: Vec<Habit> = drafts
            .into_iter()
            .map(|d| self.store.add(with_accent(d, accent)))
            .collect();
        if !added.is_empty() {
            log::info!("Accepted {} suggested habit(s)", added.len());
            self.persist();
        }
        added
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.persist();
        }
        removed
    }

    pub fn toggle(&mut self, id: Uuid) -> Option<&Habit> {
        let today = self.store.today();
        self.toggle_on(id, today)
    }

    pub fn toggle_on(&mut self, id: Uuid, day: DayKey) -> Option<&Habit> {
        self.store.toggle_on(id, day)?;
        self.persist();
        self.store.get(id)
    }

    /// Delete every habit and the persisted copy.
    pub fn reset(&mut self) {
        self.store.clear();
        if let Err(e) = self.kv.remove(HABITS_KEY) {
            log::error!("Failed to remove saved habits: {}", e);
            self.save_error = Some(e);
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::compute(self.store.snapshot(), self.store.today())
    }

    /// The most recent save failure, if any, clearing it.
    pub fn take_save_error(&mut self) -> Option<StorageError> {
        self.save_error.take()
    }

    fn persist(&mut self) {
        if let Err(e) = storage::save_habits(&mut self.kv, self.store.snapshot()) {
            log::error!("Failed to save habits: {}", e);
            self.save_error = Some(e);
        }
    }
}

fn with_accent(mut draft: HabitDraft, accent: &str) -> HabitDraft {
    if draft.color.as_deref().is_none_or(|c| c.trim().is_empty()) {
        draft.color = Some(accent.to_string());
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::{Coach, CoachBackend, CoachError, CoachRequest};
    use crate::config::{Language, Theme};
    use crate::core::day::FixedClock;
    use crate::storage::MemoryStore;

    fn clock() -> FixedClock {
        FixedClock::new(DayKey::from_ymd(2026, 9, 1).unwrap())
    }

    #[test]
    fn mutations_are_persisted() {
        let mut session = Session::open_with_clock(MemoryStore::new(), clock());
        let id = session.add(HabitDraft::named("Drink water")).id;
        session.toggle(id);

        let reopened = Session::open_with_clock(session.kv().clone(), clock());
        assert_eq!(reopened.habits(), session.habits());
        assert_eq!(reopened.habits()[0].streak, 1);

        session.remove(id);
        let reopened = Session::open_with_clock(session.kv().clone(), clock());
        assert!(reopened.habits().is_empty());
    }

    #[test]
    fn new_habits_take_theme_color() {
        let mut session = Session::open_with_clock(MemoryStore::new(), clock());
        session
            .set_preferences(Preferences {
                theme: Theme::Pink,
                ..Preferences::default()
            })
            .unwrap();
        let h = session.add(HabitDraft::named("Yoga"));
        assert_eq!(h.color, Theme::Pink.primary_hex());

        let h = session.add(HabitDraft {
            color: Some("#000000".into()),
            ..HabitDraft::named("Ink")
        });
        assert_eq!(h.color, "#000000");
    }

    #[test]
    fn reset_clears_storage() {
        let mut session = Session::open_with_clock(MemoryStore::new(), clock());
        session.add(HabitDraft::named("A"));
        session.reset();
        assert!(session.habits().is_empty());
        assert_eq!(session.kv().get(HABITS_KEY).unwrap(), None);
        assert!(session.take_save_error().is_none());
    }

    #[test]
    fn stale_streaks_heal_on_open() {
        let mut session = Session::open_with_clock(MemoryStore::new(), clock());
        let id = session.add(HabitDraft::named("A")).id;
        session.toggle(id);

        let later = clock();
        later.advance(3);
        let reopened = Session::open_with_clock(session.kv().clone(), later);
        assert_eq!(reopened.habits()[0].streak, 0);
        assert_eq!(reopened.dashboard().pending_today, 1);
    }

    /// Reads nothing and refuses every write.
    struct ReadOnly;

    impl KeyValueStore for ReadOnly {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.set(key, "")
        }
    }

    #[test]
    fn failed_save_keeps_habits_and_reports() {
        let mut session = Session::open_with_clock(ReadOnly, clock());
        let id = session.add(HabitDraft::named("Stretch")).id;
        assert!(matches!(
            session.take_save_error(),
            Some(StorageError::Io { ref key, .. }) if key == HABITS_KEY
        ));

        session.toggle(id);
        assert_eq!(session.habits().len(), 1);
        assert_eq!(session.habits()[0].streak, 1);
        assert!(session.take_save_error().is_some());
        assert!(session.take_save_error().is_none());

        session.reset();
        assert!(session.habits().is_empty());
        assert!(session.take_save_error().is_some());
    }

    struct Down;

    impl CoachBackend for Down {
        async fn complete(&self, _request: &CoachRequest) -> Result<String, CoachError> {
            Err(CoachError::Api {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    #[tokio::test]
    async fn coach_failure_leaves_habits_alone() {
        let mut session = Session::open_with_clock(MemoryStore::new(), clock());
        let id = session.add(HabitDraft::named("A")).id;
        session.toggle(id);
        let before = session.habits().to_vec();

        let coach = Coach::new(Down, Language::En);
        if let Ok(drafts) = coach.suggest_habits("get fit").await {
            session.accept_suggestions(drafts);
        }
        assert_eq!(session.habits(), before.as_slice());

        // manual edits still work afterwards
        session.toggle(id);
        assert_eq!(session.habits()[0].streak, 0);
    }
}
