use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

/// A calendar day, serialized as `YYYY-MM-DD`.
///
/// All completion bookkeeping compares `DayKey`s, never display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The local calendar day containing a millisecond Unix timestamp.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis)
            .map(|dt| Self(dt.with_timezone(&Local).date_naive()))
    }

    /// The previous day, saturating at the earliest representable date.
    pub fn pred(&self) -> Self {
        Self(self.0.pred_opt().unwrap_or(NaiveDate::MIN))
    }

    /// The next day, saturating at the latest representable date.
    pub fn succ(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    /// The day `n` days earlier, saturating at the earliest representable date.
    pub fn days_before(&self, n: u32) -> Self {
        Self(self.0.checked_sub_days(Days::new(u64::from(n))).unwrap_or(NaiveDate::MIN))
    }

    /// Short weekday name ("Mon", "Tue", ...) for chart axes.
    pub fn weekday_label(&self) -> String {
        self.0.format("%a").to_string()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Source of "now" for the store and analytics.
pub trait Clock {
    fn today(&self) -> DayKey;

    /// Milliseconds since the Unix epoch, used for creation timestamps.
    fn now_millis(&self) -> i64;

    fn yesterday(&self) -> DayKey {
        self.today().pred()
    }

    fn days_ago(&self, n: u32) -> DayKey {
        self.today().days_before(n)
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DayKey {
        DayKey(Local::now().date_naive())
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// A clock pinned to a given day. Can be moved with [`FixedClock::set`] and
/// [`FixedClock::advance`].
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<DayKey>,
}

impl FixedClock {
    pub fn new(today: DayKey) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    pub fn set(&self, today: DayKey) {
        self.today.set(today);
    }

    pub fn advance(&self, days: u32) {
        let mut day = self.today.get();
        for _ in 0..days {
            day = day.succ();
        }
        self.today.set(day);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DayKey {
        self.today.get()
    }

    fn now_millis(&self) -> i64 {
        // Noon local time keeps the timestamp inside the pinned day in every zone.
        let noon = self.today.get().0.and_hms_opt(12, 0, 0).unwrap_or_default();
        Local
            .from_local_datetime(&noon)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| noon.and_utc().timestamp_millis())
    }
}

/// Today's key on the system clock.
pub fn today() -> DayKey {
    SystemClock.today()
}

/// Yesterday's key on the system clock.
pub fn yesterday() -> DayKey {
    SystemClock.yesterday()
}

/// The key `n` days before today on the system clock.
pub fn days_ago(n: u32) -> DayKey {
    SystemClock.days_ago(n)
}
