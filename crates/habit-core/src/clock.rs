//! Source of "today" for the tracker.
//!
//! Every operation reads the clock once and threads that date through, so a
//! listing never straddles midnight.

use chrono::{DateTime, NaiveDate, Utc};
use std::cell::Cell;

pub trait Clock {
    /// Current calendar date in UTC.
    fn today(&self) -> NaiveDate;

    /// Current instant, used for `created_at` / `updated_at` stamps.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one date. The date can be moved with [`FixedClock::set`].
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Cell::new(date),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        self.date.set(date);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date.get()
    }

    fn now(&self) -> DateTime<Utc> {
        self.date.get().and_time(chrono::NaiveTime::MIN).and_utc()
    }
}
