//! Per-period rollup of check-ins.
//!
//! Listing is two reads regardless of how many habits are shown: the habits,
//! then every check-in inside the union of their current windows. Grouping
//! and summing happen here.

use crate::checkin::HabitCheckin;
use crate::habit::Habit;
use crate::period::PeriodWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The slice of a check-in row the rollup needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinCount {
    pub habit_id: i64,
    pub occurred_on: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitProgress {
    #[serde(flatten)]
    pub habit: Habit,
    pub period_start: NaiveDate,
    /// Inclusive last day of the current period.
    pub period_end: NaiveDate,
    pub period_count: u32,
    pub today_count: u32,
    pub completed: bool,
    pub remaining: u32,
}

impl HabitProgress {
    pub fn new(habit: Habit, window: PeriodWindow, period_count: u32, today_count: u32) -> Self {
        let target = habit.target_count;
        Self {
            period_start: window.start,
            period_end: window.last_day(),
            period_count,
            today_count,
            completed: period_count >= target,
            remaining: target.saturating_sub(period_count),
            habit,
        }
    }
}

/// Single-habit view: progress plus the most recent check-in rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDetail {
    #[serde(flatten)]
    pub progress: HabitProgress,
    pub recent_checkins: Vec<HabitCheckin>,
}

/// Window covering every habit's current period, or `None` for no habits.
pub fn query_window(habits: &[Habit], today: NaiveDate) -> Option<PeriodWindow> {
    PeriodWindow::union(
        habits
            .iter()
            .map(|h| PeriodWindow::resolve(h.frequency, today)),
    )
}

/// Roll `rows` up against each habit's own window. Habits without rows get
/// zero counts. Output order follows `habits`.
pub fn aggregate(habits: Vec<Habit>, rows: &[CheckinCount], today: NaiveDate) -> Vec<HabitProgress> {
    let mut by_habit: HashMap<i64, Vec<&CheckinCount>> = HashMap::new();
    for row in rows {
        by_habit.entry(row.habit_id).or_default().push(row);
    }

    habits
        .into_iter()
        .map(|habit| {
            let window = PeriodWindow::resolve(habit.frequency, today);
            let own = by_habit.get(&habit.id).map(Vec::as_slice).unwrap_or(&[]);
            let period_count = own
                .iter()
                .filter(|r| window.contains(r.occurred_on))
                .fold(0u32, |acc, r| acc.saturating_add(r.count));
            let today_count = own
                .iter()
                .filter(|r| r.occurred_on == today)
                .fold(0u32, |acc, r| acc.saturating_add(r.count));
            HabitProgress::new(habit, window, period_count, today_count)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
