use crate::types::Frequency;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Completions of one habit by one owner on one calendar day. There is at
/// most one row per `(habit_id, owner_id, occurred_on)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCheckin {
    pub id: i64,
    pub habit_id: i64,
    pub owner_id: String,
    pub occurred_on: NaiveDate,
    pub count: u32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Count a day's row should hold after one more check-in.
///
/// Daily habits cap at their target, including the first check-in of the day.
/// Weekly rows are never capped here; only the weekly sum is compared against
/// the target.
pub fn next_count(frequency: Frequency, target: u32, previous: Option<u32>) -> u32 {
    let next = previous.unwrap_or(0).saturating_add(1);
    match frequency {
        Frequency::Daily => next.min(target.max(1)),
        Frequency::Weekly => next,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run(frequency: Frequency, target: u32, times: usize) -> Vec<u32> {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..times {
            let next = next_count(frequency, target, current);
            seen.push(next);
            current = Some(next);
        }
        seen
    }

    #[test]
    fn daily_caps_at_target() {
        assert_eq!(run(Frequency::Daily, 3, 4), [1, 2, 3, 3]);
    }

    #[test]
    fn weekly_is_uncapped() {
        assert_eq!(run(Frequency::Weekly, 2, 4), [1, 2, 3, 4]);
    }

    #[test]
    fn daily_existing_row_above_target_is_pulled_down() {
        // Target lowered after the row was written.
        assert_eq!(next_count(Frequency::Daily, 2, Some(5)), 2);
    }
}
