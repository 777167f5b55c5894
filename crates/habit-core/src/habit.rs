use crate::error::{HabitError, Result};
use crate::types::Frequency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Habit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub owner_id: String,
    pub workspace_id: i64,
    pub strategy_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub target_count: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// List presentation order: active first, then daily before weekly, then title.
pub fn display_order(a: &Habit, b: &Habit) -> Ordering {
    b.is_active
        .cmp(&a.is_active)
        .then_with(|| a.frequency.display_rank().cmp(&b.frequency.display_rank()))
        .then_with(|| a.title.cmp(&b.title))
}

/// Clamp a requested per-period target into the valid range (at least 1).
pub fn normalize_target(target: i64) -> u32 {
    u32::try_from(target.max(1)).unwrap_or(u32::MAX)
}

pub(crate) fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(HabitError::InvalidTitle);
    }
    Ok(title.to_string())
}

pub(crate) fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Fields for a new habit. `frequency` is free text and is coerced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub frequency: String,
    pub target_count: i64,
    pub workspace_id: i64,
    pub strategy_id: Option<i64>,
}

/// Partial edit. `None` leaves a field unchanged; for `description` and
/// `strategy_id`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency: Option<String>,
    pub target_count: Option<i64>,
    pub is_active: Option<bool>,
    pub workspace_id: Option<i64>,
    pub strategy_id: Option<Option<i64>>,
}

impl HabitUpdate {
    /// Apply the edit to `habit` in place, normalising as it goes.
    pub(crate) fn apply(self, habit: &mut Habit) -> Result<()> {
        if let Some(title) = self.title {
            habit.title = normalize_title(&title)?;
        }
        if let Some(description) = self.description {
            habit.description = normalize_description(description.as_deref());
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = Frequency::coerce(&frequency);
        }
        if let Some(target) = self.target_count {
            habit.target_count = normalize_target(target);
        }
        if let Some(active) = self.is_active {
            habit.is_active = active;
        }
        if let Some(workspace_id) = self.workspace_id {
            habit.workspace_id = workspace_id;
        }
        if let Some(strategy_id) = self.strategy_id {
            habit.strategy_id = strategy_id;
        }
        Ok(())
    }
}

/// Optional narrowing for habit listings. All filters combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitFilter {
    pub workspace_id: Option<i64>,
    pub strategy_id: Option<i64>,
    pub frequency: Option<Frequency>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(title: &str, frequency: Frequency, is_active: bool) -> Habit {
        Habit {
            id: 0,
            owner_id: "u1".to_string(),
            workspace_id: 1,
            strategy_id: None,
            title: title.to_string(),
            description: None,
            frequency,
            target_count: 1,
            is_active,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn display_order_active_daily_title() {
        let mut habits = vec![
            habit("Zeta", Frequency::Weekly, true),
            habit("Alpha", Frequency::Daily, true),
            habit("Beta", Frequency::Daily, false),
        ];
        habits.sort_by(display_order);
        let titles: Vec<&str> = habits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "Zeta", "Beta"]);
    }

    #[test]
    fn target_is_at_least_one() {
        assert_eq!(normalize_target(0), 1);
        assert_eq!(normalize_target(-4), 1);
        assert_eq!(normalize_target(3), 3);
    }

    #[test]
    fn blank_title_rejected() {
        assert!(matches!(normalize_title("   "), Err(HabitError::InvalidTitle)));
        assert_eq!(normalize_title("  Read  ").unwrap(), "Read");
    }

    #[test]
    fn update_coerces_and_clears() {
        let mut h = habit("Read", Frequency::Weekly, true);
        h.description = Some("pages".to_string());
        h.strategy_id = Some(4);
        HabitUpdate {
            frequency: Some("sometimes".to_string()),
            target_count: Some(0),
            description: Some(None),
            strategy_id: Some(None),
            ..Default::default()
        }
        .apply(&mut h)
        .unwrap();
        assert_eq!(h.frequency, Frequency::Daily);
        assert_eq!(h.target_count, 1);
        assert!(h.description.is_none());
        assert!(h.strategy_id.is_none());
        assert_eq!(h.title, "Read");
    }
}
