use chrono::Days;
use tracing::{debug, info};

use crate::checkin::HabitCheckin;
use crate::clock::{Clock, SystemClock};
use crate::error::{HabitError, Result};
use crate::habit::{self, Habit, HabitFilter, HabitUpdate, NewHabit};
use crate::period::PeriodWindow;
use crate::progress::{self, HabitDetail, HabitProgress};
use crate::store::Store;
use crate::types::Frequency;
use crate::workspace::{Strategy, Workspace};

/// How far back the detail view lists individual check-ins.
pub const RECENT_CHECKIN_DAYS: u64 = 14;

/// Habit operations for an explicitly supplied owner.
///
/// Owner identity is a parameter of every call; the tracker holds no notion
/// of a current user.
pub struct Tracker<C = SystemClock> {
    store: Store,
    clock: C,
}

impl Tracker<SystemClock> {
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> Tracker<C> {
    pub fn with_clock(store: Store, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Workspaces and strategies
    // -----------------------------------------------------------------------

    pub fn create_workspace(&mut self, owner: &str, name: &str) -> Result<Workspace> {
        let name = habit::normalize_title(name)?;
        let ws = self.store.insert_workspace(owner, &name, self.clock.now())?;
        info!(owner, workspace_id = ws.id, "created workspace");
        Ok(ws)
    }

    pub fn list_workspaces(&self, owner: &str) -> Result<Vec<Workspace>> {
        self.store.list_workspaces(owner)
    }

    pub fn create_strategy(&mut self, owner: &str, workspace_id: i64, title: &str) -> Result<Strategy> {
        let title = habit::normalize_title(title)?;
        if !self.store.workspace_owned(owner, workspace_id)? {
            return Err(HabitError::WorkspaceNotOwned(workspace_id));
        }
        let strategy = self
            .store
            .insert_strategy(owner, workspace_id, &title, self.clock.now())?;
        info!(owner, strategy_id = strategy.id, workspace_id, "created strategy");
        Ok(strategy)
    }

    pub fn list_strategies(&self, owner: &str, workspace_id: Option<i64>) -> Result<Vec<Strategy>> {
        self.store.list_strategies(owner, workspace_id)
    }

    // -----------------------------------------------------------------------
    // Habits
    // -----------------------------------------------------------------------

    /// Habits matching `filter` with their current-period progress, in
    /// display order.
    pub fn list_habits(&self, owner: &str, filter: &HabitFilter) -> Result<Vec<HabitProgress>> {
        let habits = self.store.list_habits(owner, filter)?;
        let today = self.clock.today();
        let Some(window) = progress::query_window(&habits, today) else {
            return Ok(Vec::new());
        };

        let ids: Vec<i64> = habits.iter().map(|h| h.id).collect();
        let rows = self.store.checkin_counts(owner, &ids, window)?;
        let mut out = progress::aggregate(habits, &rows, today);
        out.sort_by(|a, b| habit::display_order(&a.habit, &b.habit));
        Ok(out)
    }

    /// One habit with its current-period progress and recent check-ins.
    pub fn get_habit(&self, owner: &str, id: i64) -> Result<HabitDetail> {
        let habit = self.owned_habit(owner, id)?;
        let today = self.clock.today();
        let window = PeriodWindow::resolve(habit.frequency, today);
        let period_count = self.store.sum_checkins(owner, id, window)?;
        let today_count = self
            .store
            .sum_checkins(owner, id, PeriodWindow::resolve(Frequency::Daily, today))?;
        let since = today - Days::new(RECENT_CHECKIN_DAYS - 1);
        let recent_checkins = self.store.recent_checkins(owner, id, since)?;
        debug!(owner, habit_id = id, period_count, today_count, "loaded habit detail");

        Ok(HabitDetail {
            progress: HabitProgress::new(habit, window, period_count, today_count),
            recent_checkins,
        })
    }

    pub fn create_habit(&mut self, owner: &str, input: NewHabit) -> Result<Habit> {
        let title = habit::normalize_title(&input.title)?;
        self.check_links(owner, input.workspace_id, input.strategy_id)?;

        let habit = self.store.insert_habit(&Habit {
            id: 0,
            owner_id: owner.to_string(),
            workspace_id: input.workspace_id,
            strategy_id: input.strategy_id,
            title,
            description: habit::normalize_description(input.description.as_deref()),
            frequency: Frequency::coerce(&input.frequency),
            target_count: habit::normalize_target(input.target_count),
            is_active: true,
            created_at: self.clock.now(),
            updated_at: None,
        })?;
        info!(owner, habit_id = habit.id, frequency = %habit.frequency, "created habit");
        Ok(habit)
    }

    pub fn edit_habit(&mut self, owner: &str, id: i64, update: HabitUpdate) -> Result<Habit> {
        let mut habit = self.owned_habit(owner, id)?;
        update.apply(&mut habit)?;
        self.check_links(owner, habit.workspace_id, habit.strategy_id)?;
        habit.updated_at = Some(self.clock.now());

        if !self.store.update_habit(&habit)? {
            return Err(HabitError::HabitNotFound(id));
        }
        info!(owner, habit_id = id, "edited habit");
        Ok(habit)
    }

    pub fn toggle_active(&mut self, owner: &str, id: i64) -> Result<Habit> {
        let habit = self
            .store
            .toggle_habit(owner, id, self.clock.now())?
            .ok_or(HabitError::HabitNotFound(id))?;
        info!(owner, habit_id = id, is_active = habit.is_active, "toggled habit");
        Ok(habit)
    }

    pub fn delete_habit(&mut self, owner: &str, id: i64) -> Result<()> {
        if !self.store.delete_habit(owner, id)? {
            return Err(HabitError::HabitNotFound(id));
        }
        info!(owner, habit_id = id, "deleted habit");
        Ok(())
    }

    /// Record one completion of habit `id` today.
    pub fn check_in(&mut self, owner: &str, id: i64) -> Result<HabitCheckin> {
        let today = self.clock.today();
        let row = self
            .store
            .record_checkin(owner, id, today, self.clock.now())?
            .ok_or(HabitError::HabitNotFound(id))?;
        info!(owner, habit_id = id, day = %today, count = row.count, "checked in");
        Ok(row)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn owned_habit(&self, owner: &str, id: i64) -> Result<Habit> {
        self.store
            .get_habit(owner, id)?
            .ok_or(HabitError::HabitNotFound(id))
    }

    fn check_links(&self, owner: &str, workspace_id: i64, strategy_id: Option<i64>) -> Result<()> {
        if !self.store.workspace_owned(owner, workspace_id)? {
            return Err(HabitError::WorkspaceNotOwned(workspace_id));
        }
        if let Some(strategy_id) = strategy_id {
            if !self
                .store
                .strategy_in_workspace(owner, strategy_id, workspace_id)?
            {
                return Err(HabitError::StrategyNotOwned(strategy_id));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
