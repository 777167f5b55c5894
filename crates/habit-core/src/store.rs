//! SQLite persistence for workspaces, strategies, habits and check-ins.
//!
//! Every statement filters on `owner_id`; rows belonging to another owner are
//! indistinguishable from rows that do not exist.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

use crate::checkin::{self, HabitCheckin};
use crate::error::Result;
use crate::habit::{Habit, HabitFilter};
use crate::period::PeriodWindow;
use crate::progress::CheckinCount;
use crate::types::Frequency;
use crate::workspace::{Strategy, Workspace};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS workspaces (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  owner_id TEXT NOT NULL,
  name TEXT NOT NULL,
  created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_workspaces_owner ON workspaces(owner_id);

CREATE TABLE IF NOT EXISTS strategies (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  owner_id TEXT NOT NULL,
  workspace_id INTEGER NOT NULL,
  title TEXT NOT NULL,
  created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_strategies_owner ON strategies(owner_id, workspace_id);

CREATE TABLE IF NOT EXISTS habits (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  owner_id TEXT NOT NULL,
  workspace_id INTEGER NOT NULL,
  strategy_id INTEGER,
  title TEXT NOT NULL,
  description TEXT,
  frequency TEXT NOT NULL CHECK (frequency IN ('Daily', 'Weekly')),
  target_count INTEGER NOT NULL CHECK (target_count >= 1),
  is_active INTEGER NOT NULL DEFAULT 1,
  created_at TEXT NOT NULL,
  updated_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_habits_owner ON habits(owner_id);

CREATE TABLE IF NOT EXISTS habit_checkins (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  habit_id INTEGER NOT NULL,
  owner_id TEXT NOT NULL,
  occurred_on TEXT NOT NULL,
  count INTEGER NOT NULL CHECK (count >= 1),
  note TEXT,
  created_at TEXT NOT NULL,
  UNIQUE (habit_id, owner_id, occurred_on)
);
CREATE INDEX IF NOT EXISTS idx_habit_checkins_owner_day ON habit_checkins(owner_id, occurred_on);
"#;

const HABIT_COLUMNS: &str = "id, owner_id, workspace_id, strategy_id, title, description, \
     frequency, target_count, is_active, created_at, updated_at";

const CHECKIN_COLUMNS: &str = "id, habit_id, owner_id, occurred_on, count, note, created_at";

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let frequency: String = row.get(6)?;
    Ok(Habit {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        workspace_id: row.get(2)?,
        strategy_id: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        frequency: Frequency::coerce(&frequency),
        target_count: row.get(7)?,
        is_active: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn checkin_from_row(row: &Row<'_>) -> rusqlite::Result<HabitCheckin> {
    Ok(HabitCheckin {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        owner_id: row.get(2)?,
        occurred_on: row.get(3)?,
        count: row.get(4)?,
        note: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn workspace_from_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn strategy_from_row(row: &Row<'_>) -> rusqlite::Result<Strategy> {
    Ok(Strategy {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        workspace_id: row.get(2)?,
        title: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// `%term%` with LIKE wildcards in `term` escaped by backslash.
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the database at `path` and apply the schema.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        let store = Self { conn };
        store.migrate()?;
        debug!(path = %path.display(), "opened habit store");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Workspaces and strategies
    // -----------------------------------------------------------------------

    pub fn insert_workspace(
        &mut self,
        owner: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Workspace> {
        self.conn.execute(
            "INSERT INTO workspaces(owner_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![owner, name, now],
        )?;
        Ok(Workspace {
            id: self.conn.last_insert_rowid(),
            owner_id: owner.to_string(),
            name: name.to_string(),
            created_at: now,
        })
    }

    pub fn list_workspaces(&self, owner: &str) -> Result<Vec<Workspace>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, name, created_at FROM workspaces WHERE owner_id = ?1 ORDER BY name, id",
        )?;
        let rows = stmt.query_map(params![owner], workspace_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn workspace_owned(&self, owner: &str, workspace_id: i64) -> Result<bool> {
        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM workspaces WHERE id = ?1 AND owner_id = ?2",
                params![workspace_id, owner],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    pub fn insert_strategy(
        &mut self,
        owner: &str,
        workspace_id: i64,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<Strategy> {
        self.conn.execute(
            "INSERT INTO strategies(owner_id, workspace_id, title, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![owner, workspace_id, title, now],
        )?;
        Ok(Strategy {
            id: self.conn.last_insert_rowid(),
            owner_id: owner.to_string(),
            workspace_id,
            title: title.to_string(),
            created_at: now,
        })
    }

    pub fn list_strategies(&self, owner: &str, workspace_id: Option<i64>) -> Result<Vec<Strategy>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, owner_id, workspace_id, title, created_at
            FROM strategies
            WHERE owner_id = ?1 AND (?2 IS NULL OR workspace_id = ?2)
            ORDER BY title, id
            "#,
        )?;
        let rows = stmt.query_map(params![owner, workspace_id], strategy_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// True when `strategy_id` is owned by `owner` and sits in `workspace_id`.
    pub fn strategy_in_workspace(
        &self,
        owner: &str,
        strategy_id: i64,
        workspace_id: i64,
    ) -> Result<bool> {
        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM strategies WHERE id = ?1 AND owner_id = ?2 AND workspace_id = ?3",
                params![strategy_id, owner, workspace_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    // -----------------------------------------------------------------------
    // Habits
    // -----------------------------------------------------------------------

    /// Insert `habit` (its `id` is ignored) and return it with the new id.
    pub fn insert_habit(&mut self, habit: &Habit) -> Result<Habit> {
        self.conn.execute(
            r#"
            INSERT INTO habits(owner_id, workspace_id, strategy_id, title, description,
                               frequency, target_count, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                habit.owner_id,
                habit.workspace_id,
                habit.strategy_id,
                habit.title,
                habit.description,
                habit.frequency.as_str(),
                habit.target_count,
                habit.is_active,
                habit.created_at,
                habit.updated_at,
            ],
        )?;
        Ok(Habit {
            id: self.conn.last_insert_rowid(),
            ..habit.clone()
        })
    }

    pub fn get_habit(&self, owner: &str, id: i64) -> Result<Option<Habit>> {
        let sql = format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND owner_id = ?2");
        Ok(self
            .conn
            .query_row(&sql, params![id, owner], habit_from_row)
            .optional()?)
    }

    /// Habits for `owner` matching `filter`, in id order.
    pub fn list_habits(&self, owner: &str, filter: &HabitFilter) -> Result<Vec<Habit>> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);
        let sql = format!(
            r#"
            SELECT {HABIT_COLUMNS}
            FROM habits
            WHERE owner_id = ?1
              AND (?2 IS NULL OR workspace_id = ?2)
              AND (?3 IS NULL OR strategy_id = ?3)
              AND (?4 IS NULL OR frequency = ?4)
              AND (?5 IS NULL
                   OR title LIKE ?5 ESCAPE '\'
                   OR COALESCE(description, '') LIKE ?5 ESCAPE '\')
            ORDER BY id
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                owner,
                filter.workspace_id,
                filter.strategy_id,
                filter.frequency.map(Frequency::as_str),
                search,
            ],
            habit_from_row,
        )?;
        let habits = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(owner, count = habits.len(), "listed habits");
        Ok(habits)
    }

    /// Overwrite the editable columns of `habit`. Returns false when no row
    /// with that id belongs to `habit.owner_id`.
    pub fn update_habit(&mut self, habit: &Habit) -> Result<bool> {
        let changed = self.conn.execute(
            r#"
            UPDATE habits
            SET workspace_id = ?3, strategy_id = ?4, title = ?5, description = ?6,
                frequency = ?7, target_count = ?8, is_active = ?9, updated_at = ?10
            WHERE id = ?1 AND owner_id = ?2
            "#,
            params![
                habit.id,
                habit.owner_id,
                habit.workspace_id,
                habit.strategy_id,
                habit.title,
                habit.description,
                habit.frequency.as_str(),
                habit.target_count,
                habit.is_active,
                habit.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Flip `is_active` and return the updated habit.
    pub fn toggle_habit(&mut self, owner: &str, id: i64, now: DateTime<Utc>) -> Result<Option<Habit>> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE habits SET is_active = NOT is_active, updated_at = ?3 WHERE id = ?1 AND owner_id = ?2",
            params![id, owner, now],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND owner_id = ?2");
        let habit = tx.query_row(&sql, params![id, owner], habit_from_row)?;
        tx.commit()?;
        Ok(Some(habit))
    }

    /// Delete the habit row. Its check-ins are left in place.
    pub fn delete_habit(&mut self, owner: &str, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND owner_id = ?2",
            params![id, owner],
        )?;
        Ok(deleted > 0)
    }

    // -----------------------------------------------------------------------
    // Check-ins
    // -----------------------------------------------------------------------

    /// Add one completion for `habit_id` on `day`, creating the day's row or
    /// incrementing it. Returns `None` when the habit is not `owner`'s.
    ///
    /// Runs in an IMMEDIATE transaction so concurrent writers serialize on
    /// the database write lock; combined with the unique key this rules out
    /// both duplicate rows and lost increments.
    pub fn record_checkin(
        &mut self,
        owner: &str,
        habit_id: i64,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Option<HabitCheckin>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let habit = tx
            .query_row(
                "SELECT frequency, target_count FROM habits WHERE id = ?1 AND owner_id = ?2",
                params![habit_id, owner],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)),
            )
            .optional()?;
        let Some((frequency, target)) = habit else {
            return Ok(None);
        };

        let previous: Option<u32> = tx
            .query_row(
                "SELECT count FROM habit_checkins WHERE habit_id = ?1 AND owner_id = ?2 AND occurred_on = ?3",
                params![habit_id, owner, day],
                |row| row.get(0),
            )
            .optional()?;
        let count = checkin::next_count(Frequency::coerce(&frequency), target, previous);

        tx.execute(
            r#"
            INSERT INTO habit_checkins(habit_id, owner_id, occurred_on, count, note, created_at)
            VALUES (?1, ?2, ?3, ?4, NULL, ?5)
            ON CONFLICT(habit_id, owner_id, occurred_on) DO UPDATE SET count = excluded.count
            "#,
            params![habit_id, owner, day, count, now],
        )?;

        let sql = format!(
            "SELECT {CHECKIN_COLUMNS} FROM habit_checkins \
             WHERE habit_id = ?1 AND owner_id = ?2 AND occurred_on = ?3"
        );
        let row = tx.query_row(&sql, params![habit_id, owner, day], checkin_from_row)?;
        tx.commit()?;
        Ok(Some(row))
    }

    /// Every check-in for `owner` on any of `habit_ids` inside `window`, in
    /// one query.
    pub fn checkin_counts(
        &self,
        owner: &str,
        habit_ids: &[i64],
        window: PeriodWindow,
    ) -> Result<Vec<CheckinCount>> {
        if habit_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: Vec<String> = (0..habit_ids.len()).map(|i| format!("?{}", i + 4)).collect();
        let sql = format!(
            r#"
            SELECT habit_id, occurred_on, count
            FROM habit_checkins
            WHERE owner_id = ?1
              AND occurred_on >= ?2
              AND occurred_on < ?3
              AND habit_id IN ({})
            "#,
            placeholders.join(", ")
        );

        let mut values = vec![
            Value::Text(owner.to_string()),
            Value::Text(window.start.to_string()),
            Value::Text(window.end_exclusive.to_string()),
        ];
        values.extend(habit_ids.iter().map(|id| Value::Integer(*id)));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(CheckinCount {
                habit_id: row.get(0)?,
                occurred_on: row.get(1)?,
                count: row.get(2)?,
            })
        })?;
        let counts = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(
            owner,
            habits = habit_ids.len(),
            from = %window.start,
            until = %window.end_exclusive,
            rows = counts.len(),
            "fetched check-ins for period rollup"
        );
        Ok(counts)
    }

    /// Sum of counts for one habit inside `window`; 0 when there are none.
    pub fn sum_checkins(&self, owner: &str, habit_id: i64, window: PeriodWindow) -> Result<u32> {
        Ok(self.conn.query_row(
            r#"
            SELECT COALESCE(SUM(count), 0)
            FROM habit_checkins
            WHERE habit_id = ?1 AND owner_id = ?2 AND occurred_on >= ?3 AND occurred_on < ?4
            "#,
            params![habit_id, owner, window.start, window.end_exclusive],
            |row| row.get(0),
        )?)
    }

    /// Check-ins for one habit on or after `since`, most recent first.
    pub fn recent_checkins(
        &self,
        owner: &str,
        habit_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<HabitCheckin>> {
        let sql = format!(
            "SELECT {CHECKIN_COLUMNS} FROM habit_checkins \
             WHERE habit_id = ?1 AND owner_id = ?2 AND occurred_on >= ?3 \
             ORDER BY occurred_on DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![habit_id, owner, since], checkin_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Rows for `(habit_id, owner, day)`; the unique key keeps this at 0 or 1.
    pub fn checkin_rows_on(&self, owner: &str, habit_id: i64, day: NaiveDate) -> Result<u32> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM habit_checkins WHERE habit_id = ?1 AND owner_id = ?2 AND occurred_on = ?3",
            params![habit_id, owner, day],
            |row| row.get(0),
        )?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
