use super::{open_tracker, require_owner};
use crate::output::{print_json, print_table, progress_cell};
use anyhow::Context;
use clap::Subcommand;
use habit_core::habit::{HabitFilter, HabitUpdate, NewHabit};
use habit_core::types::Frequency;
use std::path::Path;

#[derive(Subcommand)]
pub enum HabitSubcommand {
    /// Create a habit in a workspace
    Create {
        #[arg(long)]
        workspace: i64,
        /// Link the habit to a strategy in the same workspace
        #[arg(long)]
        strategy: Option<i64>,
        #[arg(long)]
        description: Option<String>,
        /// daily or weekly (anything else is treated as daily)
        #[arg(long)]
        frequency: Option<String>,
        /// Completions per period
        #[arg(long)]
        target: Option<i64>,
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// List habits with progress for the current period
    List {
        #[arg(long)]
        workspace: Option<i64>,
        #[arg(long)]
        strategy: Option<i64>,
        /// daily or weekly
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Substring match over title and description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one habit with progress and recent check-ins
    Show { id: i64 },
    /// Edit habit fields
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        /// New description (empty string clears it)
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        target: Option<i64>,
        #[arg(long)]
        workspace: Option<i64>,
        #[arg(long, conflicts_with = "clear_strategy")]
        strategy: Option<i64>,
        /// Remove the strategy link
        #[arg(long)]
        clear_strategy: bool,
    },
    /// Flip a habit between active and inactive
    Toggle { id: i64 },
    /// Delete a habit
    Delete { id: i64 },
    /// Record one completion for today
    Checkin { id: i64 },
}

pub fn run(
    root: &Path,
    owner: Option<&str>,
    subcmd: HabitSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let owner = require_owner(owner)?;
    let (config, mut tracker) = open_tracker(root)?;

    match subcmd {
        HabitSubcommand::Create {
            workspace,
            strategy,
            description,
            frequency,
            target,
            title,
        } => {
            let input = NewHabit {
                title: title.join(" "),
                description,
                frequency: frequency.unwrap_or_else(|| config.defaults.frequency.to_string()),
                target_count: target.unwrap_or(config.defaults.target_count),
                workspace_id: workspace,
                strategy_id: strategy,
            };
            let habit = tracker
                .create_habit(owner, input)
                .context("failed to create habit")?;
            if json {
                print_json(&habit)?;
            } else {
                println!(
                    "Created habit [{}]: {} ({}, target {})",
                    habit.id, habit.title, habit.frequency, habit.target_count
                );
            }
        }

        HabitSubcommand::List {
            workspace,
            strategy,
            frequency,
            search,
        } => {
            let filter = HabitFilter {
                workspace_id: workspace,
                strategy_id: strategy,
                frequency,
                search,
            };
            let list = tracker.list_habits(owner, &filter)?;
            if json {
                return print_json(&list);
            }
            if list.is_empty() {
                println!("No habits.");
                return Ok(());
            }
            let rows = list
                .into_iter()
                .map(|p| {
                    vec![
                        p.habit.id.to_string(),
                        if p.habit.is_active { "active" } else { "paused" }.to_string(),
                        p.habit.frequency.to_string(),
                        progress_cell(p.period_count, p.habit.target_count, p.completed),
                        p.today_count.to_string(),
                        format!("{} .. {}", p.period_start, p.period_end),
                        p.habit.title,
                    ]
                })
                .collect();
            print_table(
                &["ID", "STATUS", "FREQ", "PERIOD", "TODAY", "WINDOW", "TITLE"],
                rows,
            );
        }

        HabitSubcommand::Show { id } => {
            let detail = tracker.get_habit(owner, id)?;
            if json {
                return print_json(&detail);
            }
            let p = &detail.progress;
            println!("Habit:       {}", p.habit.id);
            println!("Title:       {}", p.habit.title);
            if let Some(desc) = &p.habit.description {
                println!("Description: {}", desc);
            }
            println!("Frequency:   {}", p.habit.frequency);
            println!("Active:      {}", p.habit.is_active);
            println!("Workspace:   {}", p.habit.workspace_id);
            if let Some(s) = p.habit.strategy_id {
                println!("Strategy:    {}", s);
            }
            println!("Period:      {} .. {}", p.period_start, p.period_end);
            println!(
                "Progress:    {}",
                progress_cell(p.period_count, p.habit.target_count, p.completed)
            );
            println!("Today:       {}", p.today_count);
            if !detail.recent_checkins.is_empty() {
                println!();
                let rows = detail
                    .recent_checkins
                    .iter()
                    .map(|c| vec![c.occurred_on.to_string(), c.count.to_string()])
                    .collect();
                print_table(&["DAY", "COUNT"], rows);
            }
        }

        HabitSubcommand::Edit {
            id,
            title,
            description,
            frequency,
            target,
            workspace,
            strategy,
            clear_strategy,
        } => {
            let update = HabitUpdate {
                title,
                description: description.map(|d| Some(d).filter(|d| !d.trim().is_empty())),
                frequency,
                target_count: target,
                is_active: None,
                workspace_id: workspace,
                strategy_id: if clear_strategy {
                    Some(None)
                } else {
                    strategy.map(Some)
                },
            };
            let habit = tracker.edit_habit(owner, id, update)?;
            if json {
                print_json(&habit)?;
            } else {
                println!("Updated habit [{}]", habit.id);
            }
        }

        HabitSubcommand::Toggle { id } => {
            let habit = tracker.toggle_active(owner, id)?;
            if json {
                print_json(&habit)?;
            } else {
                let state = if habit.is_active { "active" } else { "paused" };
                println!("Habit [{}] is now {state}", habit.id);
            }
        }

        HabitSubcommand::Delete { id } => {
            tracker.delete_habit(owner, id)?;
            if json {
                print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
            } else {
                println!("Deleted habit [{id}]");
            }
        }

        HabitSubcommand::Checkin { id } => {
            let checkin = tracker.check_in(owner, id)?;
            if json {
                print_json(&checkin)?;
            } else {
                println!(
                    "Checked in habit [{id}] on {}: {} today",
                    checkin.occurred_on, checkin.count
                );
            }
        }
    }
    Ok(())
}
