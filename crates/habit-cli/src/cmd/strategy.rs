use super::{open_tracker, require_owner};
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum StrategySubcommand {
    /// Create a strategy in a workspace
    Create {
        #[arg(long)]
        workspace: i64,
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// List strategies, optionally for one workspace
    List {
        #[arg(long)]
        workspace: Option<i64>,
    },
}

pub fn run(
    root: &Path,
    owner: Option<&str>,
    subcmd: StrategySubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let owner = require_owner(owner)?;
    let (_, mut tracker) = open_tracker(root)?;

    match subcmd {
        StrategySubcommand::Create { workspace, title } => {
            let s = tracker.create_strategy(owner, workspace, &title.join(" "))?;
            if json {
                print_json(&s)?;
            } else {
                println!("Created strategy [{}] in workspace {}: {}", s.id, s.workspace_id, s.title);
            }
        }
        StrategySubcommand::List { workspace } => {
            let list = tracker.list_strategies(owner, workspace)?;
            if json {
                return print_json(&list);
            }
            if list.is_empty() {
                println!("No strategies.");
                return Ok(());
            }
            let rows = list
                .into_iter()
                .map(|s| vec![s.id.to_string(), s.workspace_id.to_string(), s.title])
                .collect();
            print_table(&["ID", "WORKSPACE", "TITLE"], rows);
        }
    }
    Ok(())
}
