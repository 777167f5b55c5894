use super::{open_tracker, require_owner};
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum WorkspaceSubcommand {
    /// Create a workspace
    Create {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// List your workspaces
    List,
}

pub fn run(
    root: &Path,
    owner: Option<&str>,
    subcmd: WorkspaceSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let owner = require_owner(owner)?;
    let (_, mut tracker) = open_tracker(root)?;

    match subcmd {
        WorkspaceSubcommand::Create { name } => {
            let ws = tracker.create_workspace(owner, &name.join(" "))?;
            if json {
                print_json(&ws)?;
            } else {
                println!("Created workspace [{}]: {}", ws.id, ws.name);
            }
        }
        WorkspaceSubcommand::List => {
            let list = tracker.list_workspaces(owner)?;
            if json {
                return print_json(&list);
            }
            if list.is_empty() {
                println!("No workspaces.");
                return Ok(());
            }
            let rows = list
                .into_iter()
                .map(|w| vec![w.id.to_string(), w.name])
                .collect();
            print_table(&["ID", "NAME"], rows);
        }
    }
    Ok(())
}
