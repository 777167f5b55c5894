pub mod config;
pub mod habit;
pub mod init;
pub mod strategy;
pub mod workspace;

use anyhow::Context;
use habit_core::config::Config;
use habit_core::Tracker;
use std::path::Path;

/// Owner identity is mandatory for every data command.
pub fn require_owner(owner: Option<&str>) -> anyhow::Result<&str> {
    owner
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .context("owner is required: pass --owner or set HABITS_OWNER")
}

/// Load config under `root` and open its database.
pub fn open_tracker(root: &Path) -> anyhow::Result<(Config, Tracker)> {
    let config = Config::load(root).context("failed to load config")?;
    let store = config
        .open_store(root)
        .with_context(|| format!("failed to open {}", config.database_path(root).display()))?;
    Ok((config, Tracker::new(store)))
}
