use crate::output::print_json;
use anyhow::Context;
use habit_core::{config::Config, paths, HabitError};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (config, created) = match Config::load(root) {
        Ok(cfg) => (cfg, false),
        Err(HabitError::NotInitialized) => {
            let cfg = Config::default();
            cfg.save(root).context("failed to write config")?;
            (cfg, true)
        }
        Err(e) => return Err(e).context("failed to read existing config"),
    };

    let db_path = config.database_path(root);
    config
        .open_store(root)
        .with_context(|| format!("failed to create database at {}", db_path.display()))?;
    tracing::info!(root = %root.display(), created, "initialized habits");

    if json {
        print_json(&serde_json::json!({
            "root": root,
            "config": paths::config_path(root),
            "database": db_path,
            "created": created,
        }))?;
    } else if created {
        println!("Initialized habits in {}", paths::habits_dir(root).display());
    } else {
        println!("Already initialized: {}", paths::config_path(root).display());
    }
    Ok(())
}
