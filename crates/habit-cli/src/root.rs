use std::path::{Path, PathBuf};

/// Resolve the habits root directory.
///
/// Priority:
/// 1. `--root` flag / `HABITS_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `start` looking for `.habits/`
/// 3. Fall back to `start`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(explicit, &cwd)
}

fn resolve_from(explicit: Option<&Path>, start: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    start
        .ancestors()
        .find(|dir| dir.join(habit_core::paths::HABITS_DIR).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}
