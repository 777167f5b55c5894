use crate::error::{HabitError, Result};
use crate::paths;
use crate::store::Store;
use crate::types::Frequency;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DATABASE)
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// HabitDefaults
// ---------------------------------------------------------------------------

/// Values the CLI fills in when `habit create` omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitDefaults {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_target_count")]
    pub target_count: i64,
}

fn default_target_count() -> i64 {
    1
}

impl Default for HabitDefaults {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            target_count: default_target_count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub defaults: HabitDefaults,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: DatabaseConfig::default(),
            defaults: HabitDefaults::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(HabitError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn database_path(&self, root: &Path) -> PathBuf {
        paths::database_path(root, &self.database.path)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }

    /// Open (creating if needed) the configured database.
    pub fn open_store(&self, root: &Path) -> Result<Store> {
        Store::open(&self.database_path(root), self.busy_timeout())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        if self.database.path.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "database.path is empty".to_string(),
            });
        }

        // Zero means concurrent check-ins fail immediately instead of waiting.
        if self.database.busy_timeout_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "database.busy_timeout_ms is 0; concurrent writers will get SQLITE_BUSY"
                    .to_string(),
            });
        }

        if self.defaults.target_count < 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "defaults.target_count={} will be raised to 1",
                    self.defaults.target_count
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.database.path, PathBuf::from(".habits/habits.db"));
        assert_eq!(parsed.defaults.frequency, Frequency::Daily);
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(cfg.database.busy_timeout_ms, 5000);
        assert_eq!(cfg.defaults.target_count, 1);
    }

    #[test]
    fn defaults_section_parses_weekly() {
        let yaml = "defaults:\n  frequency: Weekly\n  target_count: 3\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.defaults.frequency, Frequency::Weekly);
        assert_eq!(cfg.defaults.target_count, 3);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(HabitError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.database.busy_timeout_ms = 250;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.database.busy_timeout_ms, 250);
        assert_eq!(loaded.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn open_store_creates_database_file() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::default();
        cfg.open_store(dir.path()).unwrap();
        assert!(dir.path().join(".habits/habits.db").exists());
    }

    #[test]
    fn validate_default_has_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_zero_timeout_and_target() {
        let mut cfg = Config::default();
        cfg.database.busy_timeout_ms = 0;
        cfg.defaults.target_count = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("busy_timeout_ms")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("defaults.target_count=0")));
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
    }

    #[test]
    fn validate_unknown_version_is_error() {
        let mut cfg = Config::default();
        cfg.version = 7;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("version 7")));
    }
}
