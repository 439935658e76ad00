//! User configuration at ~/.config/calgrid/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};
use crate::persist::SaveTimings;

static DEFAULT_DATA_DIR: &str = "~/.local/share/calgrid";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_saved_reset_ms() -> u64 {
    2000
}

fn default_error_reset_ms() -> u64 {
    3000
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalGridConfig {
    /// Directory holding the event storage file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_debounce_ms")]
    pub save_debounce_ms: u64,

    #[serde(default = "default_saved_reset_ms")]
    pub saved_reset_ms: u64,

    #[serde(default = "default_error_reset_ms")]
    pub error_reset_ms: u64,

    /// Default tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CalGridConfig {
    fn default() -> Self {
        CalGridConfig {
            data_dir: default_data_dir(),
            save_debounce_ms: default_debounce_ms(),
            saved_reset_ms: default_saved_reset_ms(),
            error_reset_ms: default_error_reset_ms(),
            log_level: default_log_level(),
        }
    }
}

impl CalGridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, writing a commented default file on first run.
    pub fn load() -> CalGridResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned())
    }

    pub fn save_timings(&self) -> SaveTimings {
        SaveTimings {
            debounce: Duration::from_millis(self.save_debounce_ms),
            saved_reset: Duration::from_millis(self.saved_reset_ms),
            error_reset: Duration::from_millis(self.error_reset_ms),
        }
    }

    pub fn to_toml(&self) -> CalGridResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = format!(
            "\
# calgrid configuration

# Where events are stored:
# data_dir = \"{}\"

# Milliseconds to wait for more edits before writing:
# save_debounce_ms = {}

# How long the saved / failed indicators stay visible:
# saved_reset_ms = {}
# error_reset_ms = {}

# Log filter used when RUST_LOG is unset:
# log_level = \"{}\"
",
            DEFAULT_DATA_DIR,
            default_debounce_ms(),
            default_saved_reset_ms(),
            default_error_reset_ms(),
            default_log_level(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_default_file_parses_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("calgrid/config.toml");

        CalGridConfig::create_default_config(&path).unwrap();
        let config = CalGridConfig::load_from(&path).unwrap();

        assert_eq!(config, CalGridConfig::default());
        assert_eq!(config.save_timings(), SaveTimings::default());
    }

    #[test]
    fn overrides_are_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/tmp/cal\"\nsave_debounce_ms = 50\n").unwrap();

        let config = CalGridConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/cal"));
        assert_eq!(config.save_timings().debounce, Duration::from_millis(50));
        assert_eq!(config.saved_reset_ms, 2000);
    }

    #[test]
    fn serializes_back_to_toml() {
        let toml = CalGridConfig::default().to_toml().unwrap();
        assert!(toml.contains("save_debounce_ms = 300"));
    }
}
