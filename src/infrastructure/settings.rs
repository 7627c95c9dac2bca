//! Layered settings: embedded defaults, user config file, explicit file,
//! then `STEPFORM__` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub messages: MessageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Step shown first. Kept as a raw identifier so a bad value surfaces as
    /// the schema load banner instead of a start-up failure.
    #[serde(default = "default_start_step")]
    pub start_step: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_start_step() -> String {
    "personal".to_string()
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            start_step: default_start_step(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSettings {
    #[serde(default = "default_ttl")]
    pub ttl_ms: u64,
}

fn default_ttl() -> u64 {
    3000
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self { ttl_ms: default_ttl() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_to_file")]
    pub to_file: bool,
    /// Overrides the platform data directory for log files.
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_to_file() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            to_file: default_to_file(),
            dir: None,
        }
    }
}

impl Settings {
    /// Loads settings from every layer. `config_path` is the `--config` flag.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_from(Self::user_config_path().as_deref(), config_path)
    }

    fn load_from(user_config: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default settings")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(user_config) = user_config.filter(|p| p.exists()) {
            builder = builder.add_source(config::File::from(user_config.to_path_buf()));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("STEPFORM")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// `<config_dir>/stepform/config.toml`, when the platform has one.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stepform").join("config.toml"))
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.messages.ttl_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    /// Directory log files are written to.
    pub fn logs_path(&self) -> PathBuf {
        match &self.logging.dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("stepform")
                .join("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ui.start_step, "personal");
        assert_eq!(settings.message_ttl(), Duration::from_secs(3));
        assert_eq!(settings.tick_rate(), Duration::from_millis(250));
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.to_file);
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.toml");

        let settings = Settings::load_from(Some(&missing), None).unwrap();
        assert_eq!(settings.messages.ttl_ms, 3000);
        assert_eq!(settings.ui.tick_rate_ms, 250);
    }

    #[test]
    fn test_explicit_file_overrides_user_file() {
        let temp_dir = TempDir::new().unwrap();
        let user = temp_dir.path().join("user.toml");
        let explicit = temp_dir.path().join("explicit.toml");
        fs::write(&user, "[ui]\nstart_step = \"address\"\ntick_rate_ms = 100\n").unwrap();
        fs::write(&explicit, "[ui]\nstart_step = \"payment\"\n\n[messages]\nttl_ms = 500\n")
            .unwrap();

        let settings = Settings::load_from(Some(&user), Some(&explicit)).unwrap();
        assert_eq!(settings.ui.start_step, "payment");
        assert_eq!(settings.ui.tick_rate_ms, 100);
        assert_eq!(settings.message_ttl(), Duration::from_millis(500));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(Settings::load_from(None, Some(&missing)).is_err());
    }

    #[test]
    fn test_logs_path_override() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.logging.dir = Some(temp_dir.path().to_string_lossy().to_string());
        assert_eq!(settings.logs_path(), temp_dir.path());
    }
}
