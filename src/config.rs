use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable pointing at an explicit settings file.
pub const CONFIG_ENV: &str = "RUSTY_STATS_CONFIG";

/// Settings file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "rusty-stats.json";

// ---------------------------------------------------------------------------
// Application settings
// ---------------------------------------------------------------------------

/// User-tunable settings, read once at start-up.
///
/// Every field has a default, so a settings file only needs the keys it
/// wants to override:
///
/// ```json
/// { "window_size": [900, 600], "status_seconds": 3, "extra_na_values": ["-"] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial inner size of the main window.
    pub window_size: [f32; 2],
    /// How long the transient status-bar message stays visible.
    pub status_seconds: f32,
    /// Tokens treated as missing in addition to the built-in NA set.
    pub extra_na_values: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [1000.0, 700.0],
            status_seconds: 5.0,
            extra_na_values: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn status_duration(&self) -> Duration {
        Duration::from_secs_f32(self.status_seconds.max(0.0))
    }

    /// Parse settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolve the settings file and load it, falling back to defaults.
    ///
    /// A missing file is normal; an unreadable or malformed one is logged.
    pub fn load() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(cfg) => {
                log::info!("Loaded settings from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "status_seconds": 2.5, "extra_na_values": ["-", "?"] }}"#).unwrap();

        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.status_seconds, 2.5);
        assert_eq!(cfg.extra_na_values, vec!["-".to_string(), "?".to_string()]);
        assert_eq!(cfg.window_size, AppConfig::default().window_size);
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn negative_duration_is_clamped() {
        let cfg = AppConfig {
            status_seconds: -1.0,
            ..Default::default()
        };
        assert_eq!(cfg.status_duration(), Duration::ZERO);
    }
}
