//! Runtime configuration from environment variables.
//!
//! | Variable                            | Default             |
//! |-------------------------------------|---------------------|
//! | `CARDIOPREDICT_LOG_MODE`            | `auto`              |
//! | `CARDIOPREDICT_LOG_FILE`            | `cardiopredict.log` |
//! | `CARDIOPREDICT_SANITIZE_MAX_BYTES`  | `16384`             |
//! | `CARDIOPREDICT_ANALYSIS_DELAY_MS`   | `1500`              |

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;
use crate::CardioPredictError;

pub const ENV_LOG_MODE: &str = "CARDIOPREDICT_LOG_MODE";
pub const ENV_LOG_FILE: &str = "CARDIOPREDICT_LOG_FILE";
pub const ENV_SANITIZE_MAX_BYTES: &str = "CARDIOPREDICT_SANITIZE_MAX_BYTES";
pub const ENV_ANALYSIS_DELAY_MS: &str = "CARDIOPREDICT_ANALYSIS_DELAY_MS";

const DEFAULT_LOG_FILE: &str = "cardiopredict.log";
const DEFAULT_ANALYSIS_DELAY_MS: u64 = 1500;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn uses_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

impl std::str::FromStr for LogMode {
    type Err = CardioPredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(CardioPredictError::Config(format!(
                "{ENV_LOG_MODE}: expected auto, file or stdout, got {other:?}"
            ))),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub sanitize_max_bytes: usize,
    /// Presentation-only pause before the TUI reveals a result
    pub analysis_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
            analysis_delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns `CardioPredictError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys keep their defaults.
    ///
    /// # Errors
    /// Returns `CardioPredictError::Config` if a value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(ENV_LOG_MODE) {
            config.log_mode = mode.parse()?;
        }
        if let Some(path) = lookup(ENV_LOG_FILE).filter(|p| !p.trim().is_empty()) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_SANITIZE_MAX_BYTES) {
            config.sanitize_max_bytes = parse_number::<usize>(ENV_SANITIZE_MAX_BYTES, &raw)?;
            if config.sanitize_max_bytes == 0 {
                return Err(CardioPredictError::Config(format!(
                    "{ENV_SANITIZE_MAX_BYTES}: must be greater than zero"
                )));
            }
        }
        if let Some(raw) = lookup(ENV_ANALYSIS_DELAY_MS) {
            config.analysis_delay =
                Duration::from_millis(parse_number::<u64>(ENV_ANALYSIS_DELAY_MS, &raw)?);
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> crate::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| CardioPredictError::Config(format!("{key}: invalid number {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("Should load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analysis_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_LOG_MODE, "Stdout"),
            (ENV_LOG_FILE, "/tmp/cp.log"),
            (ENV_SANITIZE_MAX_BYTES, "4096"),
            (ENV_ANALYSIS_DELAY_MS, "0"),
        ]))
        .expect("Should load");

        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/tmp/cp.log"));
        assert_eq!(config.sanitize_max_bytes, 4096);
        assert!(config.analysis_delay.is_zero());
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_lookup(lookup(&[(ENV_LOG_MODE, "syslog")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_ANALYSIS_DELAY_MS, "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_SANITIZE_MAX_BYTES, "0")])).is_err());
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.uses_file(true));
        assert!(!LogMode::Auto.uses_file(false));
        assert!(LogMode::File.uses_file(false));
        assert!(!LogMode::Stdout.uses_file(true));
    }
}
