//! Configuration types for netscore.
//!
//! [`Config::load`] layers, lowest to highest precedence: the embedded
//! defaults, `~/.config/netscore/config.toml` (if present), an explicit file
//! passed by the caller, and `NETSCORE_*` environment variables
//! (`NETSCORE_PIPELINE__WORKERS=8`). [`Config::defaults`] returns the
//! embedded defaults without touching the filesystem (useful in tests).

use crate::error::ConfigError;
use crate::types::HourBasis;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[scoring]
hour_basis = "local"

[pipeline]
workers          = 4
channel_capacity = 1024

[log]
level = "info"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// `[scoring]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// `local`, `utc`, or a fixed offset such as `+02:00`. Used both for the
    /// hour-of-day rule and for reading zone-less timestamps.
    #[serde(default = "default_hour_basis")]
    pub hour_basis: String,
}

fn default_hour_basis() -> String { "local".to_string() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hour_basis: default_hour_basis(),
        }
    }
}

impl ScoringConfig {
    pub fn hour_basis(&self) -> Result<HourBasis, ConfigError> {
        HourBasis::parse(&self.hour_basis).ok_or_else(|| ConfigError::HourBasis(self.hour_basis.clone()))
    }
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_workers() -> usize { 4 }
fn default_channel_capacity() -> usize { 1024 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// `[log]` section. `RUST_LOG` still wins when set.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String { "info".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. `explicit` is an extra file that must
    /// exist when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(config_path().as_path()).required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let cfg: Config = builder
            .add_source(
                config::Environment::with_prefix("NETSCORE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.check()?;
        Ok(cfg)
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.scoring.hour_basis()?;
        if self.pipeline.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("netscore")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.scoring.hour_basis, "local");
        assert_eq!(cfg.scoring.hour_basis().unwrap(), HourBasis::Local);
        assert_eq!(cfg.pipeline.workers, 4);
        assert_eq!(cfg.pipeline.channel_capacity, 1024);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn toml_overrides_layer_on_defaults() {
        let cfg = Config::from_toml("[scoring]\nhour_basis = \"utc\"\n").unwrap();
        assert_eq!(cfg.scoring.hour_basis().unwrap(), HourBasis::Utc);
        assert_eq!(cfg.pipeline.workers, 4);
    }

    #[test]
    fn bad_hour_basis_rejected() {
        let err = Config::from_toml("[scoring]\nhour_basis = \"mars\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::HourBasis(ref s) if s == "mars"));
    }

    #[test]
    fn zero_workers_rejected() {
        let err = Config::from_toml("[pipeline]\nworkers = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoWorkers));
    }
}
