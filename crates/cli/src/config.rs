//! CLI configuration
//!
//! Layered: built-in defaults, then the optional config file at
//! `~/.config/azure-advisor/config.json`, then `ADVISOR_`-prefixed
//! environment variables, then command-line flags.

use std::path::PathBuf;

use advisor_lib::config::{DEFAULT_CONCURRENCY, DEFAULT_WINDOW_HOURS};
use advisor_lib::{AdvisorConfig, AdvisorError};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loadable from file and environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Maximum concurrent backend queries.
    pub concurrency: Option<usize>,
    /// Trailing metric window in hours.
    pub window_hours: Option<i64>,
}

impl CliConfig {
    /// Load from the optional config file and ADVISOR_ environment
    /// variables.
    pub fn load() -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = Self::config_path() {
            if path.exists() {
                builder = builder.add_source(::config::File::from(path));
            }
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix("ADVISOR").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir()
            .map(|home| home.join(".config").join("azure-advisor").join("config.json"))
    }

    /// Resolve the pipeline config: flags override file/env values, which
    /// override the built-in defaults.
    pub fn advisor_config(&self, cli: &crate::Cli) -> Result<AdvisorConfig> {
        let concurrency = cli
            .concurrency
            .or(self.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(AdvisorError::Configuration(
                "concurrency must be positive".to_string(),
            )
            .into());
        }

        let window_hours = cli
            .window_hours
            .or(self.window_hours)
            .unwrap_or(DEFAULT_WINDOW_HOURS);
        if window_hours <= 0 {
            return Err(AdvisorError::Configuration(
                "window-hours must be positive".to_string(),
            )
            .into());
        }

        Ok(AdvisorConfig {
            subscription_id: cli.subscription_id.clone(),
            concurrency,
            window_hours,
        })
    }
}
