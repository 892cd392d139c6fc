//! Configuration for Cadence
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`cadence.toml` in the working directory, or an explicit path)
//! 3. Environment variables `CADENCE_<SECTION>__<KEY>`, e.g. `CADENCE_ENGINE__MAX_DEPTH`
//! 4. Overrides set on the builder
//!
//! A `.env` file is loaded into the environment first, if present.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::DEFAULT_MAX_DEPTH;
use crate::message::MAX_BYTES_PER_MESSAGE;

/// Default bound on driver passes for one run
pub const DEFAULT_MAX_PASSES: u64 = 10_000;

const DEFAULT_CONFIG_NAME: &str = "cadence";
const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub driver: DriverConfig,
    pub message: MessageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of frames on the call chain
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Passes after which a run that never finishes is abandoned
    pub max_passes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Payload capacity in bytes
    pub max_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_BYTES_PER_MESSAGE,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Render as TOML, as it would appear in `cadence.toml`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }

    fn validate(&self) -> Result<()> {
        if self.engine.max_depth == 0 {
            return Err(anyhow!("engine.max_depth must be at least 1"));
        }
        if self.driver.max_passes == 0 {
            return Err(anyhow!("driver.max_passes must be at least 1"));
        }
        if self.message.max_bytes < 4 {
            return Err(anyhow!(
                "message.max_bytes must fit at least one field (4 bytes), got {}",
                self.message.max_bytes
            ));
        }
        Ok(())
    }
}

/// Builder for loading a Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    skip_env: bool,
    max_depth: Option<usize>,
    max_passes: Option<u64>,
    max_bytes: Option<usize>,
}

impl ConfigBuilder {
    /// Config file path (overrides the default search; the file must exist)
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Ignore `.env` and `CADENCE_*` variables
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_passes(mut self, max_passes: Option<u64>) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn max_bytes(mut self, max_bytes: Option<usize>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn build(self) -> Result<Config> {
        if !self.skip_env {
            // A missing .env is normal
            let _ = dotenvy::dotenv();
        }

        let defaults = Config::default();
        let mut builder = config::Config::builder()
            .set_default("engine.max_depth", defaults.engine.max_depth as i64)?
            .set_default("driver.max_passes", defaults.driver.max_passes as i64)?
            .set_default("message.max_bytes", defaults.message.max_bytes as i64)?;

        builder = match &self.config_path {
            Some(path) => builder.add_source(config::File::from(path.clone()).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        if !self.skip_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        if let Some(max_depth) = self.max_depth {
            builder = builder.set_override("engine.max_depth", max_depth as i64)?;
        }
        if let Some(max_passes) = self.max_passes {
            builder = builder.set_override("driver.max_passes", max_passes as i64)?;
        }
        if let Some(max_bytes) = self.max_bytes {
            builder = builder.set_override("message.max_bytes", max_bytes as i64)?;
        }

        let config: Config = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }
}
