// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Pipeline-level connector configuration via `pipelink.yaml`.
//!
//! ```yaml
//! defaults:
//!   input:
//!     capacity: 32
//!     on_full: block
//!   output:
//!     on_no_partners: drop
//! inputs:
//!   audio_in:
//!     capacity: 1
//!     on_full: error
//! outputs:
//!   metrics_out:
//!     on_no_partners: error
//! ```
//!
//! A named override replaces the defaults for that connector entirely; fields
//! it leaves out take the built-in defaults, not the `defaults:` section.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{InputConfig, OutputConfig};
use crate::core::{ConnectorError, Result};

/// Defaults applied to connectors without a named override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorDefaults {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Connector configuration from `pipelink.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorsConfig {
    #[serde(default)]
    pub defaults: ConnectorDefaults,

    /// Overrides keyed by input connector name.
    #[serde(default)]
    pub inputs: HashMap<String, InputConfig>,

    /// Overrides keyed by output connector name.
    #[serde(default)]
    pub outputs: HashMap<String, OutputConfig>,
}

impl ConnectorsConfig {
    /// Configuration file name.
    pub const FILE_NAME: &'static str = "pipelink.yaml";

    /// Load configuration from a directory. Returns error if the file is
    /// missing, cannot be parsed, or holds an invalid policy.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            ConnectorError::Configuration(format!(
                "Failed to read {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self::parse(&content).map_err(|msg| {
            ConnectorError::Configuration(format!("{}: {}", config_path.display(), msg))
        })?;

        tracing::info!("Loaded connector config from {}", config_path.display());
        Ok(config)
    }

    /// Load configuration from a directory, returning defaults if the file
    /// does not exist. A file that exists but is invalid is still an error.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        if dir.join(Self::FILE_NAME).exists() {
            Self::load(dir)
        } else {
            tracing::debug!(
                "No {} in {}, using connector defaults",
                Self::FILE_NAME,
                dir.display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content).map_err(ConnectorError::Configuration)
    }

    pub fn validate(&self) -> Result<()> {
        self.check().map_err(ConnectorError::Configuration)
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| format!("Failed to parse: {}", e))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if let Some(reason) = self.defaults.input.invalid_reason() {
            return Err(format!("defaults.input: {}", reason));
        }
        for (name, input) in &self.inputs {
            if let Some(reason) = input.invalid_reason() {
                return Err(format!("inputs.{}: {}", name, reason));
            }
        }
        Ok(())
    }

    /// Resolved configuration for the input connector called `name`.
    pub fn input_config(&self, name: &str) -> InputConfig {
        self.inputs
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.defaults.input.clone())
    }

    /// Resolved configuration for the output connector called `name`.
    pub fn output_config(&self, name: &str) -> OutputConfig {
        self.outputs
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.defaults.output.clone())
    }
}
