//! Optional TOML defaults for the command line
//!
//! Looked up from `--config PATH`, then `./logquery.toml`. A missing default
//! file means built-in defaults; a malformed file is an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use logquery_core::{ConcatOptions, Operator};

/// File consulted when no `--config` is given
const DEFAULT_CONFIG_FILE: &str = "logquery.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Operator used by `add` and `concat` when none is passed
    pub operator: Operator,

    /// Whether `concat` brackets fragments by default
    pub with_brackets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator: Operator::And,
            with_brackets: true,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path or the default file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Concatenation options, with command-line overrides applied
    pub fn concat_options(&self, operator: Option<Operator>, no_brackets: bool) -> ConcatOptions {
        ConcatOptions::default()
            .with_operator(operator.unwrap_or(self.operator))
            .with_brackets(self.with_brackets && !no_brackets)
    }
}
