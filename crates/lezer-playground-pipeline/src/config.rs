//! Playground settings read from a TOML file.
//!
//! ```toml
//! debounce_ms = 500
//! share_base_url = "https://lezer-playground.vercel.app/"
//!
//! [compile]
//! exec_fuel = 1000000
//! recursion_limit = 4096
//!
//! [parse]
//! exec_fuel = 1000000
//! recursion_limit = 2048
//! ```
//!
//! Every key is optional. A fuel of `0` removes the compile-time limit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lezer_playground_compiler::grammar_file::{DEFAULT_EXEC_FUEL, DEFAULT_RECURSION_FUEL};
use lezer_playground_runtime::FuelLimits;
use serde::{Deserialize, Serialize};

use crate::lezer::LezerCompiler;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaygroundConfig {
    /// Quiet period after a grammar edit before recompiling.
    pub debounce_ms: u64,
    pub share_base_url: String,
    pub compile: CompileConfig,
    pub parse: ParseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    pub exec_fuel: u32,
    pub recursion_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    pub exec_fuel: u32,
    pub recursion_limit: u32,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            share_base_url: "https://lezer-playground.vercel.app/".to_string(),
            compile: CompileConfig::default(),
            parse: ParseConfig::default(),
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            exec_fuel: DEFAULT_EXEC_FUEL,
            recursion_limit: DEFAULT_RECURSION_FUEL,
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        let limits = FuelLimits::default();
        Self {
            exec_fuel: limits.get_exec_fuel(),
            recursion_limit: limits.get_recursion_limit(),
        }
    }
}

impl PlaygroundConfig {
    /// `Ok(None)` when the file does not exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn parse_limits(&self) -> FuelLimits {
        FuelLimits::new()
            .exec_fuel(self.parse.exec_fuel)
            .recursion_limit(self.parse.recursion_limit)
    }

    pub fn compiler(&self) -> LezerCompiler {
        LezerCompiler::new()
            .with_compile_fuel(
                limit(self.compile.exec_fuel),
                limit(self.compile.recursion_limit),
            )
            .with_parse_limits(self.parse_limits())
    }
}

fn limit(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}
