use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{error::Error, types::Language};

/// Default quiet period before a changed buffer is executed
pub const DEFAULT_DEBOUNCE_MS: u64 = 1500;

/// Default scratch directory, relative to the working directory
pub const DEFAULT_SCRATCH_DIR: &str = "appstack_temp";

/// Runtime configuration shared by the session and the one-shot dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Directory holding staging descriptors, sources and the binary
    pub scratch_dir: PathBuf,
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Per-language toolchain overrides
    pub toolchains: HashMap<Language, ToolchainOverride>,
}

/// Replaces the interpreter or compiler executable of one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainOverride {
    pub program: Option<String>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            toolchains: HashMap::new(),
        }
    }
}

impl ExecConfig {
    /// Load a TOML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, Error> {
        let config: ExecConfig =
            toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;
        if config.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be greater than zero".to_string()));
        }
        Ok(config)
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_program(mut self, language: Language, program: impl Into<String>) -> Self {
        self.toolchains.insert(
            language,
            ToolchainOverride {
                program: Some(program.into()),
            },
        );
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub(crate) fn program_override(&self, language: Language) -> Option<&str> {
        self.toolchains
            .get(&language)
            .and_then(|o| o.program.as_deref())
    }
}
