//! Forwarder configuration types
//!
//! The forwarder itself needs no settings; the configuration describes where
//! the external source lives and how forwarded lines appear in the `log` facade.

use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Symbol the external library exports for installing its trace callback
pub const DEFAULT_SYMBOL: &str = "SetTraceLogCallback";

/// Configuration for a trace forwarder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwarderConfig {
    /// Name of the external source, used as log target and line tag
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Optional: log every forwarded line at this level instead of mapping
    /// the trace level
    #[serde(default)]
    pub level_override: Option<log::Level>,

    /// Optional: shared library exporting the trace hook (None = current process)
    #[serde(default)]
    pub library: Option<PathBuf>,

    /// Name of the trace hook symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,
}

fn default_source_name() -> String {
    "raylib".to_string()
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            level_override: None,
            library: None,
            symbol: default_symbol(),
        }
    }
}

impl ForwarderConfig {
    /// Create a new forwarder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Builder method: set the source name
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// Builder method: log every line at a fixed level
    pub fn with_level_override(mut self, level: log::Level) -> Self {
        self.level_override = Some(level);
        self
    }

    /// Builder method: load the trace hook from this library
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    /// Builder method: set the trace hook symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}
