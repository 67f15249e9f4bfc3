//! Core types for the trace forwarder
//!
//! Trace levels follow raylib's `TraceLogLevel` numbering. Observers receive the
//! raw integer so that levels outside the known range are still forwarded
//! unchanged; `TraceLevel` is the typed view of the known values.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Result type for forwarder operations
pub type Result<T> = std::result::Result<T, ForwardError>;

/// Severity of a trace event as numbered by the external source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum TraceLevel {
    /// Show every message (threshold only, never attached to an event)
    All = 0,
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warning = 4,
    Error = 5,
    Fatal = 6,
    /// Show no messages (threshold only)
    None = 7,
}

impl TraceLevel {
    /// Convert a raw level received over FFI
    pub fn from_raw(level: i32) -> Option<Self> {
        match level {
            0 => Some(TraceLevel::All),
            1 => Some(TraceLevel::Trace),
            2 => Some(TraceLevel::Debug),
            3 => Some(TraceLevel::Info),
            4 => Some(TraceLevel::Warning),
            5 => Some(TraceLevel::Error),
            6 => Some(TraceLevel::Fatal),
            7 => Some(TraceLevel::None),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Upper-case name used when tagging forwarded lines
    pub fn name(self) -> &'static str {
        match self {
            TraceLevel::All => "ALL",
            TraceLevel::Trace => "TRACE",
            TraceLevel::Debug => "DEBUG",
            TraceLevel::Info => "INFO",
            TraceLevel::Warning => "WARNING",
            TraceLevel::Error => "ERROR",
            TraceLevel::Fatal => "FATAL",
            TraceLevel::None => "NONE",
        }
    }

    /// Closest `log` crate level
    ///
    /// `Fatal` has no counterpart and collapses into `Error`. The threshold
    /// values `All` and `None` map to the extremes.
    pub fn to_log_level(self) -> log::Level {
        match self {
            TraceLevel::All | TraceLevel::Trace => log::Level::Trace,
            TraceLevel::Debug => log::Level::Debug,
            TraceLevel::Info => log::Level::Info,
            TraceLevel::Warning => log::Level::Warn,
            TraceLevel::Error | TraceLevel::Fatal | TraceLevel::None => log::Level::Error,
        }
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single forwarded trace event
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    /// Raw level as received from the source
    pub level: i32,
    /// Rendered message, already truncated to the buffer capacity
    pub message: String,
    /// When the observer received the event
    pub received_at: DateTime<Utc>,
}

impl TraceRecord {
    pub fn new(level: i32, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            received_at: Utc::now(),
        }
    }

    /// Typed level, if the raw value is one the source defines
    pub fn trace_level(&self) -> Option<TraceLevel> {
        TraceLevel::from_raw(self.level)
    }
}

/// Errors raised while setting up a trace source
///
/// Forwarding itself never fails; these only come from loading libraries and
/// reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Failed to load library {path:?}: {source}")]
    LibraryLoad {
        path: Option<PathBuf>,
        #[source]
        source: libloading::Error,
    },

    #[error("Symbol not found: {symbol}")]
    MissingSymbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid library path: {0}")]
    InvalidPath(String),
}
