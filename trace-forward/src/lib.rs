//! Trace Forward Library
//!
//! Forwards a native library's printf-style trace log into Rust: into the
//! `log` facade, a closure, or a C callback supplied by a host language.
//!
//! # Architecture
//!
//! - A small C shim (built by `build.rs`) is installed with the library's
//!   `SetTraceLogCallback`. It renders each `va_list` message into a
//!   1024-byte stack buffer and passes the bytes to Rust.
//! - [`TraceForwarder`] owns the observer slot and installs the shim with its
//!   [`TraceSource`] the first time an observer is registered.
//! - Messages longer than 1023 bytes are truncated silently.
//!
//! The library does NOT filter by level or buffer events: with no observer
//! registered, events are discarded.
//!
//! # Example Usage
//!
//! ```no_run
//! use trace_forward::{ForwarderConfig, LogObserver, TraceForwarder};
//!
//! let config = ForwarderConfig::new()
//!     .with_library("libraylib.so")
//!     .with_level_override(log::Level::Debug);
//!
//! let forwarder = TraceForwarder::from_config(&config).unwrap();
//! forwarder.register_observer(LogObserver::new(&config));
//! // Every trace line raylib emits now arrives as `[raylib:INFO] ...`
//! ```

// Public modules
pub mod capi;
pub mod config;
pub mod forwarder;
pub mod native;
pub mod observer;
pub mod render;
pub mod sources;
pub mod types;

// Re-export main types for convenience
pub use config::ForwarderConfig;
pub use forwarder::TraceForwarder;
pub use observer::{HostCallback, HostTraceCallback, LogObserver, Observer, ObserverSlot, TraceLog};
pub use render::{TraceBuffer, MAX_MESSAGE_LEN, TRACE_BUFFER_CAPACITY};
pub use sources::{Detached, DynamicSource, LoopbackSource, TraceSource};
pub use types::{ForwardError, Result, TraceLevel, TraceRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
