//! External trace sources
//!
//! A trace source is whatever raises trace events: a native library reached
//! through its `SetTraceLogCallback` hook, or nothing at all when events come
//! only from Rust code. Each source knows how to route its events into a
//! forwarder's observer slot.

use crate::observer::ObserverSlot;
use std::fmt;
use std::sync::Arc;

pub mod dynamic;
pub mod loopback;

// Re-export source types
pub use dynamic::DynamicSource;
pub use loopback::LoopbackSource;

/// Common trait for all trace sources
pub trait TraceSource: fmt::Debug {
    /// Route the source's trace events into `slot`
    ///
    /// Native sources bind the C adapter to `slot` and install it with the
    /// source's trace hook. Must be safe to call again after another
    /// forwarder has taken the hook over.
    fn attach(&self, slot: &Arc<ObserverSlot>);

    /// Whether the source's events currently reach `slot`
    ///
    /// The native hook is process-wide, so a newer forwarder can take it over
    /// from an older one.
    fn is_attached(&self, _slot: &Arc<ObserverSlot>) -> bool {
        true
    }
}

/// Source with no external library behind it
///
/// Events reach the forwarder only through
/// [`TraceForwarder::on_trace_event`](crate::TraceForwarder::on_trace_event).
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl TraceSource for Detached {
    fn attach(&self, _slot: &Arc<ObserverSlot>) {}
}
