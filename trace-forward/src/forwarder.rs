//! The trace forwarder
//!
//! Owns one observer slot and one trace source. Registering an observer stores
//! it in the slot and attaches the slot to the source: the first time, and
//! again whenever another forwarder has taken the source's hook over since.
//! From then on every event the source raises is rendered and handed to
//! whichever observer the slot holds.

use crate::config::ForwarderConfig;
use crate::observer::{Observer, ObserverSlot};
use crate::render::TraceBuffer;
use crate::sources::{Detached, DynamicSource, TraceSource};
use crate::types::Result;
use std::fmt;
use std::sync::{Arc, Once};

/// Bridges a trace source to a single registered observer
pub struct TraceForwarder<S: TraceSource = Detached> {
    slot: Arc<ObserverSlot>,
    source: S,
    registered: Once,
}

impl TraceForwarder<Detached> {
    /// Forwarder fed only through [`on_trace_event`](Self::on_trace_event)
    pub fn detached() -> Self {
        Self::new(Detached)
    }
}

impl TraceForwarder<DynamicSource> {
    /// Forwarder for the library and hook named in `config`
    pub fn from_config(config: &ForwarderConfig) -> Result<Self> {
        Ok(Self::new(DynamicSource::from_config(config)?))
    }
}

impl<S: TraceSource> TraceForwarder<S> {
    /// Create an unregistered forwarder for `source`
    ///
    /// Nothing is installed with the source until the first observer is
    /// registered.
    pub fn new(source: S) -> Self {
        Self {
            slot: Arc::new(ObserverSlot::new()),
            source,
            registered: Once::new(),
        }
    }

    /// Make `observer` the receiver of all subsequent trace events
    ///
    /// Replaces any previous observer. The first call installs the forwarder
    /// with its source; later calls reinstall it if another forwarder has
    /// taken the source's hook in the meantime.
    pub fn register_observer<O: Observer + 'static>(&self, observer: O) {
        self.register_shared(Arc::new(observer));
    }

    /// Like [`register_observer`](Self::register_observer) for an observer
    /// that is already shared
    pub fn register_shared(&self, observer: Arc<dyn Observer>) {
        self.slot.replace(observer);
        if self.is_registered() && !self.source.is_attached(&self.slot) {
            log::debug!("Reattaching trace forwarder to {:?}", self.source);
            self.source.attach(&self.slot);
        }
        self.ensure_registered();
    }

    /// Install the forwarder with its source if that has not happened yet
    pub fn ensure_registered(&self) {
        self.registered.call_once(|| {
            log::debug!("Registering trace forwarder with {:?}", self.source);
            self.source.attach(&self.slot);
        });
    }

    /// Whether the forwarder has been installed with its source
    pub fn is_registered(&self) -> bool {
        self.registered.is_completed()
    }

    /// Forward one event raised from Rust code
    ///
    /// Renders `args` into a fixed buffer, truncating silently past 1023
    /// bytes. Does nothing, not even rendering, while no observer is set.
    pub fn on_trace_event(&self, level: i32, args: fmt::Arguments<'_>) {
        let Some(observer) = self.slot.current() else {
            return;
        };
        let buffer = TraceBuffer::render(args);
        observer.on_trace(level, buffer.as_str());
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn slot(&self) -> &Arc<ObserverSlot> {
        &self.slot
    }
}

impl Default for TraceForwarder<Detached> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<S: TraceSource> fmt::Debug for TraceForwarder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceForwarder")
            .field("source", &self.source)
            .field("slot", &self.slot)
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Forward a formatted trace event through a [`TraceForwarder`]
///
/// ```
/// use trace_forward::{forward_trace, TraceForwarder, TraceLog};
///
/// let forwarder = TraceForwarder::detached();
/// let log = TraceLog::new();
/// forwarder.register_observer(log.clone());
///
/// forward_trace!(forwarder, 2, "hello {}", "world");
/// assert_eq!(log.messages(), vec![(2, "hello world".to_string())]);
/// ```
#[macro_export]
macro_rules! forward_trace {
    ($forwarder:expr, $level:expr, $($arg:tt)+) => {
        $forwarder.on_trace_event($level, ::std::format_args!($($arg)+))
    };
}
