//! Observers and the slot that holds the active one
//!
//! An observer receives each forwarded `(level, message)` pair. The forwarder
//! keeps at most one observer at a time in an [`ObserverSlot`]; registering a
//! new one replaces the old one.

use crate::config::ForwarderConfig;
use crate::render::{decode_native, TraceBuffer, MAX_MESSAGE_LEN, TRACE_BUFFER_CAPACITY};
use crate::types::{TraceLevel, TraceRecord};
use parking_lot::{Mutex, RwLock};
use std::ffi::{c_char, c_int};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Receiver of forwarded trace events
pub trait Observer: Send + Sync {
    fn on_trace(&self, level: i32, message: &str);

    /// Receive a message rendered by the native adapter as raw bytes
    ///
    /// The default decodes to text: a character cut off by truncation is
    /// dropped and other invalid UTF-8 is replaced.
    fn on_trace_bytes(&self, level: i32, message: &[u8]) {
        self.on_trace(level, &decode_native(message));
    }
}

impl<F> Observer for F
where
    F: Fn(i32, &str) + Send + Sync,
{
    fn on_trace(&self, level: i32, message: &str) {
        self(level, message)
    }
}

/// Holds the currently registered observer, if any
#[derive(Default)]
pub struct ObserverSlot {
    observer: RwLock<Option<Arc<dyn Observer>>>,
}

impl ObserverSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `observer`, returning the one it replaced
    pub fn replace(&self, observer: Arc<dyn Observer>) -> Option<Arc<dyn Observer>> {
        self.observer.write().replace(observer)
    }

    /// The active observer
    ///
    /// The lock is released before the caller uses the observer, so an
    /// observer may itself register a replacement.
    pub fn current(&self) -> Option<Arc<dyn Observer>> {
        self.observer.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.observer.read().is_some()
    }

    /// Hand one event to the active observer; no-op when unset
    pub fn dispatch(&self, level: i32, message: &str) {
        if let Some(observer) = self.current() {
            observer.on_trace(level, message);
        }
    }

    /// Hand one natively rendered event to the active observer
    pub fn dispatch_bytes(&self, level: i32, message: &[u8]) {
        if let Some(observer) = self.current() {
            observer.on_trace_bytes(level, message);
        }
    }
}

impl fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}

/// Shared in-memory recorder of forwarded events
///
/// Clones share the same record list, so one clone can be registered while
/// another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    records: Arc<Mutex<Vec<TraceRecord>>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records received so far
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    /// `(level, message)` pairs in arrival order
    pub fn messages(&self) -> Vec<(i32, String)> {
        self.records
            .lock()
            .iter()
            .map(|record| (record.level, record.message.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Observer for TraceLog {
    fn on_trace(&self, level: i32, message: &str) {
        self.records.lock().push(TraceRecord::new(level, message));
    }
}

/// Forwards trace events into the `log` facade
///
/// Lines are emitted under the source name as target and read
/// `[raylib:INFO] message`.
#[derive(Debug, Clone)]
pub struct LogObserver {
    target: String,
    level_override: Option<log::Level>,
}

impl LogObserver {
    pub fn new(config: &ForwarderConfig) -> Self {
        Self {
            target: config.source_name.clone(),
            level_override: config.level_override,
        }
    }

    /// Level the line for `level` is logged at
    pub fn log_level(&self, level: i32) -> log::Level {
        if let Some(fixed) = self.level_override {
            return fixed;
        }
        TraceLevel::from_raw(level)
            .map(TraceLevel::to_log_level)
            .unwrap_or(log::Level::Info)
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(&ForwarderConfig::default())
    }
}

impl Observer for LogObserver {
    fn on_trace(&self, level: i32, message: &str) {
        let log_level = self.log_level(level);
        let target = self.target.as_str();
        if !log::log_enabled!(target: target, log_level) {
            return;
        }
        match TraceLevel::from_raw(level) {
            Some(known) => log::log!(target: target, log_level, "[{}:{}] {}", target, known, message),
            None => log::log!(target: target, log_level, "[{}:{}] {}", target, level, message),
        }
    }
}

/// C callback supplied by a host language
pub type HostTraceCallback = unsafe extern "C" fn(level: c_int, message: *const c_char);

/// Observer that calls a host-supplied C function
///
/// The message is copied into a NUL-terminated stack buffer for the duration
/// of the call only; the host must copy it if it keeps it. Natively rendered
/// messages reach the host byte for byte, exactly as `vsnprintf` wrote them.
#[derive(Debug, Clone, Copy)]
pub struct HostCallback {
    callback: HostTraceCallback,
}

impl HostCallback {
    /// # Safety
    ///
    /// `callback` must stay callable for as long as it is registered, which
    /// in practice means the rest of the process.
    pub unsafe fn new(callback: HostTraceCallback) -> Self {
        Self { callback }
    }
}

impl Observer for HostCallback {
    fn on_trace(&self, level: i32, message: &str) {
        let mut buffer = TraceBuffer::new();
        let _ = buffer.write_str(message);
        if message.contains('\0') {
            log::warn!("Trace message contains an interior NUL; host receives it cut short");
        }
        let text = buffer.as_c_str();
        // Validity of the function pointer is guaranteed by `HostCallback::new`
        unsafe { (self.callback)(level as c_int, text.as_ptr()) }
    }

    fn on_trace_bytes(&self, level: i32, message: &[u8]) {
        let mut buffer = [0u8; TRACE_BUFFER_CAPACITY];
        let len = message.len().min(MAX_MESSAGE_LEN);
        buffer[..len].copy_from_slice(&message[..len]);
        unsafe { (self.callback)(level as c_int, buffer.as_ptr().cast::<c_char>()) }
    }
}
