//! In-process trace source
//!
//! Mirrors raylib's `SetTraceLogCallback`/`TraceLog` pair inside the C shim so
//! the native forwarding path can run without the real library. Events emitted
//! while no callback is installed are dropped, as raylib drops them into its
//! default printer.

use crate::native::{self, TraceLogCallback};
use crate::observer::ObserverSlot;
use crate::sources::TraceSource;
use std::ffi::{c_int, CString};
use std::sync::Arc;

/// Handle to the loopback source in the C shim
///
/// The source's callback slot is process-wide; every handle refers to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackSource;

impl LoopbackSource {
    pub fn new() -> Self {
        Self
    }

    /// Install `callback` as the active trace callback (None removes it)
    pub fn set_trace_log_callback(&self, callback: Option<TraceLogCallback>) {
        unsafe { native::tf_loopback_set_trace_log_callback(callback) }
    }

    /// Raise one trace event carrying `message` verbatim
    ///
    /// The message goes through `%s`, so `%` in it is not interpreted.
    /// Interior NULs end the message.
    pub fn emit(&self, level: i32, message: &str) {
        let text = match CString::new(message) {
            Ok(text) => text,
            Err(e) => {
                let end = e.nul_position();
                let mut bytes = e.into_vec();
                bytes.truncate(end);
                // Cannot fail: the bytes end before the first NUL
                CString::new(bytes).unwrap_or_default()
            }
        };
        unsafe { native::tf_loopback_trace_log(level as c_int, c"%s".as_ptr(), text.as_ptr()) }
    }
}

impl TraceSource for LoopbackSource {
    fn attach(&self, slot: &Arc<ObserverSlot>) {
        let adapter = native::bind(slot);
        self.set_trace_log_callback(Some(adapter));
    }

    fn is_attached(&self, slot: &Arc<ObserverSlot>) -> bool {
        native::is_bound_to(slot)
    }
}
