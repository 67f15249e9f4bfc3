//! FFI bindings to the C trace shim
//!
//! The shim renders `va_list` messages (stable Rust cannot read a `va_list`)
//! and hands the raw bytes to [`deliver`], which passes them on undecoded.
//! Which slot receives them is decided here: the external source has a single
//! process-wide callback, so the binding from the native adapter to a
//! forwarder's slot is process-wide too.

use crate::observer::ObserverSlot;
use parking_lot::RwLock;
use std::ffi::{c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Platform `va_list` as seen from Rust
///
/// Opaque: Rust only ever passes the adapter's address to a trace source, and
/// the C side is the only code that consumes the argument list.
pub type VaListHandle = *mut c_void;

/// Signature of the callback taken by `SetTraceLogCallback`
pub type TraceLogCallback = unsafe extern "C" fn(level: c_int, text: *const c_char, args: VaListHandle);

/// Signature of `SetTraceLogCallback` itself
pub type SetTraceLogCallbackFn = unsafe extern "C" fn(callback: Option<TraceLogCallback>);

type SinkCallback = unsafe extern "C" fn(level: c_int, message: *const c_char, len: usize);

#[link(name = "trace_shim", kind = "static")]
extern "C" {
    fn tf_bind_sink(sink: Option<SinkCallback>);
    fn tf_forward_trace(level: c_int, text: *const c_char, args: VaListHandle);
    pub fn tf_trace_buffer_size() -> usize;
    pub fn tf_loopback_set_trace_log_callback(callback: Option<TraceLogCallback>);
    /// printf-style entry point of the loopback source
    pub fn tf_loopback_trace_log(level: c_int, text: *const c_char, ...);
}

static BOUND_SLOT: RwLock<Option<Arc<ObserverSlot>>> = parking_lot::const_rwlock(None);

/// Route native trace events to `slot` and return the adapter to install
///
/// The previous binding, if any, is replaced. The slot stays bound for the
/// rest of the process.
pub fn bind(slot: &Arc<ObserverSlot>) -> TraceLogCallback {
    *BOUND_SLOT.write() = Some(Arc::clone(slot));
    unsafe { tf_bind_sink(Some(deliver)) };
    forward_trace_adapter()
}

/// The C adapter that renders and forwards one trace event
pub fn forward_trace_adapter() -> TraceLogCallback {
    tf_forward_trace
}

/// Whether `slot` is the one native events currently reach
pub fn is_bound_to(slot: &Arc<ObserverSlot>) -> bool {
    BOUND_SLOT
        .read()
        .as_ref()
        .is_some_and(|bound| Arc::ptr_eq(bound, slot))
}

unsafe extern "C" fn deliver(level: c_int, message: *const c_char, len: usize) {
    let Some(slot) = BOUND_SLOT.read().clone() else {
        return;
    };

    let bytes = if message.is_null() {
        &[][..]
    } else {
        std::slice::from_raw_parts(message.cast::<u8>(), len)
    };

    // Unwinding into C is undefined; contain observer panics here
    let result = panic::catch_unwind(AssertUnwindSafe(|| slot.dispatch_bytes(level, bytes)));
    if result.is_err() {
        log::error!("Trace observer panicked while handling a level {} event", level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_matches() {
        let size = unsafe { tf_trace_buffer_size() };
        assert_eq!(size, crate::render::TRACE_BUFFER_CAPACITY);
    }
}
