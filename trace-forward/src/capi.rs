//! C ABI for host languages
//!
//! A host (for example Python through `ctypes`) loads the `cdylib` and calls
//! [`trace_forward_register`] with a plain C callback. The first successful
//! call resolves the trace hook and creates a forwarder that lives for the
//! rest of the process; later calls only swap the callback.

use crate::config::DEFAULT_SYMBOL;
use crate::forwarder::TraceForwarder;
use crate::observer::{HostCallback, HostTraceCallback};
use crate::render::TRACE_BUFFER_CAPACITY;
use crate::sources::DynamicSource;
use crate::types::ForwardError;
use parking_lot::Mutex;
use std::ffi::{c_char, c_int, CStr};
use std::sync::Arc;

pub const TF_OK: c_int = 0;
pub const TF_ERR_LIBRARY: c_int = -1;
pub const TF_ERR_SYMBOL: c_int = -2;
pub const TF_ERR_NULL_CALLBACK: c_int = -3;
pub const TF_ERR_PATH: c_int = -4;

static HOST_FORWARDER: Mutex<Option<Arc<TraceForwarder<DynamicSource>>>> =
    parking_lot::const_mutex(None);

/// Register `callback` to receive formatted trace lines
///
/// `library` names the shared library exporting `SetTraceLogCallback`; NULL
/// searches the libraries already loaded into the process. It is only read
/// on the first successful call.
///
/// # Safety
///
/// `library` must be NULL or a valid NUL-terminated string, and `callback`
/// must remain callable for the rest of the process.
#[no_mangle]
pub unsafe extern "C" fn trace_forward_register(
    library: *const c_char,
    callback: Option<HostTraceCallback>,
) -> c_int {
    trace_forward_register_hook(library, std::ptr::null(), callback)
}

/// [`trace_forward_register`] for a library whose trace hook has another name
///
/// `symbol` NULL means `SetTraceLogCallback`. Like `library`, it is only read
/// on the first successful call.
///
/// # Safety
///
/// `library` and `symbol` must each be NULL or a valid NUL-terminated string,
/// and `callback` must remain callable for the rest of the process.
#[no_mangle]
pub unsafe extern "C" fn trace_forward_register_hook(
    library: *const c_char,
    symbol: *const c_char,
    callback: Option<HostTraceCallback>,
) -> c_int {
    let Some(callback) = callback else {
        log::warn!("trace_forward_register called with a NULL callback");
        return TF_ERR_NULL_CALLBACK;
    };

    let forwarder = {
        let mut host = HOST_FORWARDER.lock();
        match host.as_ref() {
            Some(existing) => Arc::clone(existing),
            None => match open_source(library, symbol) {
                Ok(source) => {
                    let created = Arc::new(TraceForwarder::new(source));
                    *host = Some(Arc::clone(&created));
                    created
                }
                Err(e) => {
                    log::error!("Failed to set up trace forwarding: {}", e);
                    return status_code(&e);
                }
            },
        }
    };

    forwarder.register_observer(HostCallback::new(callback));
    TF_OK
}

/// Capacity of the render buffer, terminator included
#[no_mangle]
pub extern "C" fn trace_forward_buffer_capacity() -> usize {
    TRACE_BUFFER_CAPACITY
}

unsafe fn open_source(
    library: *const c_char,
    symbol: *const c_char,
) -> Result<DynamicSource, ForwardError> {
    let symbol = if symbol.is_null() {
        DEFAULT_SYMBOL
    } else {
        CStr::from_ptr(symbol)
            .to_str()
            .map_err(|e| ForwardError::InvalidPath(format!("symbol name: {}", e)))?
    };
    if library.is_null() {
        return DynamicSource::this_process(symbol);
    }
    let path = CStr::from_ptr(library)
        .to_str()
        .map_err(|e| ForwardError::InvalidPath(e.to_string()))?;
    DynamicSource::open(path, symbol)
}

fn status_code(error: &ForwardError) -> c_int {
    match error {
        ForwardError::LibraryLoad { .. } => TF_ERR_LIBRARY,
        ForwardError::MissingSymbol { .. } => TF_ERR_SYMBOL,
        ForwardError::InvalidPath(_) | ForwardError::Config(_) => TF_ERR_PATH,
    }
}
