//! Trace source resolved from a shared library at runtime
//!
//! Loads the library's `SetTraceLogCallback` (or a configured equivalent)
//! through libloading. With no path, the symbol is looked up among the
//! libraries already loaded into the process, which is how a host language
//! that loaded raylib globally shares it with the forwarder.

use crate::config::ForwarderConfig;
use crate::native::{self, SetTraceLogCallbackFn, TraceLogCallback};
use crate::observer::ObserverSlot;
use crate::sources::TraceSource;
use crate::types::{ForwardError, Result};
use libloading::Library;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trace hook loaded from a shared library
pub struct DynamicSource {
    // Keeps the hook's code mapped
    _library: Library,
    set_callback: SetTraceLogCallbackFn,
    path: Option<PathBuf>,
    symbol: String,
}

impl DynamicSource {
    /// Load `symbol` from the library at `path`
    pub fn open(path: impl AsRef<Path>, symbol: &str) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading trace hook {} from {:?}", symbol, path);

        // Loading runs the library's initialisers; that is the caller's call
        let library = unsafe { Library::new(path) }.map_err(|source| ForwardError::LibraryLoad {
            path: Some(path.to_path_buf()),
            source,
        })?;

        Self::resolve(library, Some(path.to_path_buf()), symbol)
    }

    /// Look `symbol` up in the running process
    pub fn this_process(symbol: &str) -> Result<Self> {
        log::info!("Loading trace hook {} from the current process", symbol);

        #[cfg(unix)]
        let library: Library = libloading::os::unix::Library::this().into();
        #[cfg(windows)]
        let library: Library = libloading::os::windows::Library::this()
            .map_err(|source| ForwardError::LibraryLoad { path: None, source })?
            .into();

        Self::resolve(library, None, symbol)
    }

    /// Load the source described by `config`
    pub fn from_config(config: &ForwarderConfig) -> Result<Self> {
        match &config.library {
            Some(path) => Self::open(path, &config.symbol),
            None => Self::this_process(&config.symbol),
        }
    }

    fn resolve(library: Library, path: Option<PathBuf>, symbol: &str) -> Result<Self> {
        let set_callback = unsafe {
            let hook = library
                .get::<SetTraceLogCallbackFn>(symbol.as_bytes())
                .map_err(|source| ForwardError::MissingSymbol {
                    symbol: symbol.to_string(),
                    source,
                })?;
            *hook
        };

        Ok(Self {
            _library: library,
            set_callback,
            path,
            symbol: symbol.to_string(),
        })
    }

    /// Install `callback` through the library's hook
    pub fn set_trace_log_callback(&self, callback: Option<TraceLogCallback>) {
        // The symbol was resolved with the hook's C signature
        unsafe { (self.set_callback)(callback) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl TraceSource for DynamicSource {
    fn attach(&self, slot: &Arc<ObserverSlot>) {
        let adapter = native::bind(slot);
        self.set_trace_log_callback(Some(adapter));
    }

    fn is_attached(&self, slot: &Arc<ObserverSlot>) -> bool {
        native::is_bound_to(slot)
    }
}

impl fmt::Debug for DynamicSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicSource")
            .field("path", &self.path)
            .field("symbol", &self.symbol)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_not_found() {
        let result = DynamicSource::open("libdoes-not-exist-trace.so", "SetTraceLogCallback");
        assert!(matches!(result, Err(ForwardError::LibraryLoad { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_symbol() {
        let result = DynamicSource::this_process("TraceForwardNoSuchHook");
        match result {
            Err(ForwardError::MissingSymbol { symbol, .. }) => {
                assert_eq!(symbol, "TraceForwardNoSuchHook")
            }
            other => panic!("expected MissingSymbol, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_from_config_uses_symbol() {
        let config = ForwarderConfig::new().with_symbol("TraceForwardNoSuchHook");
        assert!(matches!(
            DynamicSource::from_config(&config),
            Err(ForwardError::MissingSymbol { .. })
        ));
    }
}
