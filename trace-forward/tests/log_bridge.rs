//! Forwarding into the `log` facade
//!
//! Installs a capturing logger, so this file is its own test binary.
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use trace_forward::{forward_trace, ForwarderConfig, LogObserver, TraceForwarder};

struct CaptureLogger;

static CAPTURED: Mutex<Vec<(Level, String, String)>> = parking_lot::const_mutex(Vec::new());
static SERIAL: Mutex<()> = parking_lot::const_mutex(());

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED
            .lock()
            .push((record.level(), record.target().to_string(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

fn captured_for(target: &str) -> Vec<(Level, String)> {
    CAPTURED
        .lock()
        .iter()
        .filter(|(_, t, _)| t == target)
        .map(|(level, _, message)| (*level, message.clone()))
        .collect()
}

fn install_logger() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
}

#[test]
fn test_levels_are_mapped() {
    let _guard = SERIAL.lock();
    install_logger();

    let config = ForwarderConfig::new().with_source_name("mapped");
    let forwarder = TraceForwarder::detached();
    forwarder.register_observer(LogObserver::new(&config));

    forward_trace!(forwarder, 3, "INIT: Initializing raylib {}", "5.0");
    forward_trace!(forwarder, 4, "FILEIO: [{}] Failed to open file", "bg.png");
    forward_trace!(forwarder, 42, "custom");

    assert_eq!(
        captured_for("mapped"),
        vec![
            (Level::Info, "[mapped:INFO] INIT: Initializing raylib 5.0".to_string()),
            (Level::Warn, "[mapped:WARNING] FILEIO: [bg.png] Failed to open file".to_string()),
            (Level::Info, "[mapped:42] custom".to_string()),
        ]
    );
}

#[test]
fn test_override_fixes_level() {
    let _guard = SERIAL.lock();
    install_logger();

    let config = ForwarderConfig::new()
        .with_source_name("fixed")
        .with_level_override(Level::Debug);
    let forwarder = TraceForwarder::detached();
    forwarder.register_observer(LogObserver::new(&config));

    forward_trace!(forwarder, 5, "GL: shader failed");

    assert_eq!(
        captured_for("fixed"),
        vec![(Level::Debug, "[fixed:ERROR] GL: shader failed".to_string())]
    );
}
