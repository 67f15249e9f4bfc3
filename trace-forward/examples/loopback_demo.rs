//! Forward loopback trace events into env_logger
//!
//! Run with `RUST_LOG=debug` to also see the forwarder's own messages.

use std::ffi::c_int;
use trace_forward::native::tf_loopback_trace_log;
use trace_forward::{ForwarderConfig, LogObserver, LoopbackSource, TraceForwarder};

fn main() {
    init_logging();

    log::info!("trace-forward v{}", trace_forward::VERSION);

    let config = ForwarderConfig::new().with_source_name("loopback");
    let forwarder = TraceForwarder::new(LoopbackSource::new());
    forwarder.register_observer(LogObserver::new(&config));

    let source = forwarder.source();
    source.emit(3, "INIT: Initializing loopback source");
    unsafe {
        tf_loopback_trace_log(
            3,
            c"DISPLAY: Device initialized successfully (%dx%d)".as_ptr(),
            800 as c_int,
            600 as c_int,
        );
        tf_loopback_trace_log(4, c"FILEIO: [%s] Failed to open file".as_ptr(), c"bg.png".as_ptr());
        tf_loopback_trace_log(5, c"%1500d".as_ptr(), 1 as c_int);
    }
}

/// Initialize logging from RUST_LOG, defaulting to info
fn init_logging() {
    use env_logger::{Builder, Env};
    use std::io::Write;

    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
