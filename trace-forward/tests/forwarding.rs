//! Forwarding through the Rust entry point
use trace_forward::{forward_trace, TraceForwarder, TraceLog, MAX_MESSAGE_LEN};

#[test]
fn test_no_observer_means_no_delivery() {
    let forwarder = TraceForwarder::detached();
    let log = TraceLog::new();

    for level in 0..8 {
        forward_trace!(forwarder, level, "event {} with {}", level, "args");
    }

    // Registering afterwards does not replay anything
    forwarder.register_observer(log.clone());
    assert!(log.is_empty());
}

#[test]
fn test_hello_world_is_forwarded() {
    let forwarder = TraceForwarder::detached();
    let log = TraceLog::new();
    forwarder.register_observer(log.clone());

    forward_trace!(forwarder, 2, "hello {}", "world");

    assert_eq!(log.messages(), vec![(2, "hello world".to_string())]);
}

#[test]
fn test_every_level_is_forwarded_unchanged() {
    let forwarder = TraceForwarder::detached();
    let log = TraceLog::new();
    forwarder.register_observer(log.clone());

    for level in [-1, 0, 1, 3, 6, 7, 100] {
        forward_trace!(forwarder, level, "level {level}");
    }

    let levels: Vec<i32> = log.records().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![-1, 0, 1, 3, 6, 7, 100]);
    assert_eq!(log.records()[6].message, "level 100");
}

#[test]
fn test_oversized_message_is_truncated() {
    let forwarder = TraceForwarder::detached();
    let log = TraceLog::new();
    forwarder.register_observer(log.clone());

    let long = "0123456789".repeat(200);
    forward_trace!(forwarder, 4, "{long}");

    let records = log.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message.len(), MAX_MESSAGE_LEN);
    assert!(long.starts_with(&records[0].message));
}

#[test]
fn test_message_one_below_capacity_is_intact() {
    let forwarder = TraceForwarder::detached();
    let log = TraceLog::new();
    forwarder.register_observer(log.clone());

    let text = "y".repeat(MAX_MESSAGE_LEN - 1);
    forward_trace!(forwarder, 3, "{text}!");

    assert_eq!(log.records()[0].message, format!("{text}!"));
}

#[test]
fn test_later_observer_replaces_earlier() {
    let forwarder = TraceForwarder::detached();
    let first = TraceLog::new();
    let second = TraceLog::new();

    forwarder.register_observer(first.clone());
    forward_trace!(forwarder, 3, "to first");
    forwarder.register_observer(second.clone());
    forward_trace!(forwarder, 3, "to second");
    forward_trace!(forwarder, 5, "also to second");

    assert_eq!(first.messages(), vec![(3, "to first".to_string())]);
    assert_eq!(
        second.messages(),
        vec![(3, "to second".to_string()), (5, "also to second".to_string())]
    );
}

#[test]
fn test_forwarders_do_not_share_observers() {
    let a = TraceForwarder::detached();
    let b = TraceForwarder::detached();
    let log = TraceLog::new();
    a.register_observer(log.clone());

    forward_trace!(b, 3, "only b");
    assert!(log.is_empty());
}

#[test]
fn test_concurrent_events_all_arrive() {
    let forwarder = TraceForwarder::detached();
    let log = TraceLog::new();
    forwarder.register_observer(log.clone());

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let forwarder = &forwarder;
            scope.spawn(move || {
                for i in 0..50 {
                    forward_trace!(forwarder, 3, "worker {worker} event {i}");
                }
            });
        }
    });

    assert_eq!(log.len(), 200);
}
