//! End-to-end dispatch flow tests: capture, drain, handler invocation,
//! late registration, and teardown.

use loadbridge_core::DeviceHandle;
use loadbridge_events::{BridgeEvent, event_channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Readable record of a handler invocation, for asserting order and
/// arguments across kinds.
#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Attach(u64),
    Detach(u64),
    Error(u64, String),
    Data(u64, u32, f64),
}

fn handle(raw: u64) -> DeviceHandle {
    DeviceHandle::from_raw(raw)
}

#[test]
fn test_mixed_batch_dispatches_in_arrival_order() {
    let (sink, mut dispatcher) = event_channel();
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let seen = Arc::clone(&seen);
        dispatcher.on_attach(move |device| {
            seen.lock().unwrap().push(Seen::Attach(device.as_raw()));
        });
    }
    {
        let seen = Arc::clone(&seen);
        dispatcher.on_data(move |device, channel, value| {
            seen.lock()
                .unwrap()
                .push(Seen::Data(device.as_raw(), channel, value));
        });
    }
    {
        let seen = Arc::clone(&seen);
        dispatcher.on_error(move |device, message| {
            seen.lock()
                .unwrap()
                .push(Seen::Error(device.as_raw(), message.to_string()));
        });
    }

    sink.push(BridgeEvent::Attach { device: handle(7) });
    sink.push(BridgeEvent::Data {
        device: handle(7),
        channel: 2,
        value: 3.14,
    });
    sink.push(BridgeEvent::Error {
        device: handle(7),
        message: "overcurrent".to_string(),
    });

    assert_eq!(dispatcher.drain_now(), 3);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Seen::Attach(7),
            Seen::Data(7, 2, 3.14),
            Seen::Error(7, "overcurrent".to_string()),
        ]
    );
}

#[test]
fn test_unregistered_kinds_are_silently_discarded() {
    let (sink, mut dispatcher) = event_channel();
    let seen = Arc::new(Mutex::new(Vec::new()));

    // Only the attach slot is registered.
    {
        let seen = Arc::clone(&seen);
        dispatcher.on_attach(move |device| {
            seen.lock().unwrap().push(Seen::Attach(device.as_raw()));
        });
    }

    sink.push(BridgeEvent::Detach { device: handle(1) });
    sink.push(BridgeEvent::Attach { device: handle(2) });
    sink.push(BridgeEvent::Data {
        device: handle(2),
        channel: 0,
        value: 1.0,
    });

    // All three records are consumed; only the attach is observed.
    assert_eq!(dispatcher.drain_now(), 3);
    assert_eq!(*seen.lock().unwrap(), vec![Seen::Attach(2)]);
    assert_eq!(dispatcher.pending(), 0);
}

#[test]
fn test_handler_registered_after_queueing_sees_queued_records() {
    let (sink, mut dispatcher) = event_channel();

    // Three errors are already in flight before anyone listens.
    for i in 0..3 {
        sink.push(BridgeEvent::Error {
            device: handle(4),
            message: format!("fault {i}"),
        });
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        dispatcher.on_error(move |_, message| {
            seen.lock().unwrap().push(message.to_string());
        });
    }

    // Registration before drain is sufficient; before append is not required.
    assert_eq!(dispatcher.drain_now(), 3);
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["fault 0".to_string(), "fault 1".to_string(), "fault 2".to_string()]
    );
}

#[test]
fn test_each_handler_invoked_exactly_once_per_record() {
    let (sink, mut dispatcher) = event_channel();
    let attaches = Arc::new(Mutex::new(0u32));
    let datas = Arc::new(Mutex::new(0u32));

    {
        let attaches = Arc::clone(&attaches);
        dispatcher.on_attach(move |_| *attaches.lock().unwrap() += 1);
    }
    {
        let datas = Arc::clone(&datas);
        dispatcher.on_data(move |_, _, _| *datas.lock().unwrap() += 1);
    }

    sink.push(BridgeEvent::Attach { device: handle(1) });
    sink.push(BridgeEvent::Data {
        device: handle(1),
        channel: 0,
        value: 0.5,
    });

    dispatcher.drain_now();
    // A second drain must not replay anything.
    assert_eq!(dispatcher.drain_now(), 0);

    assert_eq!(*attaches.lock().unwrap(), 1);
    assert_eq!(*datas.lock().unwrap(), 1);
}

#[test]
fn test_teardown_final_drain_flushes_residuals() {
    let (sink, mut dispatcher) = event_channel();
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        dispatcher.on_detach(move |device| {
            seen.lock().unwrap().push(Seen::Detach(device.as_raw()));
        });
    }

    sink.push(BridgeEvent::Detach { device: handle(9) });
    sink.push(BridgeEvent::Detach { device: handle(10) });

    // Producers are done: last sink drops, then one final drain.
    drop(sink);
    assert!(dispatcher.is_closed());
    assert_eq!(dispatcher.drain_now(), 2);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Seen::Detach(9), Seen::Detach(10)]
    );
    assert_eq!(dispatcher.pending(), 0);
}

#[tokio::test]
async fn test_run_loop_delivers_and_exits_on_close() {
    let (sink, mut dispatcher) = event_channel();
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        dispatcher.on_data(move |device, channel, value| {
            seen.lock()
                .unwrap()
                .push(Seen::Data(device.as_raw(), channel, value));
        });
    }

    let producer = std::thread::spawn(move || {
        for i in 0..5 {
            sink.push(BridgeEvent::Data {
                device: handle(3),
                channel: 1,
                value: i as f64,
            });
            std::thread::sleep(Duration::from_millis(1));
        }
    });

    tokio::time::timeout(Duration::from_secs(2), dispatcher.run())
        .await
        .expect("dispatch loop did not exit after producers finished");
    producer.join().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], Seen::Data(3, 1, 0.0));
    assert_eq!(seen[4], Seen::Data(3, 1, 4.0));
}
