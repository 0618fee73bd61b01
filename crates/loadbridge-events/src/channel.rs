//! The two-ended construction: producer sinks and the shared state
//! behind them.

use crate::dispatch::EventDispatcher;
use crate::queue::EventQueue;
use crate::record::BridgeEvent;
use crate::signal::WakeupSignal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// State shared between every sink clone and the dispatcher.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) queue: EventQueue,
    pub(crate) wakeup: WakeupSignal,
    closed: AtomicBool,
}

impl Shared {
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        // Wake the dispatcher so it can run its final drain and exit.
        self.wakeup.raise();
    }
}

/// Closes the stream when the last sink clone is dropped.
#[derive(Debug)]
struct SinkGuard {
    shared: Arc<Shared>,
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        self.shared.close();
    }
}

/// Producer-side handle for capturing events on SDK threads.
///
/// Clone one sink into each SDK callback. [`push`](Self::push) is the
/// whole capture path: build the record in the callback, push it, return
/// the SDK's success status. The push appends under the queue lock and
/// raises the wakeup signal — bounded work, no blocking beyond lock
/// contention, no failure path — so it honors the callback contract of
/// any SDK worker thread it runs on.
///
/// When the last clone is dropped the stream is closed; the dispatcher
/// drains what remains and its [`run`](EventDispatcher::run) loop
/// returns. Since the SDK's registered callbacks own the clones, closing
/// the SDK (dropping its callbacks) is what ends the stream — in that
/// order, so no producer can outlive the queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    guard: Arc<SinkGuard>,
}

impl EventSink {
    /// Capture one record: append it and wake the consumer.
    pub fn push(&self, event: BridgeEvent) {
        let shared = &self.guard.shared;
        shared.queue.append(event);
        shared.wakeup.raise();
    }

    /// Number of records waiting to be drained.
    pub fn pending(&self) -> usize {
        self.guard.shared.queue.len()
    }
}

/// Build a connected sink/dispatcher pair.
///
/// The pair owns all marshaling state — queue, wakeup signal, handler
/// registry — as one explicit context; nothing is process-global, and a
/// host that wants two independent event streams can simply build two
/// pairs.
pub fn event_channel() -> (EventSink, EventDispatcher) {
    let shared = Arc::new(Shared::default());
    let sink = EventSink {
        guard: Arc::new(SinkGuard {
            shared: Arc::clone(&shared),
        }),
    };
    (sink, EventDispatcher::new(shared))
}
