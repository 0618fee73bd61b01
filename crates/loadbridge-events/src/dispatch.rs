//! The single-consumer loop that drains the queue and runs handlers.

use crate::channel::Shared;
use crate::record::BridgeEvent;
use crate::registry::HandlerRegistry;
use loadbridge_core::DeviceHandle;
use std::sync::Arc;
use tracing::{debug, trace};

/// Consumer side of an event channel.
///
/// Owns the handler registry and drives dispatch on exactly one
/// execution context — whichever task awaits [`run`](Self::run). Each
/// wakeup drains the entire queue and invokes the registered handler for
/// every record, in the order the queue returned them. Handlers
/// therefore never race each other, and never run on an SDK thread.
///
/// Handlers are registered with the `on_*` methods, normally once at
/// startup before any device is opened. Registering later is legal:
/// the new handler sees every record drained after the change, including
/// records that were already queued.
///
/// # Teardown
///
/// [`run`](Self::run) returns after the stream closes (every
/// [`EventSink`](crate::EventSink) clone dropped) and one final drain has
/// dispatched whatever was still queued. A batch that has started
/// dispatching is always finished; there is no mid-batch cancellation.
pub struct EventDispatcher {
    shared: Arc<Shared>,
    registry: HandlerRegistry,
}

impl EventDispatcher {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            registry: HandlerRegistry::new(),
        }
    }

    /// Register the attach handler.
    pub fn on_attach(&mut self, handler: impl FnMut(DeviceHandle) + Send + 'static) {
        self.registry.set_attach(handler);
    }

    /// Register the detach handler.
    pub fn on_detach(&mut self, handler: impl FnMut(DeviceHandle) + Send + 'static) {
        self.registry.set_detach(handler);
    }

    /// Register the error handler.
    pub fn on_error(&mut self, handler: impl FnMut(DeviceHandle, &str) + Send + 'static) {
        self.registry.set_error(handler);
    }

    /// Register the data handler.
    pub fn on_data(&mut self, handler: impl FnMut(DeviceHandle, u32, f64) + Send + 'static) {
        self.registry.set_data(handler);
    }

    /// Drive dispatch until the stream closes.
    ///
    /// Suspends between wakeups; this is the only blocking operation in
    /// the event core, and it blocks only the consumer context. Producer
    /// pushes that land while a batch is dispatching are picked up by the
    /// next drain — the wakeup signal stores their permit, so the loop
    /// never sleeps through them.
    pub async fn run(&mut self) {
        loop {
            let batch = self.shared.queue.drain_all();
            if !batch.is_empty() {
                self.dispatch_batch(batch);
                continue;
            }
            if self.shared.is_closed() {
                debug!("event stream closed, dispatch loop exiting");
                return;
            }
            self.shared.wakeup.wait().await;
        }
    }

    /// Drain and dispatch one batch synchronously, returning how many
    /// records were dispatched.
    ///
    /// Useful at teardown to flush residual records without a running
    /// loop, and for hosts that want to pump dispatch from their own
    /// scheduler tick.
    pub fn drain_now(&mut self) -> usize {
        let batch = self.shared.queue.drain_all();
        let count = batch.len();
        if count > 0 {
            self.dispatch_batch(batch);
        }
        count
    }

    /// Number of records waiting to be drained.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Whether every producer sink has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    fn dispatch_batch(&mut self, batch: Vec<BridgeEvent>) {
        debug!(count = batch.len(), "dispatching event batch");
        for event in batch {
            trace!(kind = %event.kind(), device = %event.device(), "dispatching event");
            self.registry.dispatch(event);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .field("registry", &self.registry)
            .finish()
    }
}
