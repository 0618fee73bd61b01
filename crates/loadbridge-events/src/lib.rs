//! Cross-thread event marshaling for bridge devices.
//!
//! The device SDK raises attach/detach/error/sample callbacks on worker
//! threads it owns and schedules itself. Host applications want those
//! events on exactly one execution context, in arrival order, without the
//! SDK threads ever running host logic. This crate is that funnel.
//!
//! # Architecture
//!
//! ```text
//! SDK thread ──┐
//!              │  EventSink::push          EventDispatcher::run
//! SDK thread ──┼──────────────► EventQueue ────────────────────► handlers
//!              │                    │ ▲
//! SDK thread ──┘                    ▼ │ drain_all
//!                              WakeupSignal
//!                           (coalescing notify)
//! ```
//!
//! [`event_channel`] builds the two ends. The [`EventSink`] is cloned into
//! each SDK callback; a push appends one [`BridgeEvent`] under the queue
//! lock and raises the wakeup signal, both non-blocking, so the SDK's
//! callback contract (return promptly, never fail) holds. The
//! [`EventDispatcher`] lives on the host's single consumer context: each
//! wakeup drains the whole queue and hands every record, in order, to the
//! handler registered for its kind.
//!
//! # Ordering
//!
//! Records pushed from one SDK thread are dispatched in push order.
//! Records from different SDK threads interleave in whatever order the
//! queue lock admits them; the SDK makes no promise there and neither
//! does this crate.
//!
//! # Lifecycle
//!
//! Dropping the last [`EventSink`] clone closes the stream: the dispatch
//! loop drains whatever is still queued, dispatches it, and returns.
//! Closing the SDK before dropping the sinks (which its callbacks own)
//! guarantees no producer can touch a torn-down queue.
//!
//! # Example
//!
//! ```
//! use loadbridge_core::DeviceHandle;
//! use loadbridge_events::{BridgeEvent, event_channel};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (sink, mut dispatcher) = event_channel();
//!     dispatcher.on_data(|device, channel, value| {
//!         println!("device {device} channel {channel}: {value}");
//!     });
//!
//!     let producer = std::thread::spawn(move || {
//!         sink.push(BridgeEvent::Data {
//!             device: DeviceHandle::from_raw(1),
//!             channel: 0,
//!             value: 2.5,
//!         });
//!         // sink drops here: stream closes once the push is drained
//!     });
//!
//!     dispatcher.run().await;
//!     producer.join().unwrap();
//! }
//! ```

pub mod channel;
pub mod dispatch;
pub mod queue;
pub mod record;
pub mod registry;
pub mod signal;

pub use channel::{EventSink, event_channel};
pub use dispatch::EventDispatcher;
pub use queue::EventQueue;
pub use record::{BridgeEvent, EventKind};
pub use registry::HandlerRegistry;
pub use signal::WakeupSignal;
