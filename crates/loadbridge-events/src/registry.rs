//! Per-kind handler slots and the dispatch that unpacks records into
//! their arguments.

use crate::record::{BridgeEvent, EventKind};
use loadbridge_core::DeviceHandle;
use std::fmt;

/// Handler for attach events.
pub type AttachHandler = Box<dyn FnMut(DeviceHandle) + Send>;

/// Handler for detach events.
pub type DetachHandler = Box<dyn FnMut(DeviceHandle) + Send>;

/// Handler for error events. Receives the SDK's description text.
pub type ErrorHandler = Box<dyn FnMut(DeviceHandle, &str) + Send>;

/// Handler for data events. Receives the input index and sampled value.
pub type DataHandler = Box<dyn FnMut(DeviceHandle, u32, f64) + Send>;

/// One optional callback slot per event kind.
///
/// Registration is optional per kind: a record whose kind has no handler
/// is silently discarded, which is not an error. Each `set_*` replaces
/// any previous handler; the replacement applies to records dispatched
/// after the change — records already handed out are not redelivered.
///
/// The registry is only ever driven by the dispatch loop, on the single
/// consumer context, so handlers never run concurrently with each other.
#[derive(Default)]
pub struct HandlerRegistry {
    attach: Option<AttachHandler>,
    detach: Option<DetachHandler>,
    error: Option<ErrorHandler>,
    data: Option<DataHandler>,
}

impl HandlerRegistry {
    /// Create a registry with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attach handler.
    pub fn set_attach(&mut self, handler: impl FnMut(DeviceHandle) + Send + 'static) {
        self.attach = Some(Box::new(handler));
    }

    /// Set the detach handler.
    pub fn set_detach(&mut self, handler: impl FnMut(DeviceHandle) + Send + 'static) {
        self.detach = Some(Box::new(handler));
    }

    /// Set the error handler.
    pub fn set_error(&mut self, handler: impl FnMut(DeviceHandle, &str) + Send + 'static) {
        self.error = Some(Box::new(handler));
    }

    /// Set the data handler.
    pub fn set_data(&mut self, handler: impl FnMut(DeviceHandle, u32, f64) + Send + 'static) {
        self.data = Some(Box::new(handler));
    }

    /// Whether a handler is registered for the given kind.
    pub fn has_handler(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Attach => self.attach.is_some(),
            EventKind::Detach => self.detach.is_some(),
            EventKind::Error => self.error.is_some(),
            EventKind::Data => self.data.is_some(),
        }
    }

    /// Consume one record, invoking its kind's handler with the record's
    /// fields unpacked into that handler's arguments.
    ///
    /// Handler failures are not caught here: a panic propagates to the
    /// consumer context, whose error policy belongs to the host.
    pub fn dispatch(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Attach { device } => {
                if let Some(handler) = &mut self.attach {
                    handler(device);
                }
            }
            BridgeEvent::Detach { device } => {
                if let Some(handler) = &mut self.detach {
                    handler(device);
                }
            }
            BridgeEvent::Error { device, message } => {
                if let Some(handler) = &mut self.error {
                    handler(device, &message);
                }
            }
            BridgeEvent::Data {
                device,
                channel,
                value,
            } => {
                if let Some(handler) = &mut self.data {
                    handler(device, channel, value);
                }
            }
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("attach", &self.attach.is_some())
            .field("detach", &self.detach.is_some())
            .field("error", &self.error.is_some())
            .field("data", &self.data.is_some())
            .finish()
    }
}
