//! Event records captured from SDK callbacks.
//!
//! A [`BridgeEvent`] is built inside the SDK's callback, at the moment it
//! fires, and owns everything it carries — in particular the error text,
//! because the SDK's buffer is only valid for the duration of the
//! callback. Records are written once, queued, and consumed exactly once
//! by dispatch; they are never shared or mutated.

use loadbridge_core::DeviceHandle;
use std::fmt;

/// The closed set of occurrences the event core transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A physical device bound to an open handle.
    Attach,

    /// A physical device disconnected from its handle.
    Detach,

    /// The device reported an asynchronous fault.
    Error,

    /// The device delivered one sampled value.
    Data,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach => write!(f, "attach"),
            Self::Detach => write!(f, "detach"),
            Self::Error => write!(f, "error"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// One captured occurrence, tagged by kind.
///
/// Each variant carries only the fields its kind defines, so an invalid
/// combination (say, a detach with a sample value) cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// A device attached.
    Attach {
        /// Device that raised the event.
        device: DeviceHandle,
    },

    /// A device detached.
    Detach {
        /// Device that raised the event.
        device: DeviceHandle,
    },

    /// The device reported a fault.
    ///
    /// Only the human-readable description is carried; the SDK's numeric
    /// fault code is dropped at capture.
    Error {
        /// Device that raised the event.
        device: DeviceHandle,

        /// Owned copy of the SDK's description text.
        message: String,
    },

    /// The device delivered a sample.
    Data {
        /// Device that raised the event.
        device: DeviceHandle,

        /// 0-based bridge input index.
        channel: u32,

        /// The sampled value, opaque to the event core.
        value: f64,
    },
}

impl BridgeEvent {
    /// The kind tag of this record.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Attach { .. } => EventKind::Attach,
            Self::Detach { .. } => EventKind::Detach,
            Self::Error { .. } => EventKind::Error,
            Self::Data { .. } => EventKind::Data,
        }
    }

    /// The device that raised this record.
    pub fn device(&self) -> DeviceHandle {
        match self {
            Self::Attach { device }
            | Self::Detach { device }
            | Self::Error { device, .. }
            | Self::Data { device, .. } => *device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tags() {
        let device = DeviceHandle::from_raw(3);

        assert_eq!(BridgeEvent::Attach { device }.kind(), EventKind::Attach);
        assert_eq!(BridgeEvent::Detach { device }.kind(), EventKind::Detach);
        assert_eq!(
            BridgeEvent::Error {
                device,
                message: "overcurrent".to_string()
            }
            .kind(),
            EventKind::Error
        );
        assert_eq!(
            BridgeEvent::Data {
                device,
                channel: 1,
                value: 0.5
            }
            .kind(),
            EventKind::Data
        );
    }

    #[test]
    fn test_event_device_accessor() {
        let device = DeviceHandle::from_raw(11);
        let event = BridgeEvent::Data {
            device,
            channel: 2,
            value: 3.15,
        };
        assert_eq!(event.device(), device);
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::Attach.to_string(), "attach");
        assert_eq!(EventKind::Detach.to_string(), "detach");
        assert_eq!(EventKind::Error.to_string(), "error");
        assert_eq!(EventKind::Data.to_string(), "data");
    }

    #[test]
    fn test_error_event_owns_its_message() {
        let message = String::from("input saturated");
        let event = BridgeEvent::Error {
            device: DeviceHandle::from_raw(1),
            message,
        };
        // The record must be self-contained once the callback returns.
        if let BridgeEvent::Error { message, .. } = event {
            assert_eq!(message, "input saturated");
        } else {
            panic!("expected Error variant");
        }
    }
}
