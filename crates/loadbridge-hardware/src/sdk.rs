//! The vendor SDK boundary.
//!
//! [`BridgeSdk`] is the shape of the external device SDK: synchronous
//! entry points that report failure through raw integer status codes,
//! four callback registration points fired from SDK-owned worker
//! threads, and a lookup that turns a status code into the SDK's own
//! description text.
//!
//! Everything above this trait — the command facade, the event wiring —
//! is written against it, so a real SDK binding and the in-process
//! [`mock`](crate::mock) are interchangeable.

use loadbridge_core::DeviceHandle;
use std::sync::Arc;

/// Raw status code returned by every SDK call. Zero is success.
pub type RawStatus = i32;

/// The SDK's success status.
pub const SDK_OK: RawStatus = 0;

/// Callback fired when a device attaches.
///
/// Runs on an SDK worker thread. Must return a status promptly and must
/// not block or fail; the SDK's callback contract allows neither.
pub type AttachCallback = Arc<dyn Fn(DeviceHandle) -> RawStatus + Send + Sync>;

/// Callback fired when a device detaches. Same contract as [`AttachCallback`].
pub type DetachCallback = Arc<dyn Fn(DeviceHandle) -> RawStatus + Send + Sync>;

/// Callback fired when a device reports an asynchronous fault.
///
/// Receives the fault code and its description text. The text borrow is
/// only valid for the duration of the call — copy it out if it must
/// survive. Same threading contract as [`AttachCallback`].
pub type ErrorCallback = Arc<dyn Fn(DeviceHandle, RawStatus, &str) -> RawStatus + Send + Sync>;

/// Callback fired for each sampled value. Same contract as [`AttachCallback`].
pub type DataCallback = Arc<dyn Fn(DeviceHandle, u32, f64) -> RawStatus + Send + Sync>;

/// The external device SDK's control surface.
///
/// Implementations are shared across threads (`&self` receivers,
/// `Send + Sync`): the host issues commands from its own context while
/// the SDK's worker threads deliver callbacks concurrently.
///
/// Getter-style calls return `Err(code)` instead of an out-parameter;
/// command-style calls return the status directly. Neither panics —
/// every failure is a status code for the caller to translate via
/// [`error_description`](Self::error_description).
pub trait BridgeSdk: Send + Sync {
    // --- instance lifecycle ---

    /// Allocate a device instance and mint its handle.
    fn create(&self) -> Result<DeviceHandle, RawStatus>;

    /// Begin matching the instance against hardware with the given
    /// serial number (`SERIAL_ANY` matches any device).
    fn open(&self, handle: DeviceHandle, serial: i32) -> RawStatus;

    /// Block until hardware attaches to the instance, or the timeout
    /// elapses. A timeout of zero waits indefinitely.
    fn wait_for_attachment(&self, handle: DeviceHandle, timeout_ms: u32) -> RawStatus;

    /// Stop matching and release the hardware binding.
    fn close(&self, handle: DeviceHandle) -> RawStatus;

    /// Destroy the instance. The handle is dead afterwards.
    fn remove(&self, handle: DeviceHandle) -> RawStatus;

    // --- callback registration ---

    /// Install the attach callback for an instance.
    fn set_on_attach(&self, handle: DeviceHandle, callback: AttachCallback) -> RawStatus;

    /// Install the detach callback for an instance.
    fn set_on_detach(&self, handle: DeviceHandle, callback: DetachCallback) -> RawStatus;

    /// Install the error callback for an instance.
    fn set_on_error(&self, handle: DeviceHandle, callback: ErrorCallback) -> RawStatus;

    /// Install the data callback for an instance.
    fn set_on_data(&self, handle: DeviceHandle, callback: DataCallback) -> RawStatus;

    // --- device metadata ---

    /// Product name of the attached device.
    fn device_name(&self, handle: DeviceHandle) -> Result<String, RawStatus>;

    /// Serial number of the attached device.
    fn serial_number(&self, handle: DeviceHandle) -> Result<i32, RawStatus>;

    /// Firmware version of the attached device.
    fn device_version(&self, handle: DeviceHandle) -> Result<i32, RawStatus>;

    /// Attachment status: 0 detached, 1 attached.
    fn device_status(&self, handle: DeviceHandle) -> Result<i32, RawStatus>;

    /// Device family name of the attached device.
    fn device_type(&self, handle: DeviceHandle) -> Result<String, RawStatus>;

    /// Version string of the SDK library itself.
    fn library_version(&self) -> Result<String, RawStatus>;

    /// Number of bridge inputs on the attached device.
    fn input_count(&self, handle: DeviceHandle) -> Result<u32, RawStatus>;

    // --- channel state ---

    /// Latest measured value on an input (mV/V).
    fn bridge_value(&self, handle: DeviceHandle, channel: u32) -> Result<f64, RawStatus>;

    /// Lower measurable bound on an input at its current gain.
    fn bridge_min(&self, handle: DeviceHandle, channel: u32) -> Result<f64, RawStatus>;

    /// Upper measurable bound on an input at its current gain.
    fn bridge_max(&self, handle: DeviceHandle, channel: u32) -> Result<f64, RawStatus>;

    /// Whether an input is enabled for sampling.
    fn enabled(&self, handle: DeviceHandle, channel: u32) -> Result<bool, RawStatus>;

    /// Enable or disable an input.
    fn set_enabled(&self, handle: DeviceHandle, channel: u32, enabled: bool) -> RawStatus;

    /// Raw amplification factor configured on an input.
    fn gain(&self, handle: DeviceHandle, channel: u32) -> Result<i32, RawStatus>;

    /// Configure an input's amplification factor.
    fn set_gain(&self, handle: DeviceHandle, channel: u32, gain: i32) -> RawStatus;

    // --- sampling rate ---

    /// Sampling interval in milliseconds.
    fn data_rate(&self, handle: DeviceHandle) -> Result<u32, RawStatus>;

    /// Configure the sampling interval in milliseconds.
    fn set_data_rate(&self, handle: DeviceHandle, milliseconds: u32) -> RawStatus;

    /// Fastest supported sampling interval.
    fn data_rate_min(&self, handle: DeviceHandle) -> Result<u32, RawStatus>;

    /// Slowest supported sampling interval.
    fn data_rate_max(&self, handle: DeviceHandle) -> Result<u32, RawStatus>;

    // --- diagnostics ---

    /// The SDK's own description text for a status code.
    fn error_description(&self, code: RawStatus) -> String;
}
