//! The host-facing command facade.
//!
//! [`Bridge`] wraps one SDK device instance: every method is a straight
//! pass-through to the corresponding SDK call, with one uniform failure
//! rule — a nonzero status becomes [`Error::Sdk`] carrying the SDK's own
//! description text, looked up at the call site and passed through
//! verbatim. Failures are synchronous and immediate; nothing here
//! retries or defers.
//!
//! Creation is where the event wiring happens: [`Bridge::create`]
//! allocates the SDK instance and installs all four callbacks, each a
//! thin capture that builds a [`BridgeEvent`] and pushes it into the
//! given [`EventSink`] before returning success to the SDK. No host
//! logic ever runs on the SDK's thread.

use crate::sdk::{BridgeSdk, RawStatus, SDK_OK};
use crate::types::BridgeInfo;
use loadbridge_core::{BridgeGain, DeviceHandle, DeviceStatus, Error, Result, constants};
use loadbridge_events::{BridgeEvent, EventSink};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Translate a command-style status into a described error.
fn check(sdk: &dyn BridgeSdk, code: RawStatus) -> Result<()> {
    if code == SDK_OK {
        Ok(())
    } else {
        Err(Error::sdk(sdk.error_description(code)))
    }
}

/// Translate a getter-style result into a described error.
fn translate<T>(sdk: &dyn BridgeSdk, result: std::result::Result<T, RawStatus>) -> Result<T> {
    result.map_err(|code| Error::sdk(sdk.error_description(code)))
}

/// Version string of the SDK library itself.
pub fn library_version(sdk: &dyn BridgeSdk) -> Result<String> {
    translate(sdk, sdk.library_version())
}

/// One bridge device instance: synchronous control surface plus the
/// event wiring installed at creation.
///
/// The facade owns the handle-to-SDK mapping; the event core only ever
/// sees the opaque [`DeviceHandle`] it routes on. Command calls and SDK
/// callbacks share nothing but that identifier, so the facade has no
/// locking of its own.
pub struct Bridge {
    sdk: Arc<dyn BridgeSdk>,
    handle: DeviceHandle,
}

impl Bridge {
    /// Allocate a device instance and wire its four event callbacks to
    /// the sink.
    ///
    /// Each callback clones the sink, builds the matching event record
    /// inside the callback (copying the error text out of the SDK's
    /// transient buffer), pushes it, and returns success to the SDK
    /// unconditionally — the capture path has no failure mode the SDK
    /// can see.
    ///
    /// # Errors
    /// Fails with the SDK's description if allocation or any callback
    /// registration fails.
    pub fn create(sdk: Arc<dyn BridgeSdk>, sink: &EventSink) -> Result<Self> {
        let handle = translate(sdk.as_ref(), sdk.create())?;

        let capture = sink.clone();
        check(
            sdk.as_ref(),
            sdk.set_on_attach(
                handle,
                Arc::new(move |device| {
                    capture.push(BridgeEvent::Attach { device });
                    SDK_OK
                }),
            ),
        )?;

        let capture = sink.clone();
        check(
            sdk.as_ref(),
            sdk.set_on_detach(
                handle,
                Arc::new(move |device| {
                    capture.push(BridgeEvent::Detach { device });
                    SDK_OK
                }),
            ),
        )?;

        let capture = sink.clone();
        check(
            sdk.as_ref(),
            sdk.set_on_error(
                handle,
                // Only the description crosses the thread boundary; the
                // numeric fault code stops here.
                Arc::new(move |device, _code, message| {
                    capture.push(BridgeEvent::Error {
                        device,
                        message: message.to_owned(),
                    });
                    SDK_OK
                }),
            ),
        )?;

        let capture = sink.clone();
        check(
            sdk.as_ref(),
            sdk.set_on_data(
                handle,
                Arc::new(move |device, channel, value| {
                    capture.push(BridgeEvent::Data {
                        device,
                        channel,
                        value,
                    });
                    SDK_OK
                }),
            ),
        )?;

        info!(%handle, "bridge device instance created");
        Ok(Self { sdk, handle })
    }

    /// The opaque handle events for this device are routed under.
    pub fn handle(&self) -> DeviceHandle {
        self.handle
    }

    // --- lifecycle ---

    /// Begin matching against hardware with the given serial number.
    pub fn open(&self, serial: i32) -> Result<()> {
        info!(handle = %self.handle, serial, "opening bridge device");
        self.check(self.sdk.open(self.handle, serial))
    }

    /// Begin matching against whichever bridge device attaches first.
    pub fn open_any(&self) -> Result<()> {
        self.open(constants::SERIAL_ANY)
    }

    /// Block until hardware attaches or the timeout elapses.
    ///
    /// A zero timeout waits indefinitely. Blocks the calling thread;
    /// don't call it from the context that runs the event dispatch loop
    /// while expecting that loop to make progress.
    pub fn wait_for_attachment(&self, timeout: Duration) -> Result<()> {
        let timeout_ms = timeout.as_millis().min(u128::from(u32::MAX)) as u32;
        self.check(self.sdk.wait_for_attachment(self.handle, timeout_ms))
    }

    /// Release the hardware binding.
    pub fn close(&self) -> Result<()> {
        info!(handle = %self.handle, "closing bridge device");
        self.check(self.sdk.close(self.handle))
    }

    /// Destroy the device instance. Consumes the facade; the handle is
    /// dead afterwards.
    pub fn remove(self) -> Result<()> {
        info!(handle = %self.handle, "removing bridge device instance");
        self.check(self.sdk.remove(self.handle))
    }

    // --- metadata ---

    /// Product name of the attached device.
    pub fn device_name(&self) -> Result<String> {
        self.translate(self.sdk.device_name(self.handle))
    }

    /// Serial number of the attached device.
    pub fn serial_number(&self) -> Result<i32> {
        self.translate(self.sdk.serial_number(self.handle))
    }

    /// Firmware version of the attached device.
    pub fn device_version(&self) -> Result<i32> {
        self.translate(self.sdk.device_version(self.handle))
    }

    /// Current attachment status.
    pub fn device_status(&self) -> Result<DeviceStatus> {
        let raw = self.translate(self.sdk.device_status(self.handle))?;
        DeviceStatus::from_raw(raw)
    }

    /// Device family name of the attached device.
    pub fn device_type(&self) -> Result<String> {
        self.translate(self.sdk.device_type(self.handle))
    }

    /// Number of bridge inputs on the attached device.
    pub fn input_count(&self) -> Result<u32> {
        self.translate(self.sdk.input_count(self.handle))
    }

    /// Gather the full metadata snapshot in one round of queries.
    pub fn info(&self) -> Result<BridgeInfo> {
        Ok(BridgeInfo {
            name: self.device_name()?,
            device_type: self.device_type()?,
            serial_number: self.serial_number()?,
            version: self.device_version()?,
            status: self.device_status()?,
            input_count: self.input_count()?,
        })
    }

    // --- channel state ---

    /// Latest measured value on an input (mV/V).
    pub fn bridge_value(&self, channel: u32) -> Result<f64> {
        self.translate(self.sdk.bridge_value(self.handle, channel))
    }

    /// Lower measurable bound on an input at its current gain.
    pub fn bridge_min(&self, channel: u32) -> Result<f64> {
        self.translate(self.sdk.bridge_min(self.handle, channel))
    }

    /// Upper measurable bound on an input at its current gain.
    pub fn bridge_max(&self, channel: u32) -> Result<f64> {
        self.translate(self.sdk.bridge_max(self.handle, channel))
    }

    /// Whether an input is enabled for sampling.
    pub fn enabled(&self, channel: u32) -> Result<bool> {
        self.translate(self.sdk.enabled(self.handle, channel))
    }

    /// Enable or disable an input.
    pub fn set_enabled(&self, channel: u32, enabled: bool) -> Result<()> {
        debug!(handle = %self.handle, channel, enabled, "setting input enable state");
        self.check(self.sdk.set_enabled(self.handle, channel, enabled))
    }

    /// Amplification configured on an input.
    pub fn gain(&self, channel: u32) -> Result<BridgeGain> {
        let raw = self.translate(self.sdk.gain(self.handle, channel))?;
        BridgeGain::from_raw(raw)
    }

    /// Configure an input's amplification.
    pub fn set_gain(&self, channel: u32, gain: BridgeGain) -> Result<()> {
        debug!(handle = %self.handle, channel, %gain, "setting input gain");
        self.check(self.sdk.set_gain(self.handle, channel, gain.as_raw()))
    }

    // --- sampling rate ---

    /// Sampling interval in milliseconds.
    pub fn data_rate(&self) -> Result<u32> {
        self.translate(self.sdk.data_rate(self.handle))
    }

    /// Configure the sampling interval in milliseconds.
    pub fn set_data_rate(&self, milliseconds: u32) -> Result<()> {
        debug!(handle = %self.handle, milliseconds, "setting data rate");
        self.check(self.sdk.set_data_rate(self.handle, milliseconds))
    }

    /// Fastest supported sampling interval in milliseconds.
    pub fn data_rate_min(&self) -> Result<u32> {
        self.translate(self.sdk.data_rate_min(self.handle))
    }

    /// Slowest supported sampling interval in milliseconds.
    pub fn data_rate_max(&self) -> Result<u32> {
        self.translate(self.sdk.data_rate_max(self.handle))
    }

    fn check(&self, code: RawStatus) -> Result<()> {
        check(self.sdk.as_ref(), code)
    }

    fn translate<T>(&self, result: std::result::Result<T, RawStatus>) -> Result<T> {
        translate(self.sdk.as_ref(), result)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge").field("handle", &self.handle).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSdk;
    use loadbridge_events::event_channel;

    fn created() -> (Bridge, crate::mock::MockSdkHandle, loadbridge_events::EventDispatcher) {
        let (sdk, sim) = MockSdk::new();
        let (sink, dispatcher) = event_channel();
        let bridge = Bridge::create(sdk, &sink).unwrap();
        (bridge, sim, dispatcher)
    }

    #[test]
    fn test_commands_fail_with_sdk_description_before_attach() {
        let (bridge, _sim, _dispatcher) = created();
        bridge.open_any().unwrap();

        let error = bridge.device_name().unwrap_err();
        assert_eq!(error.to_string(), "Device not attached");
    }

    #[test]
    fn test_metadata_after_attach() {
        let (bridge, sim, _dispatcher) = created();
        bridge.open_any().unwrap();
        sim.attach(45071).unwrap();

        let info = bridge.info().unwrap();
        assert_eq!(info.serial_number, 45071);
        assert_eq!(info.status, DeviceStatus::Attached);
        assert_eq!(info.input_count, 4);
    }

    #[test]
    fn test_gain_round_trip() {
        let (bridge, sim, _dispatcher) = created();
        bridge.open_any().unwrap();
        sim.attach(1).unwrap();

        assert_eq!(bridge.gain(0).unwrap(), BridgeGain::G1);
        bridge.set_gain(0, BridgeGain::G64).unwrap();
        assert_eq!(bridge.gain(0).unwrap(), BridgeGain::G64);
        assert_eq!(bridge.bridge_max(0).unwrap(), 1000.0 / 64.0);
    }

    #[test]
    fn test_data_rate_out_of_range_is_described() {
        let (bridge, sim, _dispatcher) = created();
        bridge.open_any().unwrap();
        sim.attach(1).unwrap();

        let error = bridge.set_data_rate(5000).unwrap_err();
        assert_eq!(error.to_string(), "Index out of bounds");
    }

    #[test]
    fn test_events_flow_into_sink() {
        let (bridge, sim, mut dispatcher) = created();
        bridge.open_any().unwrap();

        let handle = bridge.handle();
        sim.attach(9).unwrap();
        sim.push_sample(handle, 1, 0.5);
        sim.raise_error(handle, 3, "input saturated");

        use std::sync::{Arc, Mutex};
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = Arc::clone(&log);
            dispatcher.on_attach(move |device| log.lock().unwrap().push(format!("attach {device}")));
        }
        {
            let log = Arc::clone(&log);
            dispatcher.on_data(move |_, channel, value| {
                log.lock().unwrap().push(format!("data {channel} {value}"));
            });
        }
        {
            let log = Arc::clone(&log);
            dispatcher.on_error(move |_, message| log.lock().unwrap().push(format!("error {message}")));
        }

        assert_eq!(dispatcher.drain_now(), 3);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                format!("attach {handle}"),
                "data 1 0.5".to_string(),
                "error input saturated".to_string(),
            ]
        );
    }

    #[test]
    fn test_remove_releases_event_wiring() {
        let (sdk, sim) = MockSdk::new();
        let (sink, dispatcher) = event_channel();
        let bridge = Bridge::create(sdk, &sink).unwrap();
        drop(sink);

        assert!(!dispatcher.is_closed(), "callbacks still hold sinks");
        bridge.remove().unwrap();
        assert!(dispatcher.is_closed(), "remove must drop the callback sinks");
        sim.shutdown();
    }

    #[test]
    fn test_library_version_passthrough() {
        let (sdk, _sim) = MockSdk::new();
        let version = library_version(sdk.as_ref()).unwrap();
        assert!(version.contains("2.1.8"));
    }
}
