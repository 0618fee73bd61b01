//! The simulated SDK core: device table, status codes, and the
//! `BridgeSdk` implementation.

use super::status;
use crate::sdk::{
    AttachCallback, BridgeSdk, DataCallback, DetachCallback, ErrorCallback, RawStatus, SDK_OK,
};
use loadbridge_core::{BridgeGain, DeviceHandle, constants};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Simulation parameters for the mock SDK.
///
/// The defaults describe a four-input bridge interface; tests that need
/// a different shape (say, a single-input device) pass their own config
/// to [`MockSdk::with_config`].
#[derive(Debug, Clone)]
pub struct MockSdkConfig {
    /// Product name reported by the metadata getters.
    pub device_name: String,

    /// Device family name reported by the metadata getters.
    pub device_type: String,

    /// Firmware version reported by the metadata getters.
    pub device_version: i32,

    /// Version string for the SDK library itself.
    pub library_version: String,

    /// Bridge inputs per device.
    pub input_count: u32,

    /// Sampling interval a device starts with (milliseconds).
    pub data_rate_ms: u32,
}

impl Default for MockSdkConfig {
    fn default() -> Self {
        Self {
            device_name: "4-Input Bridge".to_string(),
            device_type: "Bridge".to_string(),
            device_version: 102,
            library_version: "2.1.8 (simulated)".to_string(),
            input_count: constants::INPUT_COUNT,
            data_rate_ms: constants::DEFAULT_DATA_RATE_MS,
        }
    }
}

/// Per-input simulated state.
#[derive(Debug, Clone)]
pub(super) struct ChannelState {
    pub(super) enabled: bool,
    pub(super) gain_raw: i32,
    pub(super) value: f64,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            enabled: false,
            gain_raw: BridgeGain::default().as_raw(),
            value: 0.0,
        }
    }
}

/// Callbacks registered against one device instance.
///
/// Arc'd so a firing thread can clone the slot out and invoke it after
/// releasing the device-table lock.
#[derive(Clone, Default)]
pub(super) struct CallbackSet {
    pub(super) attach: Option<AttachCallback>,
    pub(super) detach: Option<DetachCallback>,
    pub(super) error: Option<ErrorCallback>,
    pub(super) data: Option<DataCallback>,
}

/// A running sampling thread for one device.
pub(super) struct Sampler {
    pub(super) stop: Arc<AtomicBool>,
    pub(super) thread: thread::JoinHandle<()>,
}

impl Sampler {
    /// Signal the thread to stop and wait for it to finish.
    ///
    /// Must be called without the device-table lock held; the thread
    /// takes that lock on every tick.
    pub(super) fn halt(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.thread.join();
    }
}

/// One simulated device instance.
pub(super) struct DeviceSlot {
    /// Serial requested at open; `None` while the instance is not open.
    pub(super) open_serial: Option<i32>,
    pub(super) attached: bool,
    pub(super) serial_number: i32,
    pub(super) data_rate_ms: u32,
    pub(super) channels: Vec<ChannelState>,
    pub(super) callbacks: CallbackSet,
    pub(super) sampler: Option<Sampler>,
}

/// In-process [`BridgeSdk`] implementation.
///
/// Built with [`MockSdk::new`], which also returns the
/// [`MockSdkHandle`](super::MockSdkHandle) that drives the simulation.
/// All state lives behind one mutex; callbacks are cloned out and fired
/// after the lock is released, so a callback may freely call back into
/// the SDK.
pub struct MockSdk {
    config: MockSdkConfig,
    state: Mutex<HashMap<u64, DeviceSlot>>,
    attach_signal: Condvar,
    next_handle: AtomicU64,
}

impl MockSdk {
    /// Build a mock SDK with default parameters.
    pub fn new() -> (Arc<Self>, super::MockSdkHandle) {
        Self::with_config(MockSdkConfig::default())
    }

    /// Build a mock SDK with explicit parameters.
    pub fn with_config(config: MockSdkConfig) -> (Arc<Self>, super::MockSdkHandle) {
        let sdk = Arc::new(Self {
            config,
            state: Mutex::new(HashMap::new()),
            attach_signal: Condvar::new(),
            next_handle: AtomicU64::new(1),
        });
        let handle = super::MockSdkHandle::new(Arc::clone(&sdk));
        (sdk, handle)
    }

    pub(super) fn lock_state(&self) -> MutexGuard<'_, HashMap<u64, DeviceSlot>> {
        // Keep going on poison: a panicking test thread must not wedge
        // every other thread touching the simulation.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) fn notify_attach_waiters(&self) {
        self.attach_signal.notify_all();
    }

    /// Snapshot what one sampling-thread tick needs: the interval, the
    /// data callback, and the (channel, value) pairs to emit. `None`
    /// once the device is gone.
    pub(super) fn sampler_tick(
        &self,
        raw: u64,
    ) -> Option<(Duration, Option<DataCallback>, Vec<(u32, f64)>)> {
        let state = self.lock_state();
        let slot = state.get(&raw)?;
        let interval = Duration::from_millis(u64::from(slot.data_rate_ms));
        if !slot.attached {
            return Some((interval, None, Vec::new()));
        }
        let emissions = slot
            .channels
            .iter()
            .enumerate()
            .filter(|(_, channel)| channel.enabled)
            .map(|(index, channel)| (index as u32, channel.value))
            .collect();
        Some((interval, slot.callbacks.data.clone(), emissions))
    }

    fn with_slot<T>(
        &self,
        handle: DeviceHandle,
        f: impl FnOnce(&DeviceSlot) -> Result<T, RawStatus>,
    ) -> Result<T, RawStatus> {
        let state = self.lock_state();
        match state.get(&handle.as_raw()) {
            Some(slot) => f(slot),
            None => Err(status::NOT_FOUND),
        }
    }

    fn with_slot_mut<T>(
        &self,
        handle: DeviceHandle,
        f: impl FnOnce(&mut DeviceSlot) -> Result<T, RawStatus>,
    ) -> Result<T, RawStatus> {
        let mut state = self.lock_state();
        match state.get_mut(&handle.as_raw()) {
            Some(slot) => f(slot),
            None => Err(status::NOT_FOUND),
        }
    }

    fn with_attached<T>(
        &self,
        handle: DeviceHandle,
        f: impl FnOnce(&DeviceSlot) -> T,
    ) -> Result<T, RawStatus> {
        self.with_slot(handle, |slot| {
            if slot.attached {
                Ok(f(slot))
            } else {
                Err(status::NOT_ATTACHED)
            }
        })
    }

    fn with_channel<T>(
        &self,
        handle: DeviceHandle,
        channel: u32,
        f: impl FnOnce(&ChannelState) -> T,
    ) -> Result<T, RawStatus> {
        self.with_slot(handle, |slot| {
            if !slot.attached {
                return Err(status::NOT_ATTACHED);
            }
            slot.channels
                .get(channel as usize)
                .map(f)
                .ok_or(status::OUT_OF_BOUNDS)
        })
    }

    fn with_channel_mut(
        &self,
        handle: DeviceHandle,
        channel: u32,
        f: impl FnOnce(&mut ChannelState),
    ) -> RawStatus {
        let result = self.with_slot_mut(handle, |slot| {
            if !slot.attached {
                return Err(status::NOT_ATTACHED);
            }
            slot.channels
                .get_mut(channel as usize)
                .map(f)
                .ok_or(status::OUT_OF_BOUNDS)
        });
        status_of(result)
    }
}

/// Collapse a getter-shaped result into a command-shaped status.
fn status_of(result: Result<(), RawStatus>) -> RawStatus {
    match result {
        Ok(()) => SDK_OK,
        Err(code) => code,
    }
}

impl BridgeSdk for MockSdk {
    fn create(&self) -> Result<DeviceHandle, RawStatus> {
        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let slot = DeviceSlot {
            open_serial: None,
            attached: false,
            serial_number: 0,
            data_rate_ms: self.config.data_rate_ms,
            channels: vec![ChannelState::default(); self.config.input_count as usize],
            callbacks: CallbackSet::default(),
            sampler: None,
        };
        self.lock_state().insert(raw, slot);
        Ok(DeviceHandle::from_raw(raw))
    }

    fn open(&self, handle: DeviceHandle, serial: i32) -> RawStatus {
        status_of(self.with_slot_mut(handle, |slot| {
            if slot.open_serial.is_some() {
                return Err(status::DUPLICATE);
            }
            slot.open_serial = Some(serial);
            Ok(())
        }))
    }

    fn wait_for_attachment(&self, handle: DeviceHandle, timeout_ms: u32) -> RawStatus {
        let deadline = (timeout_ms > 0).then(|| Instant::now() + Duration::from_millis(u64::from(timeout_ms)));
        let mut state = self.lock_state();
        loop {
            match state.get(&handle.as_raw()) {
                None => return status::NOT_FOUND,
                Some(slot) if slot.open_serial.is_none() => return status::NOT_OPEN,
                Some(slot) if slot.attached => return SDK_OK,
                Some(_) => {}
            }

            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return status::TIMEOUT;
                    }
                    let (guard, _timed_out) = self
                        .attach_signal
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    guard
                }
                None => self
                    .attach_signal
                    .wait(state)
                    .unwrap_or_else(|poisoned| poisoned.into_inner()),
            };
        }
    }

    fn close(&self, handle: DeviceHandle) -> RawStatus {
        let sampler = {
            let mut state = self.lock_state();
            let Some(slot) = state.get_mut(&handle.as_raw()) else {
                return status::NOT_FOUND;
            };
            if slot.open_serial.is_none() {
                return status::NOT_OPEN;
            }
            slot.open_serial = None;
            slot.attached = false;
            slot.sampler.take()
        };
        // Join outside the lock; the thread needs it to observe the stop.
        if let Some(sampler) = sampler {
            sampler.halt();
        }
        SDK_OK
    }

    fn remove(&self, handle: DeviceHandle) -> RawStatus {
        let removed = self.lock_state().remove(&handle.as_raw());
        match removed {
            Some(slot) => {
                let DeviceSlot { sampler, callbacks, .. } = slot;
                if let Some(sampler) = sampler {
                    sampler.halt();
                }
                // Callbacks (and whatever they own) release here, after
                // the lock is gone.
                drop(callbacks);
                SDK_OK
            }
            None => status::NOT_FOUND,
        }
    }

    fn set_on_attach(&self, handle: DeviceHandle, callback: AttachCallback) -> RawStatus {
        status_of(self.with_slot_mut(handle, |slot| {
            slot.callbacks.attach = Some(callback);
            Ok(())
        }))
    }

    fn set_on_detach(&self, handle: DeviceHandle, callback: DetachCallback) -> RawStatus {
        status_of(self.with_slot_mut(handle, |slot| {
            slot.callbacks.detach = Some(callback);
            Ok(())
        }))
    }

    fn set_on_error(&self, handle: DeviceHandle, callback: ErrorCallback) -> RawStatus {
        status_of(self.with_slot_mut(handle, |slot| {
            slot.callbacks.error = Some(callback);
            Ok(())
        }))
    }

    fn set_on_data(&self, handle: DeviceHandle, callback: DataCallback) -> RawStatus {
        status_of(self.with_slot_mut(handle, |slot| {
            slot.callbacks.data = Some(callback);
            Ok(())
        }))
    }

    fn device_name(&self, handle: DeviceHandle) -> Result<String, RawStatus> {
        self.with_attached(handle, |_| self.config.device_name.clone())
    }

    fn serial_number(&self, handle: DeviceHandle) -> Result<i32, RawStatus> {
        self.with_attached(handle, |slot| slot.serial_number)
    }

    fn device_version(&self, handle: DeviceHandle) -> Result<i32, RawStatus> {
        self.with_attached(handle, |_| self.config.device_version)
    }

    fn device_status(&self, handle: DeviceHandle) -> Result<i32, RawStatus> {
        self.with_slot(handle, |slot| Ok(i32::from(slot.attached)))
    }

    fn device_type(&self, handle: DeviceHandle) -> Result<String, RawStatus> {
        self.with_attached(handle, |_| self.config.device_type.clone())
    }

    fn library_version(&self) -> Result<String, RawStatus> {
        Ok(self.config.library_version.clone())
    }

    fn input_count(&self, handle: DeviceHandle) -> Result<u32, RawStatus> {
        self.with_attached(handle, |slot| slot.channels.len() as u32)
    }

    fn bridge_value(&self, handle: DeviceHandle, channel: u32) -> Result<f64, RawStatus> {
        self.with_channel(handle, channel, |state| state.value)
    }

    fn bridge_min(&self, handle: DeviceHandle, channel: u32) -> Result<f64, RawStatus> {
        self.with_channel(handle, channel, |state| {
            constants::BRIDGE_VALUE_MIN / f64::from(state.gain_raw)
        })
    }

    fn bridge_max(&self, handle: DeviceHandle, channel: u32) -> Result<f64, RawStatus> {
        self.with_channel(handle, channel, |state| {
            constants::BRIDGE_VALUE_MAX / f64::from(state.gain_raw)
        })
    }

    fn enabled(&self, handle: DeviceHandle, channel: u32) -> Result<bool, RawStatus> {
        self.with_channel(handle, channel, |state| state.enabled)
    }

    fn set_enabled(&self, handle: DeviceHandle, channel: u32, enabled: bool) -> RawStatus {
        self.with_channel_mut(handle, channel, |state| state.enabled = enabled)
    }

    fn gain(&self, handle: DeviceHandle, channel: u32) -> Result<i32, RawStatus> {
        self.with_channel(handle, channel, |state| state.gain_raw)
    }

    fn set_gain(&self, handle: DeviceHandle, channel: u32, gain: i32) -> RawStatus {
        if BridgeGain::from_raw(gain).is_err() {
            return status::INVALID_ARG;
        }
        self.with_channel_mut(handle, channel, |state| state.gain_raw = gain)
    }

    fn data_rate(&self, handle: DeviceHandle) -> Result<u32, RawStatus> {
        self.with_attached(handle, |slot| slot.data_rate_ms)
    }

    fn set_data_rate(&self, handle: DeviceHandle, milliseconds: u32) -> RawStatus {
        if !(constants::DATA_RATE_MIN_MS..=constants::DATA_RATE_MAX_MS).contains(&milliseconds) {
            return status::OUT_OF_BOUNDS;
        }
        status_of(self.with_slot_mut(handle, |slot| {
            if !slot.attached {
                return Err(status::NOT_ATTACHED);
            }
            slot.data_rate_ms = milliseconds;
            Ok(())
        }))
    }

    fn data_rate_min(&self, handle: DeviceHandle) -> Result<u32, RawStatus> {
        self.with_attached(handle, |_| constants::DATA_RATE_MIN_MS)
    }

    fn data_rate_max(&self, handle: DeviceHandle) -> Result<u32, RawStatus> {
        self.with_attached(handle, |_| constants::DATA_RATE_MAX_MS)
    }

    fn error_description(&self, code: RawStatus) -> String {
        match code {
            SDK_OK => "Success".to_string(),
            status::NOT_FOUND => "Device not found".to_string(),
            status::INVALID_ARG => "Invalid argument".to_string(),
            status::NOT_ATTACHED => "Device not attached".to_string(),
            status::TIMEOUT => "Operation timed out".to_string(),
            status::OUT_OF_BOUNDS => "Index out of bounds".to_string(),
            status::DUPLICATE => "Device already open".to_string(),
            status::NOT_OPEN => "Device not open".to_string(),
            other => format!("Unknown error code {other}"),
        }
    }
}
