//! The simulation driver: plays the physical world and the SDK's worker
//! threads.

use super::sdk::{MockSdk, Sampler};
use loadbridge_core::{DeviceHandle, constants};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

/// Drives a [`MockSdk`] from test or application code.
///
/// Every method that fires an SDK callback does so synchronously on the
/// calling thread, after releasing the simulation's internal lock — the
/// caller is the SDK worker thread for that delivery. That makes
/// multi-threaded callback scenarios trivial to stage: spawn threads,
/// have each drive the handle.
///
/// [`start_sampling`](Self::start_sampling) goes further and runs a real
/// OS thread per device that emits data callbacks at the configured
/// rate, like the streaming engine inside a vendor SDK.
///
/// # Teardown
///
/// [`shutdown`](Self::shutdown) stops and joins every sampling thread,
/// then drops every registered callback. When it returns, no callback
/// will fire again — the required order for tearing down whatever the
/// callbacks feed.
#[derive(Clone)]
pub struct MockSdkHandle {
    sdk: Arc<MockSdk>,
}

impl MockSdkHandle {
    pub(super) fn new(sdk: Arc<MockSdk>) -> Self {
        Self { sdk }
    }

    /// Plug in a simulated device with the given serial number.
    ///
    /// Binds to the lowest-handle open instance whose requested serial
    /// matches (exactly, or via the any-serial wildcard), marks it
    /// attached, wakes attachment waiters, and fires the attach
    /// callback. Returns the bound handle, or `None` if no open
    /// instance matches.
    pub fn attach(&self, serial: i32) -> Option<DeviceHandle> {
        let (handle, callback) = {
            let mut state = self.sdk.lock_state();
            let (raw, slot) = state
                .iter_mut()
                .filter(|(_, slot)| {
                    !slot.attached
                        && matches!(
                            slot.open_serial,
                            Some(requested) if requested == serial || requested == constants::SERIAL_ANY
                        )
                })
                .min_by_key(|(raw, _)| **raw)?;
            slot.attached = true;
            slot.serial_number = serial;
            (DeviceHandle::from_raw(*raw), slot.callbacks.attach.clone())
        };

        self.sdk.notify_attach_waiters();
        if let Some(callback) = callback {
            callback(handle);
        }
        Some(handle)
    }

    /// Unplug a simulated device, firing the detach callback.
    ///
    /// Returns `false` if the handle is unknown or not attached.
    pub fn detach(&self, handle: DeviceHandle) -> bool {
        let callback = {
            let mut state = self.sdk.lock_state();
            let Some(slot) = state.get_mut(&handle.as_raw()) else {
                return false;
            };
            if !slot.attached {
                return false;
            }
            slot.attached = false;
            slot.callbacks.detach.clone()
        };

        if let Some(callback) = callback {
            callback(handle);
        }
        true
    }

    /// Report an asynchronous device fault, firing the error callback
    /// with the code and its text.
    ///
    /// Returns `false` if the handle is unknown.
    pub fn raise_error(&self, handle: DeviceHandle, code: i32, message: &str) -> bool {
        let callback = {
            let state = self.sdk.lock_state();
            let Some(slot) = state.get(&handle.as_raw()) else {
                return false;
            };
            slot.callbacks.error.clone()
        };

        if let Some(callback) = callback {
            callback(handle, code, message);
        }
        true
    }

    /// Deliver one sample on a channel, firing the data callback.
    ///
    /// Also records the value as the channel's latest reading, so a
    /// subsequent value query agrees with the event. Returns `false` if
    /// the handle is unknown, the device is detached, or the channel is
    /// out of range.
    pub fn push_sample(&self, handle: DeviceHandle, channel: u32, value: f64) -> bool {
        let callback = {
            let mut state = self.sdk.lock_state();
            let Some(slot) = state.get_mut(&handle.as_raw()) else {
                return false;
            };
            if !slot.attached {
                return false;
            }
            let Some(channel_state) = slot.channels.get_mut(channel as usize) else {
                return false;
            };
            channel_state.value = value;
            slot.callbacks.data.clone()
        };

        if let Some(callback) = callback {
            callback(handle, channel, value);
        }
        true
    }

    /// Set a channel's latest reading without firing any callback.
    ///
    /// The sampling thread and value queries pick the new reading up.
    pub fn set_channel_value(&self, handle: DeviceHandle, channel: u32, value: f64) -> bool {
        let mut state = self.sdk.lock_state();
        let Some(slot) = state.get_mut(&handle.as_raw()) else {
            return false;
        };
        match slot.channels.get_mut(channel as usize) {
            Some(channel_state) => {
                channel_state.value = value;
                true
            }
            None => false,
        }
    }

    /// Start the device's sampling thread.
    ///
    /// The thread emits a data callback for every enabled channel once
    /// per configured sampling interval, until stopped, the device is
    /// removed, or the SDK itself is dropped. Returns `false` if the
    /// device is unknown, detached, or already sampling.
    pub fn start_sampling(&self, handle: DeviceHandle) -> bool {
        let raw = handle.as_raw();
        let mut state = self.sdk.lock_state();
        let Some(slot) = state.get_mut(&raw) else {
            return false;
        };
        if !slot.attached || slot.sampler.is_some() {
            return false;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let sdk = Arc::downgrade(&self.sdk);
            let stop = Arc::clone(&stop);
            thread::spawn(move || sampling_loop(sdk, raw, stop))
        };
        slot.sampler = Some(Sampler { stop, thread });
        true
    }

    /// Stop and join the device's sampling thread.
    ///
    /// Returns `false` if none was running.
    pub fn stop_sampling(&self, handle: DeviceHandle) -> bool {
        let sampler = {
            let mut state = self.sdk.lock_state();
            match state.get_mut(&handle.as_raw()) {
                Some(slot) => slot.sampler.take(),
                None => None,
            }
        };
        match sampler {
            Some(sampler) => {
                sampler.halt();
                true
            }
            None => false,
        }
    }

    /// Stop every sampling thread, then drop every registered callback.
    ///
    /// After this returns no callback fires again, so anything the
    /// callbacks fed — an event queue, say — can be torn down safely.
    pub fn shutdown(&self) {
        let samplers: Vec<Sampler> = {
            let mut state = self.sdk.lock_state();
            state
                .values_mut()
                .filter_map(|slot| slot.sampler.take())
                .collect()
        };
        for sampler in samplers {
            sampler.halt();
        }

        let callbacks: Vec<_> = {
            let mut state = self.sdk.lock_state();
            state
                .values_mut()
                .map(|slot| std::mem::take(&mut slot.callbacks))
                .collect()
        };
        // Dropped outside the lock: releasing a callback releases
        // whatever it captured, and that must not run under our mutex.
        drop(callbacks);
    }
}

/// Body of a device's sampling thread.
fn sampling_loop(sdk: Weak<MockSdk>, raw: u64, stop: Arc<AtomicBool>) {
    let handle = DeviceHandle::from_raw(raw);
    while !stop.load(Ordering::Relaxed) {
        let Some(sdk) = sdk.upgrade() else { break };
        let Some((interval, callback, emissions)) = sdk.sampler_tick(raw) else {
            // Device removed out from under us.
            break;
        };
        drop(sdk);

        if let Some(callback) = callback {
            for (channel, value) in emissions {
                if stop.load(Ordering::Relaxed) {
                    return;
                }
                callback(handle, channel, value);
            }
        }
        thread::sleep(interval);
    }
}
