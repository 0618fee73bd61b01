//! In-process simulation of the vendor SDK.
//!
//! [`MockSdk`] implements [`BridgeSdk`](crate::sdk::BridgeSdk) without
//! hardware, and [`MockSdkHandle`] drives the simulation: attaching and
//! detaching devices, raising faults, injecting samples, and running a
//! per-device sampling thread. Handle methods invoke the registered SDK
//! callbacks synchronously **on the calling thread**, so a test thread
//! (or the sampling thread) plays the role of an SDK worker thread
//! exactly.
//!
//! # Example
//!
//! ```
//! use loadbridge_hardware::mock::MockSdk;
//! use loadbridge_hardware::sdk::BridgeSdk;
//!
//! let (sdk, sim) = MockSdk::new();
//! let handle = sdk.create().unwrap();
//! assert_eq!(sdk.open(handle, -1), loadbridge_hardware::SDK_OK);
//!
//! // Plug in a simulated device with serial 1234.
//! let attached = sim.attach(1234).unwrap();
//! assert_eq!(attached, handle);
//! assert_eq!(sdk.serial_number(handle), Ok(1234));
//!
//! sim.shutdown();
//! ```

mod handle;
mod sdk;

pub use handle::MockSdkHandle;
pub use sdk::{MockSdk, MockSdkConfig};

/// Status codes the mock SDK reports, mirroring the flat constants of a
/// C SDK header. Descriptions come from
/// [`BridgeSdk::error_description`](crate::sdk::BridgeSdk::error_description).
pub mod status {
    use crate::sdk::RawStatus;

    /// No device instance exists for the handle.
    pub const NOT_FOUND: RawStatus = 1;

    /// An argument value is outside its domain.
    pub const INVALID_ARG: RawStatus = 2;

    /// The operation needs attached hardware and none is.
    pub const NOT_ATTACHED: RawStatus = 3;

    /// A wait elapsed without the awaited condition.
    pub const TIMEOUT: RawStatus = 4;

    /// A channel index is past the device's input count.
    pub const OUT_OF_BOUNDS: RawStatus = 5;

    /// The instance is already open.
    pub const DUPLICATE: RawStatus = 6;

    /// The operation needs an open instance and this one is not.
    pub const NOT_OPEN: RawStatus = 7;
}
