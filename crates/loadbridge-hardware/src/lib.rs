//! Device SDK boundary and command facade for bridge interface devices.
//!
//! This crate sits on both sides of the vendor SDK line:
//!
//! - [`sdk::BridgeSdk`] models the external device SDK exactly as a C
//!   library presents itself — synchronous calls returning raw status
//!   codes, callback registration points invoked from worker threads the
//!   SDK owns, and a status-code-to-text lookup.
//! - [`bridge::Bridge`] is the host-facing facade: thin synchronous
//!   wrappers over every SDK control call, with uniform translation of
//!   nonzero status codes into described errors, plus the wiring that
//!   routes SDK callbacks into a [`loadbridge_events`] sink at creation.
//! - [`mock`] is an in-process SDK implementation whose producer threads
//!   are real OS threads, for development and tests without hardware.
//!
//! # Example
//!
//! ```
//! use loadbridge_events::event_channel;
//! use loadbridge_hardware::{Bridge, mock::MockSdk};
//!
//! # fn main() -> loadbridge_core::Result<()> {
//! let (sdk, sim) = MockSdk::new();
//! let (sink, _dispatcher) = event_channel();
//!
//! let bridge = Bridge::create(sdk, &sink)?;
//! bridge.open_any()?;
//!
//! sim.attach(45071).expect("open instance should match");
//! assert_eq!(bridge.serial_number()?, 45071);
//!
//! bridge.close()?;
//! sim.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod mock;
pub mod sdk;
pub mod types;

// Re-export commonly used types for convenience
pub use bridge::{Bridge, library_version};
pub use mock::{MockSdk, MockSdkConfig, MockSdkHandle};
pub use sdk::{
    AttachCallback, BridgeSdk, DataCallback, DetachCallback, ErrorCallback, RawStatus, SDK_OK,
};
pub use types::BridgeInfo;
