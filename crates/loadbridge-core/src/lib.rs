//! Shared vocabulary for the loadbridge workspace.
//!
//! This crate defines the types every other loadbridge crate speaks in:
//! the opaque [`DeviceHandle`] that identifies one bridge device instance,
//! the [`BridgeGain`] and [`DeviceStatus`] domains, device-family constants,
//! and the workspace-wide [`Error`]/[`Result`] pair.
//!
//! Nothing in here touches a device or a thread; it is pure data.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
