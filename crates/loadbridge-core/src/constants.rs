//! Device-family constants for the bridge interface.
//!
//! These values describe the measurement hardware this workspace targets:
//! a four-input Wheatstone bridge interface that streams ratiometric
//! samples (millivolts per volt) at a configurable rate. They are the
//! defaults the mock SDK simulates and the bounds the command facade
//! documents; a real SDK backend would report its own via the metadata
//! getters.

// ============================================================================
// Channel Layout
// ============================================================================

/// Number of bridge inputs on a device.
///
/// Channel indices in events and commands are `0..INPUT_COUNT`.
pub const INPUT_COUNT: u32 = 4;

// ============================================================================
// Sampling Rate
// ============================================================================

/// Fastest supported sampling interval (milliseconds).
pub const DATA_RATE_MIN_MS: u32 = 8;

/// Slowest supported sampling interval (milliseconds).
pub const DATA_RATE_MAX_MS: u32 = 1000;

/// Sampling interval a device starts with (milliseconds).
pub const DEFAULT_DATA_RATE_MS: u32 = 8;

// ============================================================================
// Measurement Range
// ============================================================================

/// Lower bound of the unamplified measurement range (mV/V).
///
/// With gain applied, the usable range narrows to
/// `BRIDGE_VALUE_MIN / gain`.
pub const BRIDGE_VALUE_MIN: f64 = -1000.0;

/// Upper bound of the unamplified measurement range (mV/V).
///
/// With gain applied, the usable range narrows to
/// `BRIDGE_VALUE_MAX / gain`.
pub const BRIDGE_VALUE_MAX: f64 = 1000.0;

// ============================================================================
// Device Addressing
// ============================================================================

/// Serial number wildcard: open whichever matching device attaches first.
pub const SERIAL_ANY: i32 = -1;
