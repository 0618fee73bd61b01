use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for one bridge device instance.
///
/// Handles are minted by the device SDK when an instance is created and
/// stay stable for the instance's lifetime; they are never reused while
/// the device is open. The event core routes on the handle alone and
/// never dereferences it — only the command facade maps a handle back to
/// a live SDK resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceHandle(u64);

impl DeviceHandle {
    /// Wrap a raw SDK identifier.
    pub const fn from_raw(raw: u64) -> Self {
        DeviceHandle(raw)
    }

    /// Get the raw identifier value.
    #[must_use]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attachment state reported by the device SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// No physical device is bound to the handle.
    Detached,

    /// A physical device is bound and responding.
    Attached,
}

impl DeviceStatus {
    /// Decode the SDK's raw status integer (0 = detached, 1 = attached).
    ///
    /// # Errors
    /// Returns `Error::InvalidStatus` for any other value.
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(DeviceStatus::Detached),
            1 => Ok(DeviceStatus::Attached),
            other => Err(Error::InvalidStatus(other)),
        }
    }

    /// Encode as the SDK's raw status integer.
    #[must_use]
    pub fn as_raw(&self) -> i32 {
        match self {
            DeviceStatus::Detached => 0,
            DeviceStatus::Attached => 1,
        }
    }

    /// Whether a physical device is currently bound.
    pub fn is_attached(&self) -> bool {
        matches!(self, DeviceStatus::Attached)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceStatus::Detached => write!(f, "detached"),
            DeviceStatus::Attached => write!(f, "attached"),
        }
    }
}

/// Programmable amplification step for one bridge input.
///
/// Higher gain trades measurement range for resolution: the usable range
/// is the unamplified range divided by the gain factor. The factor itself
/// is opaque to the event core; it only matters to the command facade and
/// whoever interprets the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeGain {
    /// 1x — full range, lowest resolution.
    G1,

    /// 8x amplification.
    G8,

    /// 16x amplification.
    G16,

    /// 32x amplification.
    G32,

    /// 64x amplification.
    G64,

    /// 128x — narrowest range, highest resolution.
    G128,
}

impl BridgeGain {
    /// All supported gain steps, lowest first.
    pub const ALL: [BridgeGain; 6] = [
        BridgeGain::G1,
        BridgeGain::G8,
        BridgeGain::G16,
        BridgeGain::G32,
        BridgeGain::G64,
        BridgeGain::G128,
    ];

    /// Decode the SDK's raw gain integer (the amplification factor).
    ///
    /// # Errors
    /// Returns `Error::InvalidGain` if the value is not a supported step.
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            1 => Ok(BridgeGain::G1),
            8 => Ok(BridgeGain::G8),
            16 => Ok(BridgeGain::G16),
            32 => Ok(BridgeGain::G32),
            64 => Ok(BridgeGain::G64),
            128 => Ok(BridgeGain::G128),
            other => Err(Error::InvalidGain(other)),
        }
    }

    /// Encode as the SDK's raw gain integer.
    #[must_use]
    pub fn as_raw(&self) -> i32 {
        self.factor() as i32
    }

    /// The amplification factor this step applies.
    #[must_use]
    pub fn factor(&self) -> u32 {
        match self {
            BridgeGain::G1 => 1,
            BridgeGain::G8 => 8,
            BridgeGain::G16 => 16,
            BridgeGain::G32 => 32,
            BridgeGain::G64 => 64,
            BridgeGain::G128 => 128,
        }
    }
}

impl Default for BridgeGain {
    fn default() -> Self {
        BridgeGain::G1
    }
}

impl fmt::Display for BridgeGain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}
