//! Metadata snapshot types for bridge devices.

use loadbridge_core::DeviceStatus;
use serde::{Deserialize, Serialize};

/// Identity and status of an attached bridge device, gathered in one
/// round of metadata queries.
///
/// Built by [`Bridge::info`](crate::bridge::Bridge::info); handy for
/// logging a device banner or exporting an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeInfo {
    /// Product name (e.g., "4-Input Bridge").
    pub name: String,

    /// Device family name.
    pub device_type: String,

    /// Serial number of the attached hardware.
    pub serial_number: i32,

    /// Firmware version.
    pub version: i32,

    /// Attachment status at query time.
    pub status: DeviceStatus,

    /// Number of bridge inputs.
    pub input_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_info_serialization() {
        let info = BridgeInfo {
            name: "4-Input Bridge".to_string(),
            device_type: "Bridge".to_string(),
            serial_number: 45071,
            version: 102,
            status: DeviceStatus::Attached,
            input_count: 4,
        };

        let json = serde_json::to_string(&info).unwrap();
        let deserialized: BridgeInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, deserialized);
    }
}
