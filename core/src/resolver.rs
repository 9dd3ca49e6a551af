//! Permission identifier resolution
//!
//! Maps a logical [`PermissionType`] onto the concrete OS-level permission
//! identifiers that must be checked or requested on a given device. The
//! table is static; the only inputs are the permission type, the platform,
//! the Android API level, and whether we are on the iOS simulator.

use crate::types::PermissionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PLATFORM & DEVICE
// ============================================================================

/// Target mobile platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Ios,
    Android,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ios => f.write_str("ios"),
            Self::Android => f.write_str("android"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Device facts the resolver branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Target platform
    pub platform: Platform,
    /// Android API level; unused on iOS
    pub api_level: u32,
    /// Whether this is the iOS simulator (no Bluetooth hardware)
    pub is_simulator: bool,
}

impl DeviceInfo {
    /// Device info for an Android device at the given API level
    pub fn android(api_level: u32) -> Self {
        Self {
            platform: Platform::Android,
            api_level,
            is_simulator: false,
        }
    }

    /// Device info for a physical iOS device
    pub fn ios() -> Self {
        Self {
            platform: Platform::Ios,
            api_level: 0,
            is_simulator: false,
        }
    }

    /// Device info for the iOS simulator
    pub fn ios_simulator() -> Self {
        Self {
            platform: Platform::Ios,
            api_level: 0,
            is_simulator: true,
        }
    }
}

// ============================================================================
// PERMISSION IDENTIFIERS
// ============================================================================

/// Concrete OS-level permission identifier
///
/// The closed set of identifiers this crate ever checks or requests.
/// `as_str()` yields the canonical dotted token the platform permission
/// API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionId {
    IosBluetooth,
    IosCamera,
    IosLocationWhenInUse,
    IosLocationAlways,
    IosPhotoLibrary,
    AndroidAccessCoarseLocation,
    AndroidAccessFineLocation,
    AndroidBluetoothScan,
    AndroidBluetoothConnect,
    AndroidCamera,
    AndroidReadMediaImages,
    AndroidReadMediaVisualUserSelected,
    AndroidReadExternalStorage,
}

impl PermissionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IosBluetooth => "ios.permission.BLUETOOTH",
            Self::IosCamera => "ios.permission.CAMERA",
            Self::IosLocationWhenInUse => "ios.permission.LOCATION_WHEN_IN_USE",
            Self::IosLocationAlways => "ios.permission.LOCATION_ALWAYS",
            Self::IosPhotoLibrary => "ios.permission.PHOTO_LIBRARY",
            Self::AndroidAccessCoarseLocation => "android.permission.ACCESS_COARSE_LOCATION",
            Self::AndroidAccessFineLocation => "android.permission.ACCESS_FINE_LOCATION",
            Self::AndroidBluetoothScan => "android.permission.BLUETOOTH_SCAN",
            Self::AndroidBluetoothConnect => "android.permission.BLUETOOTH_CONNECT",
            Self::AndroidCamera => "android.permission.CAMERA",
            Self::AndroidReadMediaImages => "android.permission.READ_MEDIA_IMAGES",
            Self::AndroidReadMediaVisualUserSelected => {
                "android.permission.READ_MEDIA_VISUAL_USER_SELECTED"
            }
            Self::AndroidReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
        }
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios.permission.BLUETOOTH" => Ok(Self::IosBluetooth),
            "ios.permission.CAMERA" => Ok(Self::IosCamera),
            "ios.permission.LOCATION_WHEN_IN_USE" => Ok(Self::IosLocationWhenInUse),
            "ios.permission.LOCATION_ALWAYS" => Ok(Self::IosLocationAlways),
            "ios.permission.PHOTO_LIBRARY" => Ok(Self::IosPhotoLibrary),
            "android.permission.ACCESS_COARSE_LOCATION" => Ok(Self::AndroidAccessCoarseLocation),
            "android.permission.ACCESS_FINE_LOCATION" => Ok(Self::AndroidAccessFineLocation),
            "android.permission.BLUETOOTH_SCAN" => Ok(Self::AndroidBluetoothScan),
            "android.permission.BLUETOOTH_CONNECT" => Ok(Self::AndroidBluetoothConnect),
            "android.permission.CAMERA" => Ok(Self::AndroidCamera),
            "android.permission.READ_MEDIA_IMAGES" => Ok(Self::AndroidReadMediaImages),
            "android.permission.READ_MEDIA_VISUAL_USER_SELECTED" => {
                Ok(Self::AndroidReadMediaVisualUserSelected)
            }
            "android.permission.READ_EXTERNAL_STORAGE" => Ok(Self::AndroidReadExternalStorage),
            other => Err(format!("unknown permission identifier: {other}")),
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolve the OS-level identifiers required for `permission` on `device`
///
/// Deterministic and side-effect free. An empty result means no permission
/// check is required and the permission is treated as granted.
pub fn resolve(permission: PermissionType, device: &DeviceInfo) -> Vec<PermissionId> {
    use PermissionId::*;

    match (permission, device.platform) {
        // The simulator has no Bluetooth hardware; treat as always granted.
        (PermissionType::Bluetooth, Platform::Ios) => {
            if device.is_simulator {
                Vec::new()
            } else {
                vec![IosBluetooth]
            }
        }

        // Android 12 (API 31) split Bluetooth into dedicated scan/connect
        // runtime permissions; older releases gate it behind fine location.
        (PermissionType::Bluetooth, Platform::Android) => {
            if device.api_level >= 31 {
                vec![AndroidAccessFineLocation, AndroidBluetoothScan, AndroidBluetoothConnect]
            } else {
                vec![AndroidAccessFineLocation]
            }
        }

        (PermissionType::Camera, Platform::Ios) => vec![IosCamera],
        (PermissionType::Camera, Platform::Android) => vec![AndroidCamera],

        (PermissionType::Location, Platform::Ios) => vec![IosLocationWhenInUse],
        (PermissionType::Location, Platform::Android) => {
            vec![AndroidAccessCoarseLocation, AndroidAccessFineLocation]
        }

        (PermissionType::PhotoLibrary, Platform::Ios) => vec![IosPhotoLibrary],

        // API 34 added partial photo access, API 33 split media reads out of
        // external storage.
        (PermissionType::PhotoLibrary, Platform::Android) => {
            if device.api_level >= 34 {
                vec![AndroidReadMediaImages, AndroidReadMediaVisualUserSelected]
            } else if device.api_level >= 33 {
                vec![AndroidReadMediaImages]
            } else {
                vec![AndroidReadExternalStorage]
            }
        }

        // Wi-Fi scanning is location-gated at the OS level on both platforms.
        (PermissionType::Wifi, Platform::Ios) => vec![IosLocationWhenInUse],
        (PermissionType::Wifi, Platform::Android) => vec![AndroidAccessFineLocation],
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use PermissionId::*;

    #[test]
    fn test_bluetooth_ios_simulator_is_empty() {
        let ids = resolve(PermissionType::Bluetooth, &DeviceInfo::ios_simulator());
        assert!(ids.is_empty());
    }

    #[test]
    fn test_bluetooth_ios_device() {
        let ids = resolve(PermissionType::Bluetooth, &DeviceInfo::ios());
        assert_eq!(ids, vec![IosBluetooth]);
    }

    #[test]
    fn test_bluetooth_android_api_31() {
        let ids = resolve(PermissionType::Bluetooth, &DeviceInfo::android(31));
        assert_eq!(
            ids,
            vec![AndroidAccessFineLocation, AndroidBluetoothScan, AndroidBluetoothConnect]
        );
    }

    #[test]
    fn test_bluetooth_android_api_30_legacy() {
        let ids = resolve(PermissionType::Bluetooth, &DeviceInfo::android(30));
        assert_eq!(ids, vec![AndroidAccessFineLocation]);
    }

    #[test]
    fn test_photo_library_android_api_34() {
        let ids = resolve(PermissionType::PhotoLibrary, &DeviceInfo::android(34));
        assert_eq!(ids, vec![AndroidReadMediaImages, AndroidReadMediaVisualUserSelected]);
    }

    #[test]
    fn test_photo_library_android_api_33() {
        let ids = resolve(PermissionType::PhotoLibrary, &DeviceInfo::android(33));
        assert_eq!(ids, vec![AndroidReadMediaImages]);
    }

    #[test]
    fn test_photo_library_android_legacy_storage() {
        let ids = resolve(PermissionType::PhotoLibrary, &DeviceInfo::android(28));
        assert_eq!(ids, vec![AndroidReadExternalStorage]);
    }

    #[test]
    fn test_wifi_is_location_gated() {
        assert_eq!(
            resolve(PermissionType::Wifi, &DeviceInfo::ios()),
            vec![IosLocationWhenInUse]
        );
        assert_eq!(
            resolve(PermissionType::Wifi, &DeviceInfo::android(33)),
            vec![AndroidAccessFineLocation]
        );
    }

    #[test]
    fn test_location_android_requires_coarse_and_fine() {
        let ids = resolve(PermissionType::Location, &DeviceInfo::android(33));
        assert_eq!(ids, vec![AndroidAccessCoarseLocation, AndroidAccessFineLocation]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let device = DeviceInfo::android(34);
        for permission in PermissionType::ALL {
            assert_eq!(resolve(permission, &device), resolve(permission, &device));
        }
    }

    #[test]
    fn test_identifier_roundtrip() {
        let device = DeviceInfo::android(34);
        for permission in PermissionType::ALL {
            for id in resolve(permission, &device) {
                assert_eq!(id.as_str().parse(), Ok(id));
            }
        }
    }
}
