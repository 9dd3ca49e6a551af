//! Core permission vocabulary
//!
//! The logical permission categories the app reasons about, the raw
//! per-identifier results the platform binding reports, and the single
//! consolidated status this crate derives from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PERMISSION TYPE
// ============================================================================

/// Logical permission category understood by the app
///
/// One logical type may map to several OS-level permission identifiers;
/// see [`crate::resolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionType {
    /// Bluetooth scanning and connecting
    Bluetooth,
    /// Camera capture
    Camera,
    /// Device location (when-in-use)
    Location,
    /// Reading images from the photo library
    PhotoLibrary,
    /// Wi-Fi network scanning (location-gated on both platforms)
    Wifi,
}

impl PermissionType {
    /// All logical permission types, in declaration order
    pub const ALL: [PermissionType; 5] = [
        PermissionType::Bluetooth,
        PermissionType::Camera,
        PermissionType::Location,
        PermissionType::PhotoLibrary,
        PermissionType::Wifi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bluetooth => "bluetooth",
            Self::Camera => "camera",
            Self::Location => "location",
            Self::PhotoLibrary => "photo-library",
            Self::Wifi => "wifi",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bluetooth" => Ok(Self::Bluetooth),
            "camera" => Ok(Self::Camera),
            "location" => Ok(Self::Location),
            "photo-library" => Ok(Self::PhotoLibrary),
            "wifi" => Ok(Self::Wifi),
            other => Err(format!("unknown permission type: {other}")),
        }
    }
}

// ============================================================================
// RAW RESULT
// ============================================================================

/// Per-identifier outcome reported by the platform permission binding
///
/// Produced only by a [`crate::binding::PermissionBinding`]; the controller
/// never fabricates raw results of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawPermissionResult {
    /// The permission is granted
    Granted,
    /// Not yet requested, or denied but still requestable
    Denied,
    /// Permanently denied; only the OS settings screen can change it
    Blocked,
    /// Granted with restrictions (e.g. partial photo access)
    Limited,
    /// The feature is not available on this device/context
    Unavailable,
}

impl RawPermissionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Blocked => "blocked",
            Self::Limited => "limited",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for RawPermissionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RawPermissionResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "blocked" => Ok(Self::Blocked),
            "limited" => Ok(Self::Limited),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(format!("unknown raw permission result: {other}")),
        }
    }
}

// ============================================================================
// CONSOLIDATED STATUS
// ============================================================================

/// Single consolidated status for one logical permission type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// No check has completed yet
    Initialising,
    /// Every required identifier is granted (or granted with limits)
    Granted,
    /// At least one identifier is denied but can still be requested
    Requestable,
    /// At least one identifier is permanently denied or unavailable;
    /// only the OS settings screen can recover from here
    Blocked,
}

impl PermissionStatus {
    pub fn is_initialising(&self) -> bool {
        matches!(self, Self::Initialising)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    pub fn is_requestable(&self) -> bool {
        matches!(self, Self::Requestable)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialising => "initialising",
            Self::Granted => "granted",
            Self::Requestable => "requestable",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
