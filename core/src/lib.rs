// Permkit Core — Mobile Permission State
//
// "What is the status of this permission, and may I ask the user for it?"
//
// Everything else is the OS's job.

pub mod binding;
pub mod consolidate;
pub mod controller;
pub mod hook;
pub mod lifecycle;
pub mod resolver;
pub mod simulated;
pub mod types;

use thiserror::Error;

pub use binding::PermissionBinding;
pub use consolidate::consolidate;
pub use controller::PermissionController;
pub use hook::PermissionHook;
pub use lifecycle::{AppLifecycle, AppState, ForegroundWatcher};
pub use resolver::{resolve, DeviceInfo, PermissionId, Platform};
pub use simulated::{SimulatedBinding, SimulatedLifecycle};
pub use types::{PermissionStatus, PermissionType, RawPermissionResult};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors surfaced by permission operations
///
/// The crate defines no taxonomy of its own beyond what the platform
/// binding reports; binding failures pass through `check`/`request`
/// untranslated. A request on a non-requestable status is a no-op, not
/// an error.
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    /// The platform binding rejected the call
    #[error("platform binding error: {0}")]
    Binding(String),
    /// The permission API is not available in this context
    #[error("permission API unavailable: {0}")]
    Unavailable(String),
}
