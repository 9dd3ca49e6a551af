//! Permission state controller
//!
//! Owns the consolidated status for one logical permission type and drives
//! the platform binding. `check` and `request` are the only paths that
//! mutate the status; a request in flight suppresses checks so a
//! foreground transition fired by the system prompt cannot clobber the
//! status with a stale read.

use crate::binding::PermissionBinding;
use crate::consolidate::consolidate;
use crate::resolver::{resolve, DeviceInfo, Platform, PermissionId};
use crate::types::{PermissionStatus, PermissionType};
use crate::PermissionError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Stateful controller for one logical permission type
///
/// The status starts as [`PermissionStatus::Initialising`] and only moves
/// via [`check`](Self::check) and [`request`](Self::request). Observers get
/// snapshots from [`status`](Self::status); nothing outside the controller
/// ever holds a mutable alias.
pub struct PermissionController {
    /// Bound permission type; `None` leaves the controller inert
    permission: Option<PermissionType>,
    /// Device facts used for identifier resolution
    device: DeviceInfo,
    /// Platform permission binding
    binding: Arc<dyn PermissionBinding>,
    /// Current consolidated status
    status: RwLock<PermissionStatus>,
    /// Whether a request is currently in flight
    requesting: AtomicBool,
}

impl PermissionController {
    pub fn new(
        permission: Option<PermissionType>,
        device: DeviceInfo,
        binding: Arc<dyn PermissionBinding>,
    ) -> Self {
        Self {
            permission,
            device,
            binding,
            status: RwLock::new(PermissionStatus::Initialising),
            requesting: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current consolidated status
    pub fn status(&self) -> PermissionStatus {
        *self.status.read()
    }

    /// Bound permission type, if any
    pub fn permission(&self) -> Option<PermissionType> {
        self.permission
    }

    fn store(&self, status: PermissionStatus) {
        *self.status.write() = status;
    }

    /// Re-evaluate the permission status against the OS
    ///
    /// Returns the stored status without touching the binding while a
    /// request is in flight: on Android the system prompt can bounce the
    /// app through a foreground transition, and a check racing the pending
    /// request would read the pre-answer state. Binding errors propagate
    /// to the caller unchanged.
    pub async fn check(&self) -> Result<PermissionStatus, PermissionError> {
        let Some(permission) = self.permission else {
            return Ok(PermissionStatus::Initialising);
        };

        if self.requesting.load(Ordering::Acquire) {
            debug!(%permission, "check suppressed: request in flight");
            return Ok(self.status());
        }

        let ids = resolve(permission, &self.device);
        if ids.is_empty() {
            self.store(PermissionStatus::Granted);
            return Ok(PermissionStatus::Granted);
        }

        let results = self.binding.check_many(&ids).await?;
        let status = consolidate(&results.into_values().collect::<Vec<_>>());
        debug!(%permission, %status, "permission checked");
        self.store(status);

        Ok(status)
    }

    /// Prompt the user for the permission
    ///
    /// A no-op returning the stored status unless the current status is
    /// [`PermissionStatus::Requestable`]: blocked permissions cannot be
    /// re-prompted and granted ones need no prompt. The in-flight flag is
    /// cleared on every exit, including binding errors, so a failed
    /// request cannot wedge future checks.
    pub async fn request(&self) -> Result<PermissionStatus, PermissionError> {
        let Some(permission) = self.permission else {
            return Ok(self.status());
        };

        if self.status() != PermissionStatus::Requestable {
            debug!(%permission, status = %self.status(), "request skipped: not requestable");
            return Ok(self.status());
        }

        self.requesting.store(true, Ordering::Release);
        let outcome = self.request_inner(permission).await;
        self.requesting.store(false, Ordering::Release);

        outcome
    }

    async fn request_inner(
        &self,
        permission: PermissionType,
    ) -> Result<PermissionStatus, PermissionError> {
        let mut ids = resolve(permission, &self.device);

        // On iOS, requesting LOCATION_ALWAYS also grants the usual
        // LOCATION_WHEN_IN_USE permission, so ask for the stronger variant.
        if self.device.platform == Platform::Ios && permission == PermissionType::Location {
            ids = vec![PermissionId::IosLocationAlways];
        }

        if ids.is_empty() {
            self.store(PermissionStatus::Granted);
            return Ok(PermissionStatus::Granted);
        }

        let results = self.binding.request_many(&ids).await?;
        let status = consolidate(&results.into_values().collect::<Vec<_>>());
        debug!(%permission, %status, "permission requested");
        self.store(status);

        Ok(status)
    }

    /// Open the OS settings screen for this app
    ///
    /// The only recourse once a permission is blocked.
    pub async fn open_settings(&self) -> Result<(), PermissionError> {
        self.binding.open_settings().await
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedBinding;
    use crate::types::RawPermissionResult;

    fn controller_for(
        permission: PermissionType,
        device: DeviceInfo,
    ) -> (PermissionController, Arc<SimulatedBinding>) {
        let binding = Arc::new(SimulatedBinding::new());
        let controller =
            PermissionController::new(Some(permission), device, binding.clone());
        (controller, binding)
    }

    #[tokio::test]
    async fn test_unbound_controller_stays_initialising() {
        let binding = Arc::new(SimulatedBinding::new());
        let controller =
            PermissionController::new(None, DeviceInfo::android(33), binding.clone());

        assert_eq!(controller.check().await.unwrap(), PermissionStatus::Initialising);
        assert_eq!(controller.request().await.unwrap(), PermissionStatus::Initialising);
        assert_eq!(binding.check_calls(), 0);
        assert_eq!(binding.request_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_all_denied_is_requestable() {
        let (controller, _binding) =
            controller_for(PermissionType::Location, DeviceInfo::android(33));

        assert_eq!(controller.status(), PermissionStatus::Initialising);
        assert_eq!(controller.check().await.unwrap(), PermissionStatus::Requestable);
        assert_eq!(controller.status(), PermissionStatus::Requestable);
    }

    #[tokio::test]
    async fn test_check_empty_identifier_list_is_granted() {
        // Bluetooth on the iOS simulator resolves to no identifiers.
        let (controller, binding) =
            controller_for(PermissionType::Bluetooth, DeviceInfo::ios_simulator());

        assert_eq!(controller.check().await.unwrap(), PermissionStatus::Granted);
        assert_eq!(binding.check_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_blocked_identifier_blocks() {
        let (controller, binding) =
            controller_for(PermissionType::Bluetooth, DeviceInfo::android(31));
        binding.set_check_result(
            PermissionId::AndroidBluetoothScan,
            RawPermissionResult::Blocked,
        );
        binding.set_check_result(
            PermissionId::AndroidAccessFineLocation,
            RawPermissionResult::Granted,
        );
        binding.set_check_result(
            PermissionId::AndroidBluetoothConnect,
            RawPermissionResult::Granted,
        );

        assert_eq!(controller.check().await.unwrap(), PermissionStatus::Blocked);
    }

    #[tokio::test]
    async fn test_request_noop_when_granted() {
        let (controller, binding) = controller_for(PermissionType::Camera, DeviceInfo::ios());
        binding.set_check_result(PermissionId::IosCamera, RawPermissionResult::Granted);
        controller.check().await.unwrap();

        assert_eq!(controller.request().await.unwrap(), PermissionStatus::Granted);
        assert_eq!(binding.request_calls(), 0);
    }

    #[tokio::test]
    async fn test_request_noop_when_blocked() {
        let (controller, binding) = controller_for(PermissionType::Camera, DeviceInfo::ios());
        binding.set_check_result(PermissionId::IosCamera, RawPermissionResult::Blocked);
        controller.check().await.unwrap();

        assert_eq!(controller.request().await.unwrap(), PermissionStatus::Blocked);
        assert_eq!(binding.request_calls(), 0);
    }

    #[tokio::test]
    async fn test_request_ios_location_substitutes_always_variant() {
        let (controller, binding) = controller_for(PermissionType::Location, DeviceInfo::ios());
        binding.set_check_result(
            PermissionId::IosLocationWhenInUse,
            RawPermissionResult::Denied,
        );
        binding.set_request_result(
            PermissionId::IosLocationAlways,
            RawPermissionResult::Granted,
        );
        controller.check().await.unwrap();
        assert_eq!(controller.status(), PermissionStatus::Requestable);

        assert_eq!(controller.request().await.unwrap(), PermissionStatus::Granted);
        assert_eq!(binding.request_calls(), 1);
    }

    #[tokio::test]
    async fn test_request_denied_again_stays_requestable() {
        let (controller, binding) = controller_for(PermissionType::Camera, DeviceInfo::android(33));
        controller.check().await.unwrap();
        assert_eq!(controller.status(), PermissionStatus::Requestable);

        binding.set_request_result(PermissionId::AndroidCamera, RawPermissionResult::Denied);
        assert_eq!(controller.request().await.unwrap(), PermissionStatus::Requestable);
    }

    #[tokio::test]
    async fn test_check_error_propagates_and_state_unchanged() {
        let (controller, binding) = controller_for(PermissionType::Camera, DeviceInfo::ios());
        binding.fail_with("permission API unavailable");

        assert!(controller.check().await.is_err());
        assert_eq!(controller.status(), PermissionStatus::Initialising);
    }

    #[tokio::test]
    async fn test_failed_request_clears_in_flight_flag() {
        let (controller, binding) = controller_for(PermissionType::Camera, DeviceInfo::android(33));
        controller.check().await.unwrap();
        assert_eq!(controller.status(), PermissionStatus::Requestable);

        binding.fail_with("prompt failed");
        assert!(controller.request().await.is_err());

        // A later check must reach the binding again.
        binding.clear_failure();
        let checks_before = binding.check_calls();
        controller.check().await.unwrap();
        assert_eq!(binding.check_calls(), checks_before + 1);
    }

    #[tokio::test]
    async fn test_open_settings_reaches_binding() {
        let (controller, binding) = controller_for(PermissionType::Camera, DeviceInfo::ios());
        controller.open_settings().await.unwrap();
        assert_eq!(binding.settings_opened(), 1);
    }
}
