//! Permission hook
//!
//! The binding surface an app screen holds while it cares about one
//! permission: owns a [`PermissionController`], runs the initial check,
//! and keeps the status fresh across foreground transitions. Dropping the
//! hook tears the lifecycle subscription down.

use crate::binding::PermissionBinding;
use crate::controller::PermissionController;
use crate::lifecycle::{AppLifecycle, ForegroundWatcher};
use crate::resolver::DeviceInfo;
use crate::types::{PermissionStatus, PermissionType};
use crate::PermissionError;
use std::sync::Arc;
use tracing::warn;

/// Reactive handle for one logical permission type
///
/// Created with [`bind`](Self::bind); alive for as long as the caller
/// observes the permission. While alive, every app return to the
/// foreground re-checks the permission, so grants changed in the OS
/// settings screen become visible without user action.
pub struct PermissionHook {
    controller: Arc<PermissionController>,
    _watcher: ForegroundWatcher,
}

impl PermissionHook {
    /// Bind to a permission type and start observing it
    ///
    /// Performs the initial `check()` exactly once before returning, then
    /// subscribes to the lifecycle signal. An initial-check binding error
    /// aborts the bind and propagates.
    pub async fn bind(
        permission: PermissionType,
        device: DeviceInfo,
        binding: Arc<dyn PermissionBinding>,
        lifecycle: &dyn AppLifecycle,
    ) -> Result<Self, PermissionError> {
        let controller = Arc::new(PermissionController::new(Some(permission), device, binding));

        controller.check().await?;

        let watcher = {
            let controller = Arc::clone(&controller);
            ForegroundWatcher::spawn(lifecycle.watch(), move || {
                let controller = Arc::clone(&controller);
                async move {
                    if let Err(err) = controller.check().await {
                        warn!(%err, "foreground permission re-check failed");
                    }
                }
            })
        };

        Ok(Self {
            controller,
            _watcher: watcher,
        })
    }

    /// Snapshot of the current consolidated status
    pub fn status(&self) -> PermissionStatus {
        self.controller.status()
    }

    /// Force a re-check of the permission status
    pub async fn check(&self) -> Result<PermissionStatus, PermissionError> {
        self.controller.check().await
    }

    /// Prompt the user for the permission if it is requestable
    pub async fn request(&self) -> Result<PermissionStatus, PermissionError> {
        self.controller.request().await
    }

    /// Open the OS settings screen for this app
    pub async fn open_settings(&self) -> Result<(), PermissionError> {
        self.controller.open_settings().await
    }

    pub fn is_initialising(&self) -> bool {
        self.status().is_initialising()
    }

    pub fn is_granted(&self) -> bool {
        self.status().is_granted()
    }

    pub fn is_requestable(&self) -> bool {
        self.status().is_requestable()
    }

    pub fn is_blocked(&self) -> bool {
        self.status().is_blocked()
    }
}
