//! Simulated platform backends
//!
//! In-memory implementations of [`PermissionBinding`] and [`AppLifecycle`]
//! with scripted results, used by the test suite and the diagnostic CLI.
//! No real OS is consulted.

use crate::binding::PermissionBinding;
use crate::lifecycle::{AppLifecycle, AppState};
use crate::resolver::PermissionId;
use crate::types::RawPermissionResult;
use crate::PermissionError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

// ============================================================================
// SIMULATED BINDING
// ============================================================================

/// Scripted in-memory permission binding
///
/// Identifiers without a scripted result report [`RawPermissionResult::Denied`]
/// (not yet requested). Request results are applied back to the check table,
/// mimicking the OS persisting a grant.
pub struct SimulatedBinding {
    check_results: RwLock<HashMap<PermissionId, RawPermissionResult>>,
    request_results: RwLock<HashMap<PermissionId, RawPermissionResult>>,
    failure: RwLock<Option<String>>,
    request_gate: RwLock<Option<Arc<Notify>>>,
    check_calls: AtomicUsize,
    request_calls: AtomicUsize,
    settings_opened: AtomicUsize,
}

impl SimulatedBinding {
    pub fn new() -> Self {
        Self {
            check_results: RwLock::new(HashMap::new()),
            request_results: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            request_gate: RwLock::new(None),
            check_calls: AtomicUsize::new(0),
            request_calls: AtomicUsize::new(0),
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// Script the result a check reports for `id`
    pub fn set_check_result(&self, id: PermissionId, result: RawPermissionResult) {
        self.check_results.write().insert(id, result);
    }

    /// Script the result a request reports for `id`
    pub fn set_request_result(&self, id: PermissionId, result: RawPermissionResult) {
        self.request_results.write().insert(id, result);
    }

    /// Make every subsequent binding call fail with the given message
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    /// Clear a previously injected failure
    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    /// Hold the next `request_many` call until the returned handle is
    /// notified; lets tests observe an in-flight request.
    pub fn hold_requests(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.request_gate.write() = Some(Arc::clone(&gate));
        gate
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    pub fn settings_opened(&self) -> usize {
        self.settings_opened.load(Ordering::SeqCst)
    }

    fn fail_if_scripted(&self) -> Result<(), PermissionError> {
        match self.failure.read().clone() {
            Some(message) => Err(PermissionError::Binding(message)),
            None => Ok(()),
        }
    }
}

impl Default for SimulatedBinding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionBinding for SimulatedBinding {
    async fn check_many(
        &self,
        ids: &[PermissionId],
    ) -> Result<HashMap<PermissionId, RawPermissionResult>, PermissionError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_scripted()?;

        let table = self.check_results.read();
        Ok(ids
            .iter()
            .map(|id| (*id, table.get(id).copied().unwrap_or(RawPermissionResult::Denied)))
            .collect())
    }

    async fn request_many(
        &self,
        ids: &[PermissionId],
    ) -> Result<HashMap<PermissionId, RawPermissionResult>, PermissionError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_scripted()?;

        let gate = self.request_gate.read().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let results: HashMap<PermissionId, RawPermissionResult> = {
            let table = self.request_results.read();
            ids.iter()
                .map(|id| (*id, table.get(id).copied().unwrap_or(RawPermissionResult::Denied)))
                .collect()
        };

        // The OS remembers the user's answer; later checks see it too.
        let mut checks = self.check_results.write();
        for (id, result) in &results {
            checks.insert(*id, *result);
        }

        Ok(results)
    }

    async fn open_settings(&self) -> Result<(), PermissionError> {
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
        self.fail_if_scripted()?;
        Ok(())
    }
}

// ============================================================================
// SIMULATED LIFECYCLE
// ============================================================================

/// Scripted lifecycle signal backed by a watch channel
pub struct SimulatedLifecycle {
    tx: tokio::sync::watch::Sender<AppState>,
}

impl SimulatedLifecycle {
    pub fn new(initial: AppState) -> Self {
        let (tx, _rx) = tokio::sync::watch::channel(initial);
        Self { tx }
    }

    /// Publish a lifecycle transition to every watcher
    pub fn set_state(&self, state: AppState) {
        let _ = self.tx.send(state);
    }

    pub fn current_state(&self) -> AppState {
        *self.tx.borrow()
    }
}

impl AppLifecycle for SimulatedLifecycle {
    fn watch(&self) -> tokio::sync::watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}

// ============================================================================
// TESTS
// ============================================================================
