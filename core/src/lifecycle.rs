//! App lifecycle signal
//!
//! Platform code publishes foreground/background transitions through an
//! [`AppLifecycle`] implementation; [`ForegroundWatcher`] turns those
//! transitions into "returned to foreground" callbacks for the hook.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// App execution state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppState {
    /// App is in the foreground and receiving events
    Active,
    /// App is in the foreground but not receiving events (e.g. a system
    /// dialog is covering it)
    Inactive,
    /// App is in the background
    Background,
}

/// Source of app lifecycle transitions
///
/// Implemented by platform bindings; each `watch()` call hands out an
/// independent receiver on the same underlying channel.
pub trait AppLifecycle: Send + Sync {
    fn watch(&self) -> watch::Receiver<AppState>;
}

/// Watches the lifecycle channel and fires a callback on every return to
/// the foreground
///
/// Fires only on transitions from a non-active state to [`AppState::Active`],
/// never on the state observed at spawn time and never between two
/// non-active states. Dropping the watcher aborts the task, so a pending
/// callback after teardown is discarded rather than applied.
pub struct ForegroundWatcher {
    handle: JoinHandle<()>,
}

impl ForegroundWatcher {
    pub fn spawn<F, Fut>(mut states: watch::Receiver<AppState>, on_foreground: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut previous = *states.borrow();
            while states.changed().await.is_ok() {
                let current = *states.borrow_and_update();
                if current == AppState::Active && previous != AppState::Active {
                    on_foreground().await;
                }
                previous = current;
            }
        });

        Self { handle }
    }
}

impl Drop for ForegroundWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedLifecycle;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Let spawned watcher tasks run on the current-thread test runtime.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn counting_watcher(
        lifecycle: &SimulatedLifecycle,
    ) -> (ForegroundWatcher, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let watcher = {
            let fired = Arc::clone(&fired);
            ForegroundWatcher::spawn(lifecycle.watch(), move || {
                let fired = Arc::clone(&fired);
                async move {
                    fired.fetch_add(1, Ordering::SeqCst);
                }
            })
        };
        (watcher, fired)
    }

    #[tokio::test]
    async fn test_does_not_fire_on_spawn() {
        let lifecycle = SimulatedLifecycle::new(AppState::Active);
        let (_watcher, fired) = counting_watcher(&lifecycle);
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fires_on_background_to_active() {
        let lifecycle = SimulatedLifecycle::new(AppState::Active);
        let (_watcher, fired) = counting_watcher(&lifecycle);

        lifecycle.set_state(AppState::Background);
        settle().await;
        lifecycle.set_state(AppState::Active);
        settle().await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ignores_non_active_transitions() {
        let lifecycle = SimulatedLifecycle::new(AppState::Active);
        let (_watcher, fired) = counting_watcher(&lifecycle);

        lifecycle.set_state(AppState::Inactive);
        settle().await;
        lifecycle.set_state(AppState::Background);
        settle().await;
        lifecycle.set_state(AppState::Inactive);
        settle().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stops_firing_after_drop() {
        let lifecycle = SimulatedLifecycle::new(AppState::Active);
        let (watcher, fired) = counting_watcher(&lifecycle);

        lifecycle.set_state(AppState::Background);
        settle().await;
        drop(watcher);
        settle().await;

        lifecycle.set_state(AppState::Active);
        settle().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
