//! Status consolidation
//!
//! Reduces the per-identifier results of a multi-permission check or
//! request into the single [`PermissionStatus`] the rest of the crate
//! reasons about.

use crate::types::{PermissionStatus, RawPermissionResult};

/// Severity rank for the priority fold; higher wins.
fn severity(status: PermissionStatus) -> u8 {
    match status {
        PermissionStatus::Blocked => 2,
        PermissionStatus::Requestable => 1,
        _ => 0,
    }
}

/// Classify one raw result into the status it argues for.
fn classify(result: RawPermissionResult) -> PermissionStatus {
    match result {
        // Blocked: denied and not requestable anymore.
        // Unavailable: the feature does not exist on this device.
        RawPermissionResult::Blocked | RawPermissionResult::Unavailable => {
            PermissionStatus::Blocked
        }

        // Denied: not yet requested, or denied but still requestable.
        RawPermissionResult::Denied => PermissionStatus::Requestable,

        // Granted and Limited both count as usable.
        RawPermissionResult::Granted | RawPermissionResult::Limited => PermissionStatus::Granted,
    }
}

/// Consolidate per-identifier results into one status
///
/// An empty input means nothing needed checking and yields `Granted`.
/// Otherwise a max-severity fold with fixed precedence
/// `Blocked/Unavailable > Denied > Granted/Limited`: any blocked or
/// unavailable entry forces `Blocked`; otherwise any denied entry forces
/// `Requestable`; only an all-granted/limited list yields `Granted`.
/// Order and duplicates are irrelevant.
pub fn consolidate(results: &[RawPermissionResult]) -> PermissionStatus {
    if results.is_empty() {
        return PermissionStatus::Granted;
    }

    results
        .iter()
        .map(|result| classify(*result))
        .max_by_key(|status| severity(*status))
        // Unreachable for a non-empty list; defensive default only.
        .unwrap_or(PermissionStatus::Blocked)
}

// ============================================================================
// TESTS
// ============================================================================
