//! Platform permission binding
//!
//! Abstraction over the OS permission API. Platform code (Android/iOS
//! bindings, or a simulation) implements [`PermissionBinding`]; the
//! controller only ever talks to the trait.

use crate::resolver::PermissionId;
use crate::types::RawPermissionResult;
use crate::PermissionError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Platform-specific permission API abstraction
///
/// Implementers provide the actual permission calls for their platform.
/// `request_many` may display a blocking system prompt and must not
/// resolve until the user has responded.
#[async_trait]
pub trait PermissionBinding: Send + Sync {
    /// Check the current result for each identifier without prompting
    async fn check_many(
        &self,
        ids: &[PermissionId],
    ) -> Result<HashMap<PermissionId, RawPermissionResult>, PermissionError>;

    /// Request each identifier, prompting the user where necessary
    async fn request_many(
        &self,
        ids: &[PermissionId],
    ) -> Result<HashMap<PermissionId, RawPermissionResult>, PermissionError>;

    /// Open the OS settings screen for this app
    async fn open_settings(&self) -> Result<(), PermissionError>;
}
