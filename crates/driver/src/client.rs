//! Remote client facade
//!
//! The trait boundary to the controlled application's window-automation
//! endpoint. The wire protocol behind it is not part of this crate; any
//! transport (or the in-memory mock in [`crate::testkit`]) can implement
//! [`RemoteClient`] without changing call sites.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque identifier for a top-level window.
///
/// Returned by the remote endpoint and compared only for equality or
/// membership, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowHandle {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Primitive operations exposed by the controlled application.
///
/// Selectors are opaque strings owned by the caller. All operations are
/// asynchronous and may observe state that lags the application's own;
/// synchronization on top of these primitives is the wait engine's job.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Click the element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Replace the value of the input matching `selector`.
    async fn set_value(&self, selector: &str, value: &str) -> Result<()>;

    /// Select the option with the given value in the dropdown matching
    /// `selector`.
    async fn select_by_value(&self, selector: &str, value: &str) -> Result<()>;

    /// Text content of the element matching `selector`.
    async fn get_text(&self, selector: &str) -> Result<String>;

    /// Whether the element matching `selector` is currently visible.
    /// A missing element reports `false`, not an error.
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Whether an element matching `selector` is attached at all.
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Handle of the currently focused window.
    async fn window_handle(&self) -> Result<WindowHandle>;

    /// Handles of all top-level windows, in creation order.
    async fn window_handles(&self) -> Result<Vec<WindowHandle>>;

    /// Focus the window at `index` in creation order.
    async fn switch_to_window(&self, index: usize) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_handles_compare_by_id() {
        let a = WindowHandle::new("w-1");
        let b = WindowHandle::from("w-1");
        let c = WindowHandle::new("w-2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "w-1");
    }
}
