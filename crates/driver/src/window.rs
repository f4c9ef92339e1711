//! Window tracker
//!
//! Detects the appearance of a new top-level window relative to the
//! window that was focused when the wait began.

use tracing::debug;

use crate::client::{RemoteClient, WindowHandle};
use crate::error::Result;
use crate::wait::{wait_until, WaitOptions};

/// Wait until the window at `index` (creation order) differs from the
/// window focused at call time, then switch to it and return its handle.
///
/// A slot beyond the current window count is treated as not-yet-ready:
/// the wait keeps polling until the window is created rather than
/// mistaking a missing handle for a new one.
pub async fn wait_for_window(
    client: &dyn RemoteClient,
    index: usize,
    opts: &WaitOptions,
) -> Result<WindowHandle> {
    let origin = client.window_handle().await?;
    debug!(%origin, index, "waiting for new window");

    let label = format!("new window at slot {index}");
    let origin_ref = &origin;
    wait_until(&label, opts, || async move {
        let handles = client.window_handles().await?;
        Ok(handles.get(index).is_some_and(|h| h != origin_ref))
    })
    .await?;

    client.switch_to_window(index).await?;
    let handle = client.window_handle().await?;
    debug!(%handle, index, "switched to new window");
    Ok(handle)
}
