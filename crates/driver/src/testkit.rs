//! In-memory remote client for tests and simulation
//!
//! [`MockClient`] implements [`RemoteClient`] over a scripted element
//! table and window list, and journals every mutating call so tests can
//! assert exactly which operations a scenario issued, in order.
//! Observation calls (visibility, text, handle queries) are not
//! journaled; predicates are expected to be free of side effects.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{RemoteClient, WindowHandle};
use crate::error::{Error, Result};

/// Scripted state of one element.
#[derive(Debug, Clone, Default)]
pub struct ElementState {
    pub visible: bool,
    pub text: String,
    pub value: String,
}

impl ElementState {
    /// An attached, visible element.
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    /// An attached element that is not currently shown.
    pub fn hidden() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// One journaled mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Click(String),
    SetValue(String, String),
    SelectByValue(String, String),
    SwitchToWindow(usize),
}

#[derive(Debug, Default)]
struct MockState {
    elements: HashMap<String, ElementState>,
    windows: Vec<WindowHandle>,
    focused: usize,
    calls: Vec<RecordedCall>,
}

/// Scripted in-memory [`RemoteClient`].
///
/// Clones share state, so a test can hand one clone to a session and
/// mutate the UI through another while a wait is polling.
#[derive(Debug, Clone)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// A client with a single focused window and no elements.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                windows: vec![WindowHandle::from("main-window")],
                ..Default::default()
            })),
        }
    }

    pub fn set_element(&self, selector: &str, element: ElementState) {
        self.state.lock().elements.insert(selector.to_string(), element);
    }

    pub fn remove_element(&self, selector: &str) {
        self.state.lock().elements.remove(selector);
    }

    /// Attach (if needed) and show the element.
    pub fn show(&self, selector: &str) {
        self.state
            .lock()
            .elements
            .entry(selector.to_string())
            .or_default()
            .visible = true;
    }

    pub fn hide(&self, selector: &str) {
        if let Some(element) = self.state.lock().elements.get_mut(selector) {
            element.visible = false;
        }
    }

    pub fn set_text(&self, selector: &str, text: &str) {
        self.state
            .lock()
            .elements
            .entry(selector.to_string())
            .or_default()
            .text = text.to_string();
    }

    /// Replace the window list, keeping the focused slot when it still
    /// exists and falling back to slot 0 otherwise.
    pub fn set_windows(&self, ids: &[&str]) {
        let mut state = self.state.lock();
        state.windows = ids.iter().map(|id| WindowHandle::from(*id)).collect();
        if state.focused >= state.windows.len() {
            state.focused = 0;
        }
    }

    pub fn add_window(&self, id: &str) {
        self.state.lock().windows.push(WindowHandle::from(id));
    }

    pub fn focused_index(&self) -> usize {
        self.state.lock().focused
    }

    /// Journal of mutating calls, in issue order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Current value of an input, as last written by `set_value`.
    pub fn value_of(&self, selector: &str) -> Option<String> {
        self.state
            .lock()
            .elements
            .get(selector)
            .map(|e| e.value.clone())
    }
}

#[async_trait]
impl RemoteClient for MockClient {
    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock();
        match state.elements.get(selector) {
            None => Err(Error::Protocol(format!("no such element: {selector}"))),
            Some(e) if !e.visible => Err(Error::Protocol(format!(
                "element not interactable: {selector}"
            ))),
            Some(_) => {
                state.calls.push(RecordedCall::Click(selector.to_string()));
                Ok(())
            }
        }
    }

    async fn set_value(&self, selector: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock();
        match state.elements.get_mut(selector) {
            None => Err(Error::Protocol(format!("no such element: {selector}"))),
            Some(e) => {
                e.value = value.to_string();
                state
                    .calls
                    .push(RecordedCall::SetValue(selector.to_string(), value.to_string()));
                Ok(())
            }
        }
    }

    async fn select_by_value(&self, selector: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock();
        match state.elements.get_mut(selector) {
            None => Err(Error::Protocol(format!("no such element: {selector}"))),
            Some(e) => {
                e.value = value.to_string();
                state.calls.push(RecordedCall::SelectByValue(
                    selector.to_string(),
                    value.to_string(),
                ));
                Ok(())
            }
        }
    }

    async fn get_text(&self, selector: &str) -> Result<String> {
        self.state
            .lock()
            .elements
            .get(selector)
            .map(|e| e.text.clone())
            .ok_or_else(|| Error::Protocol(format!("no such element: {selector}")))
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .elements
            .get(selector)
            .is_some_and(|e| e.visible))
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.state.lock().elements.contains_key(selector))
    }

    async fn window_handle(&self) -> Result<WindowHandle> {
        let state = self.state.lock();
        state
            .windows
            .get(state.focused)
            .cloned()
            .ok_or_else(|| Error::Protocol("no focused window".to_string()))
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        Ok(self.state.lock().windows.clone())
    }

    async fn switch_to_window(&self, index: usize) -> Result<()> {
        let mut state = self.state.lock();
        if index >= state.windows.len() {
            return Err(Error::Protocol(format!("no window at index {index}")));
        }
        state.focused = index;
        state.calls.push(RecordedCall::SwitchToWindow(index));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn journals_mutations_in_order() {
        let client = MockClient::new();
        client.set_element("#name", ElementState::visible());

        client.set_value("#name", "fixture").await.unwrap();
        client.click("#name").await.unwrap();

        assert_eq!(
            client.calls(),
            vec![
                RecordedCall::SetValue("#name".to_string(), "fixture".to_string()),
                RecordedCall::Click("#name".to_string()),
            ]
        );
        assert_eq!(client.value_of("#name").as_deref(), Some("fixture"));
    }

    #[tokio::test]
    async fn visibility_of_missing_elements_is_false_not_an_error() {
        let client = MockClient::new();
        assert!(!client.is_visible("#ghost").await.unwrap());
        assert!(!client.exists("#ghost").await.unwrap());
        assert!(client.get_text("#ghost").await.is_err());
    }

    #[tokio::test]
    async fn window_switching_tracks_focus() {
        let client = MockClient::new();
        client.add_window("second");

        client.switch_to_window(1).await.unwrap();
        assert_eq!(client.window_handle().await.unwrap(), "second".into());

        let err = client.switch_to_window(5).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }
}
