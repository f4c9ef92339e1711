//! Command sequencer
//!
//! Declarative primitive steps and an ordered, guard-filtered builder.
//! Guards are evaluated while the chain is built, so a skipped step
//! contributes no operation and no delay; execution is strictly
//! sequential and fail-fast (see `Session::run_sequence`).

use serde::{Deserialize, Serialize};

/// A single primitive operation in a command chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Click an element
    Click { selector: String },

    /// Replace an input's value
    SetValue { selector: String, value: String },

    /// Pick a dropdown option by value
    SelectByValue { selector: String, value: String },

    /// Wait for an element to become visible (or hidden with `reverse`)
    WaitForVisible {
        selector: String,
        #[serde(default)]
        reverse: bool,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Wait for an element to be attached
    WaitForExist {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Wait for an element's text content to drain to the empty string
    WaitForEmptyText {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
}

impl StepAction {
    pub fn click(selector: impl Into<String>) -> Self {
        Self::Click {
            selector: selector.into(),
        }
    }

    pub fn set_value(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SetValue {
            selector: selector.into(),
            value: value.into(),
        }
    }

    pub fn select_by_value(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SelectByValue {
            selector: selector.into(),
            value: value.into(),
        }
    }

    pub fn wait_for_visible(selector: impl Into<String>) -> Self {
        Self::WaitForVisible {
            selector: selector.into(),
            reverse: false,
            timeout_ms: None,
        }
    }

    pub fn wait_for_hidden(selector: impl Into<String>) -> Self {
        Self::WaitForVisible {
            selector: selector.into(),
            reverse: true,
            timeout_ms: None,
        }
    }

    pub fn wait_for_exist(selector: impl Into<String>) -> Self {
        Self::WaitForExist {
            selector: selector.into(),
            timeout_ms: None,
        }
    }

    pub fn wait_for_empty_text(selector: impl Into<String>) -> Self {
        Self::WaitForEmptyText {
            selector: selector.into(),
            timeout_ms: None,
        }
    }

    /// Short name for logging.
    pub fn step_name(&self) -> String {
        match self {
            Self::Click { selector } => format!("click:{selector}"),
            Self::SetValue { selector, .. } => format!("set_value:{selector}"),
            Self::SelectByValue { selector, .. } => format!("select:{selector}"),
            Self::WaitForVisible {
                selector,
                reverse: false,
                ..
            } => format!("wait_visible:{selector}"),
            Self::WaitForVisible { selector, .. } => format!("wait_hidden:{selector}"),
            Self::WaitForExist { selector, .. } => format!("wait_exist:{selector}"),
            Self::WaitForEmptyText { selector, .. } => format!("wait_empty_text:{selector}"),
        }
    }
}

/// An ordered chain of steps, filtered by guards at build time.
///
/// The chain length is data-dependent: `push_if` and `set_value_opt`
/// append nothing when their guard is false.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    steps: Vec<StepAction>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push(mut self, action: StepAction) -> Self {
        self.steps.push(action);
        self
    }

    #[must_use]
    pub fn push_if(self, guard: bool, action: StepAction) -> Self {
        if guard {
            self.push(action)
        } else {
            self
        }
    }

    /// Append a `SetValue` step only when the field is present.
    #[must_use]
    pub fn set_value_opt(self, selector: &str, value: Option<impl AsRef<str>>) -> Self {
        match value {
            Some(value) => self.push(StepAction::set_value(selector, value.as_ref())),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepAction> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a StepAction;
    type IntoIter = std::slice::Iter<'a, StepAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
