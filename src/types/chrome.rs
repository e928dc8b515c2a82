use serde::{Deserialize, Serialize};

use crate::types::tab::TabId;

/// Title shown when neither a page title nor a host is available.
pub const DEFAULT_WINDOW_TITLE: &str = "Web Browser";

/// A status-line message, optionally cleared after `timeout_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub timeout_ms: Option<u32>,
}

impl StatusMessage {
    pub fn sticky(text: impl Into<String>) -> Self {
        Self { text: text.into(), timeout_ms: None }
    }

    pub fn transient(text: impl Into<String>, timeout_ms: u32) -> Self {
        Self { text: text.into(), timeout_ms: Some(timeout_ms) }
    }
}

/// Displayed state of the shared window chrome.
///
/// The tab session controller is the only writer; front-ends render it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chrome {
    pub address_bar: String,
    pub window_title: String,
    pub status: Option<StatusMessage>,
    pub back_enabled: bool,
    pub forward_enabled: bool,
    pub stop_enabled: bool,
    pub home_tooltip: String,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            address_bar: String::new(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            status: None,
            back_enabled: false,
            forward_enabled: false,
            stop_enabled: false,
            home_tooltip: String::new(),
        }
    }
}

/// One entry of the tab strip, in tab order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabStripEntry {
    pub id: TabId,
    pub label: String,
    pub tooltip: String,
    pub active: bool,
}
