use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::history::NavigationHistory;

/// Identifier of an open tab. Assigned once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i32);

/// Identifier of a browser window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i32);

impl WindowId {
    /// Sentinel for "unassigned / use the caller's active window".
    pub const NONE: WindowId = WindowId(-1);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Key linking a tab to the frame state its window renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameKey(pub i32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one open tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub tab_id: TabId,
    pub window_id: WindowId,
    pub frame_key: FrameKey,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub partition_number: u32,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub audio_muted: bool,
    #[serde(default)]
    pub dev_tools_open: bool,
    #[serde(default)]
    pub history: NavigationHistory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_box_detail: Option<MessageBoxDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_details: Option<AboutDetails>,
}

impl TabRecord {
    /// Builds a tab whose history holds a single entry for `url`.
    pub fn new(tab_id: TabId, window_id: WindowId, frame_key: FrameKey, url: &str) -> Self {
        Self {
            tab_id,
            window_id,
            frame_key,
            url: url.to_string(),
            title: None,
            partition_number: 0,
            pinned: false,
            audio_muted: false,
            dev_tools_open: false,
            history: NavigationHistory::starting_at(url),
            message_box_detail: None,
            about_details: None,
        }
    }
}

/// Modal dialog content attached to a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBoxDetail {
    #[serde(default)]
    pub title: Option<String>,
    pub message: String,
    #[serde(default = "MessageBoxDetail::default_buttons")]
    pub buttons: Vec<String>,
    #[serde(default)]
    pub cancel_id: Option<usize>,
    #[serde(default)]
    pub show_suppress: bool,
    #[serde(default)]
    pub suppress: bool,
}

impl MessageBoxDetail {
    pub fn default_buttons() -> Vec<String> {
        vec!["ok".to_string()]
    }

    /// Response produced when the dialog is dismissed with `button`.
    ///
    /// Without a cancel id every dismissal counts as a confirmation; otherwise
    /// only buttons other than the cancel button confirm. `None` stands for the
    /// escape key, which always maps to the cancel button.
    pub fn response_for(&self, button: Option<usize>) -> MessageBoxResponse {
        let result = match self.cancel_id {
            Some(cancel) => button.unwrap_or(cancel) != cancel,
            None => true,
        };
        MessageBoxResponse {
            result,
            suppress: self.suppress,
        }
    }
}

/// Answer delivered to whoever opened a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBoxResponse {
    pub result: bool,
    #[serde(default)]
    pub suppress: bool,
}

/// Error-page context captured when a frame fails to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutDetails {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub previous_location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error_code: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
