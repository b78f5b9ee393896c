use im::Vector;
use serde::{Deserialize, Serialize};

/// A visited location in a tab's session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl NavigationEntry {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: None,
        }
    }
}

/// Per-tab session history. `current_index` is `None` exactly when there are no entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationHistory {
    #[serde(default)]
    pub entries: Vector<NavigationEntry>,
    pub current_index: Option<usize>,
}

impl NavigationHistory {
    pub fn starting_at(url: &str) -> Self {
        let mut entries = Vector::new();
        entries.push_back(NavigationEntry::new(url));
        Self {
            entries,
            current_index: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&NavigationEntry> {
        self.current_index.and_then(|i| self.entries.get(i))
    }

    /// Repairs an index that does not point into `entries` (e.g. from a stale snapshot).
    pub fn normalized(mut self) -> Self {
        self.current_index = match (self.entries.len(), self.current_index) {
            (0, _) => None,
            (len, Some(i)) if i < len => Some(i),
            (len, _) => Some(len - 1),
        };
        self
    }
}

/// One row of the long-press history picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListEntry {
    pub index: usize,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub is_current: bool,
}

/// Which button the long-press picker was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryDirection {
    Back,
    Forward,
}
