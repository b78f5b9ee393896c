//! Navigation History Adapter.
//!
//! Pure operations over a tab's [`NavigationHistory`]. Each returns the new
//! history, or an error when the move is rejected (boundaries are never wrapped).

use crate::types::errors::TabError;
use crate::types::history::{HistoryListEntry, NavigationEntry, NavigationHistory};
use crate::types::tab::{TabId, TabRecord};

pub fn can_go_back(history: &NavigationHistory) -> bool {
    history.current_index.is_some_and(|i| i > 0)
}

pub fn can_go_forward(history: &NavigationHistory) -> bool {
    history
        .current_index
        .is_some_and(|i| i + 1 < history.entries.len())
}

/// Steps one entry back.
pub fn go_back(tab_id: TabId, history: &NavigationHistory) -> Result<NavigationHistory, TabError> {
    match history.current_index {
        Some(i) if i > 0 => Ok(with_index(history, i - 1)),
        _ => Err(TabError::HistoryBoundary(tab_id)),
    }
}

/// Steps one entry forward.
pub fn go_forward(tab_id: TabId, history: &NavigationHistory) -> Result<NavigationHistory, TabError> {
    match history.current_index {
        Some(i) if i + 1 < history.entries.len() => Ok(with_index(history, i + 1)),
        _ => Err(TabError::HistoryBoundary(tab_id)),
    }
}

/// Jumps to `index`, which must lie in `0..entries.len()`.
pub fn go_to_index(history: &NavigationHistory, index: i64) -> Result<NavigationHistory, TabError> {
    let len = history.entries.len();
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(with_index(history, i)),
        _ => Err(TabError::InvalidIndex(index)),
    }
}

/// Records a navigation to `url`.
///
/// Forward entries past the current one are dropped, then the new entry is
/// appended and becomes current. Navigating to the current URL changes nothing.
pub fn push_entry(history: &NavigationHistory, url: &str, title: Option<&str>) -> NavigationHistory {
    if history.current().is_some_and(|e| e.url == url) {
        return history.clone();
    }
    let mut entries = match history.current_index {
        Some(i) => history.entries.take(i + 1),
        None => history.entries.clone(),
    };
    entries.push_back(NavigationEntry {
        url: url.to_string(),
        title: title.map(str::to_string),
    });
    let current_index = Some(entries.len() - 1);
    NavigationHistory {
        entries,
        current_index,
    }
}

/// Full ordered list for the long-press picker.
///
/// `None` when the tab has no navigable history at all, so callers suppress
/// the picker entirely rather than showing an empty one.
pub fn history_entries(tab: Option<&TabRecord>) -> Option<Vec<HistoryListEntry>> {
    let history = &tab?.history;
    if history.is_empty() {
        return None;
    }
    Some(
        history
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| HistoryListEntry {
                index,
                url: entry.url.clone(),
                title: entry.title.clone(),
                is_current: history.current_index == Some(index),
            })
            .collect(),
    )
}

fn with_index(history: &NavigationHistory, index: usize) -> NavigationHistory {
    NavigationHistory {
        entries: history.entries.clone(),
        current_index: Some(index),
    }
}
