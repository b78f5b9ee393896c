use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::drag::DragState;
use super::tab::{FrameKey, TabId, TabRecord, WindowId};

/// Root state tree. Cloning is cheap; every transition produces a new value
/// sharing unchanged structure with the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub tabs: OrdMap<TabId, TabRecord>,
    /// Left-to-right tab strip of each window.
    pub tab_order: OrdMap<WindowId, Vector<TabId>>,
    pub active_tabs: OrdMap<WindowId, TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragState>,
    pub next_tab_id: i32,
    pub next_frame_key: i32,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tabs: OrdMap::new(),
            tab_order: OrdMap::new(),
            active_tabs: OrdMap::new(),
            drag: None,
            next_tab_id: 1,
            next_frame_key: 1,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bootstrap payload handed to `state-initialize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(default)]
    pub tabs: Vec<TabRecord>,
    #[serde(default)]
    pub active_tabs: Vec<ActiveTabEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTabEntry {
    pub window_id: WindowId,
    pub tab_id: TabId,
}

impl From<&AppState> for StateSnapshot {
    fn from(state: &AppState) -> Self {
        let tabs = state
            .tab_order
            .values()
            .flat_map(|order| order.iter())
            .filter_map(|id| state.tabs.get(id).cloned())
            .collect();
        let active_tabs = state
            .active_tabs
            .iter()
            .map(|(window_id, tab_id)| ActiveTabEntry {
                window_id: *window_id,
                tab_id: *tab_id,
            })
            .collect();
        Self { tabs, active_tabs }
    }
}

/// Highest frame key in use, for seeding the allocator.
pub(crate) fn max_frame_key(state: &AppState) -> Option<FrameKey> {
    state.tabs.values().map(|t| t.frame_key).max()
}
