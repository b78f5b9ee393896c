//! Tab Registry accessors and mutators over [`AppState`].
//!
//! Every mutator works on an owned `AppState` (a cheap persistent clone of the
//! caller's snapshot) so the snapshot the caller holds is never touched.

use im::Vector;

use crate::types::errors::TabError;
use crate::types::state::{max_frame_key, AppState};
use crate::types::tab::{FrameKey, TabId, TabRecord, WindowId};

pub fn get_by_tab_id(state: &AppState, tab_id: TabId) -> Result<&TabRecord, TabError> {
    state.tabs.get(&tab_id).ok_or(TabError::NotFound(tab_id))
}

/// Tabs of `window_id` in strip order.
pub fn tabs_in_window(state: &AppState, window_id: WindowId) -> Vec<&TabRecord> {
    state
        .tab_order
        .get(&window_id)
        .map(|order| order.iter().filter_map(|id| state.tabs.get(id)).collect())
        .unwrap_or_default()
}

pub fn active_tab_id(state: &AppState, window_id: WindowId) -> Option<TabId> {
    state.active_tabs.get(&window_id).copied()
}

pub fn active_tab(state: &AppState, window_id: WindowId) -> Result<&TabRecord, TabError> {
    let tab_id = active_tab_id(state, window_id).ok_or(TabError::WindowNotFound(window_id))?;
    get_by_tab_id(state, tab_id)
}

pub fn is_active(state: &AppState, tab_id: TabId) -> bool {
    state
        .tabs
        .get(&tab_id)
        .is_some_and(|t| active_tab_id(state, t.window_id) == Some(tab_id))
}

/// Position of a tab within its window's strip.
pub fn strip_index(state: &AppState, tab_id: TabId) -> Option<usize> {
    let tab = state.tabs.get(&tab_id)?;
    state
        .tab_order
        .get(&tab.window_id)?
        .iter()
        .position(|id| *id == tab_id)
}

/// Position of the tab owning `frame_key` within `window_id`'s strip.
pub fn index_by_frame_key(state: &AppState, window_id: WindowId, frame_key: FrameKey) -> Option<usize> {
    state.tab_order.get(&window_id)?.iter().position(|id| {
        state
            .tabs
            .get(id)
            .is_some_and(|t| t.frame_key == frame_key)
    })
}

/// Count of pinned tabs in a window (they are always at the left).
pub fn pinned_count(state: &AppState, window_id: WindowId) -> usize {
    tabs_in_window(state, window_id)
        .iter()
        .filter(|t| t.pinned)
        .count()
}

/// Clamps a strip position so pinned tabs stay left of unpinned ones.
/// `index` is interpreted against the strip with the tab already removed.
pub fn clamp_to_section(state: &AppState, window_id: WindowId, pinned: bool, index: usize) -> usize {
    let len = state.tab_order.get(&window_id).map_or(0, |o| o.len());
    let pinned_before = pinned_count(state, window_id);
    let index = index.min(len);
    if pinned {
        index.min(pinned_before)
    } else {
        index.max(pinned_before)
    }
}

/// Hands out the next tab id. `i32::MAX` is never handed out, so the counter
/// can always stay one past the largest id.
pub fn allocate_tab_id(state: &mut AppState) -> Result<TabId, TabError> {
    let id = TabId(state.next_tab_id);
    state.next_tab_id = state
        .next_tab_id
        .checked_add(1)
        .ok_or(TabError::IdSpaceExhausted)?;
    Ok(id)
}

pub fn allocate_frame_key(state: &mut AppState) -> Result<FrameKey, TabError> {
    let key = FrameKey(state.next_frame_key);
    state.next_frame_key = state
        .next_frame_key
        .checked_add(1)
        .ok_or(TabError::IdSpaceExhausted)?;
    Ok(key)
}

/// Keeps the allocators ahead of ids that arrived from outside.
pub fn reserve_ids(state: &mut AppState) {
    if let Some(max_id) = state.tabs.keys().map(|id| id.0).max() {
        state.next_tab_id = state.next_tab_id.max(max_id.saturating_add(1));
    }
    if let Some(max_key) = max_frame_key(state) {
        state.next_frame_key = state.next_frame_key.max(max_key.0.saturating_add(1));
    }
}

/// Adds a record and places it in its window's strip (appended when `index` is `None`).
pub fn insert_tab(state: &mut AppState, record: TabRecord, index: Option<usize>) {
    let window_id = record.window_id;
    let tab_id = record.tab_id;
    let pinned = record.pinned;
    detach(state, tab_id);
    let position = clamp_to_section(state, window_id, pinned, index.unwrap_or(usize::MAX));
    state.tabs.insert(tab_id, record);
    state
        .tab_order
        .entry(window_id)
        .or_insert_with(Vector::new)
        .insert(position, tab_id);
    reserve_ids(state);
}

/// Replaces a record in place. Fails when the tab is not registered.
pub fn update_tab(state: &mut AppState, record: TabRecord) -> Result<(), TabError> {
    let slot = state
        .tabs
        .get_mut(&record.tab_id)
        .ok_or(TabError::NotFound(record.tab_id))?;
    *slot = record;
    Ok(())
}

/// Applies `f` to the record for `tab_id`.
pub fn modify_tab<F>(state: &mut AppState, tab_id: TabId, f: F) -> Result<(), TabError>
where
    F: FnOnce(&mut TabRecord),
{
    let slot = state.tabs.get_mut(&tab_id).ok_or(TabError::NotFound(tab_id))?;
    f(slot);
    Ok(())
}

/// Removes the tab from its window's strip without dropping the record.
/// Clears the window's active pointer if it pointed at the tab.
pub fn detach(state: &mut AppState, tab_id: TabId) {
    let Some(window_id) = state.tabs.get(&tab_id).map(|t| t.window_id) else {
        return;
    };
    let now_empty = match state.tab_order.get_mut(&window_id) {
        Some(order) => {
            order.retain(|id| *id != tab_id);
            order.is_empty()
        }
        None => false,
    };
    if now_empty {
        state.tab_order.remove(&window_id);
    }
    if active_tab_id(state, window_id) == Some(tab_id) {
        state.active_tabs.remove(&window_id);
    }
}

/// Removes the record entirely.
pub fn remove_tab(state: &mut AppState, tab_id: TabId) -> Result<TabRecord, TabError> {
    if !state.tabs.contains_key(&tab_id) {
        return Err(TabError::NotFound(tab_id));
    }
    detach(state, tab_id);
    state.tabs.remove(&tab_id).ok_or(TabError::NotFound(tab_id))
}

/// Makes `tab_id` the one active tab of its window.
pub fn set_active(state: &mut AppState, tab_id: TabId) -> Result<WindowId, TabError> {
    let window_id = get_by_tab_id(state, tab_id)?.window_id;
    state.active_tabs.insert(window_id, tab_id);
    Ok(window_id)
}

/// Moves a registered tab to `position` in `window_id`'s strip, returning the
/// clamped position. The tab stays active when it remains in the same window.
pub fn place(state: &mut AppState, tab_id: TabId, window_id: WindowId, position: usize) -> Result<usize, TabError> {
    let tab = get_by_tab_id(state, tab_id)?;
    let pinned = tab.pinned;
    let keep_active = tab.window_id == window_id && is_active(state, tab_id);
    detach(state, tab_id);
    modify_tab(state, tab_id, |t| t.window_id = window_id)?;
    let position = clamp_to_section(state, window_id, pinned, position);
    state
        .tab_order
        .entry(window_id)
        .or_insert_with(Vector::new)
        .insert(position, tab_id);
    if keep_active {
        state.active_tabs.insert(window_id, tab_id);
    }
    Ok(position)
}
