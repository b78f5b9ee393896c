//! Tab Lifecycle Operations.
//!
//! Each operation takes the current snapshot and returns the next one, pushing
//! the rendering-surface commands it implies into `effects`. Effects are only
//! pushed once the operation is certain to succeed, so a rejected operation
//! leaves both the state and the effect list untouched.

use tracing::debug;

use crate::host::ReduceContext;
use crate::managers::history_adapter;
use crate::managers::tab_registry;
use crate::types::action::{BrowserOpts, CloneOptions, CreateProperties, FrameOpts, FrameUpdate, TabDescriptor};
use crate::types::effect::Effect;
use crate::types::errors::TabError;
use crate::types::history::NavigationHistory;
use crate::types::state::{AppState, StateSnapshot};
use crate::types::tab::{MessageBoxDetail, MessageBoxResponse, TabId, TabRecord, WindowId};

/// Rebuilds the registry from a bootstrap snapshot.
///
/// Histories are normalized, active pointers that name a missing tab (or a tab
/// in another window) are dropped, and the id allocators are moved past every
/// id in the snapshot.
pub fn init(state: &AppState, snapshot: &StateSnapshot) -> AppState {
    let mut next = AppState {
        next_tab_id: state.next_tab_id,
        next_frame_key: state.next_frame_key,
        ..AppState::new()
    };
    for tab in &snapshot.tabs {
        let mut record = tab.clone();
        record.history = record.history.normalized();
        tab_registry::insert_tab(&mut next, record, None);
    }
    for entry in &snapshot.active_tabs {
        let belongs = next
            .tabs
            .get(&entry.tab_id)
            .is_some_and(|t| t.window_id == entry.window_id);
        if belongs {
            next.active_tabs.insert(entry.window_id, entry.tab_id);
        }
    }
    debug!(tabs = next.tabs.len(), "registry initialized from snapshot");
    next
}

/// Ensures a record matching `desc` exists: creates it when absent, otherwise
/// merges the fields the descriptor carries.
pub fn maybe_create_tab(state: &AppState, desc: &TabDescriptor, ctx: &ReduceContext) -> Result<AppState, TabError> {
    let mut next = state.clone();
    match state.tabs.get(&desc.tab_id) {
        Some(existing) => {
            let mut record = existing.clone();
            if let Some(url) = &desc.url {
                if record.url != *url {
                    record.history = history_adapter::push_entry(&record.history, url, desc.title.as_deref());
                    record.url = url.clone();
                }
            }
            if let Some(title) = &desc.title {
                record.title = Some(title.clone());
            }
            if let Some(key) = desc.frame_key {
                record.frame_key = key;
            }
            if let Some(partition) = desc.partition_number {
                record.partition_number = partition;
            }
            if let Some(muted) = desc.audio_muted {
                record.audio_muted = muted;
            }
            let pin_changed = desc.pinned.is_some_and(|p| p != record.pinned);
            if let Some(pinned) = desc.pinned {
                record.pinned = pinned;
            }
            let window_id = record.window_id;
            tab_registry::update_tab(&mut next, record)?;
            tab_registry::reserve_ids(&mut next);

            let target_window = match desc.window_id {
                Some(w) if !w.is_none() => w,
                _ => window_id,
            };
            if target_window != window_id || desc.index.is_some() || pin_changed {
                let position = match (desc.index, pin_changed) {
                    (Some(index), _) => index,
                    (None, true) if desc.pinned == Some(true) => usize::MAX,
                    (None, true) => 0,
                    (None, false) => usize::MAX,
                };
                tab_registry::place(&mut next, desc.tab_id, target_window, position)?;
            }
        }
        None => {
            let window_id = ctx.resolve_window(desc.window_id);
            let frame_key = match desc.frame_key {
                Some(key) => key,
                None => tab_registry::allocate_frame_key(&mut next)?,
            };
            let url = desc
                .url
                .clone()
                .unwrap_or_else(|| ctx.settings.default_url.clone());
            let mut record = TabRecord::new(desc.tab_id, window_id, frame_key, &url);
            record.title = desc.title.clone();
            record.partition_number = desc
                .partition_number
                .unwrap_or(ctx.settings.default_partition_number);
            record.pinned = desc.pinned.unwrap_or(false);
            record.audio_muted = desc.audio_muted.unwrap_or(false);
            tab_registry::insert_tab(&mut next, record, desc.index);
        }
    }

    let window_id = tab_registry::get_by_tab_id(&next, desc.tab_id)?.window_id;
    if desc.active == Some(true) || tab_registry::active_tab_id(&next, window_id).is_none() {
        tab_registry::set_active(&mut next, desc.tab_id)?;
    }
    Ok(next)
}

/// Registers a brand-new tab and asks the host to create its surface.
pub fn create_tab(
    state: &AppState,
    props: &CreateProperties,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let mut next = state.clone();
    let window_id = ctx.resolve_window(props.window_id);
    let tab_id = tab_registry::allocate_tab_id(&mut next)?;
    let frame_key = tab_registry::allocate_frame_key(&mut next)?;
    let url = props
        .url
        .clone()
        .unwrap_or_else(|| ctx.settings.default_url.clone());

    let mut record = TabRecord::new(tab_id, window_id, frame_key, &url);
    record.partition_number = props
        .partition_number
        .unwrap_or(ctx.settings.default_partition_number);
    record.pinned = props.pinned.unwrap_or(false);
    let partition_number = record.partition_number;
    tab_registry::insert_tab(&mut next, record, props.index);

    // The first tab of a window becomes active even when not requested.
    if props.active.unwrap_or(true) || tab_registry::active_tab_id(&next, window_id).is_none() {
        tab_registry::set_active(&mut next, tab_id)?;
    }

    effects.push(Effect::CreateSurface {
        tab_id,
        window_id,
        url,
        partition_number,
        active: tab_registry::is_active(&next, tab_id),
        index: tab_registry::strip_index(&next, tab_id).unwrap_or(0),
    });
    Ok(next)
}

/// Like [`create_tab`], but does nothing when the target window already has a
/// tab showing the same URL in the same partition.
pub fn maybe_create_tab_requested(
    state: &AppState,
    props: &CreateProperties,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let window_id = ctx.resolve_window(props.window_id);
    let url = props.url.as_deref().unwrap_or(&ctx.settings.default_url);
    let partition = props
        .partition_number
        .unwrap_or(ctx.settings.default_partition_number);
    let existing = tab_registry::tabs_in_window(state, window_id)
        .into_iter()
        .find(|t| t.url == url && t.partition_number == partition);
    if let Some(tab) = existing {
        return Err(TabError::AlreadyExists(tab.tab_id));
    }
    create_tab(state, props, ctx, effects)
}

/// Relocates a tab within or across windows.
///
/// `window_id` of [`WindowId::NONE`] keeps the tab in its current window.
/// A move into another window makes the tab active there.
pub fn move_to(
    state: &AppState,
    tab_id: TabId,
    frame_opts: &FrameOpts,
    browser_opts: &BrowserOpts,
    window_id: WindowId,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    let from = tab.window_id;
    let to = if window_id.is_none() { from } else { window_id };

    // Positions are computed against the target strip without the moving tab.
    let strip: Vec<TabId> = state
        .tab_order
        .get(&to)
        .map(|order| order.iter().copied().filter(|id| *id != tab_id).collect())
        .unwrap_or_default();
    let sibling = frame_opts.index_by_frame_key.and_then(|key| {
        strip.iter().position(|id| {
            state
                .tabs
                .get(id)
                .is_some_and(|t| t.frame_key == key)
        })
    });
    let position = match sibling {
        Some(index) if frame_opts.prepend_index_by_frame_key => index,
        Some(index) => index + 1,
        None if frame_opts.index_by_frame_key == Some(tab.frame_key) && to == from => {
            tab_registry::strip_index(state, tab_id).unwrap_or(usize::MAX)
        }
        None => frame_opts.index.unwrap_or(usize::MAX),
    };

    let mut next = state.clone();
    let placed = tab_registry::place(&mut next, tab_id, to, position)?;
    if to != from {
        tab_registry::set_active(&mut next, tab_id)?;
        effects.push(Effect::AttachToWindow {
            tab_id,
            window_id: to,
            index: placed,
            position_by_mouse_cursor: browser_opts.position_by_mouse_cursor,
        });
    }
    Ok(next)
}

/// Removes a tab. A pinned tab survives a non-forced close while
/// `keep_pinned_tabs_on_close` is set.
pub fn close_tab(
    state: &AppState,
    tab_id: TabId,
    force_close: bool,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    if tab.pinned && !force_close && ctx.settings.keep_pinned_tabs_on_close {
        return Err(TabError::PinnedCloseRefused(tab_id));
    }
    let mut next = state.clone();
    tab_registry::remove_tab(&mut next, tab_id)?;
    effects.push(Effect::CloseSurface { tab_id, force_close });
    Ok(next)
}

/// Duplicates a tab's navigable state into a new tab placed right after it.
pub fn clone_tab(
    state: &AppState,
    tab_id: TabId,
    options: &CloneOptions,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let source = tab_registry::get_by_tab_id(state, tab_id)?;
    let mut next = state.clone();
    let clone_id = tab_registry::allocate_tab_id(&mut next)?;
    let frame_key = tab_registry::allocate_frame_key(&mut next)?;

    let mut history = source.history.clone();
    if options.back {
        history = history_adapter::go_back(clone_id, &history).unwrap_or(history);
    } else if options.forward {
        history = history_adapter::go_forward(clone_id, &history).unwrap_or(history);
    }
    let moved_in_history = history.current_index != source.history.current_index;
    let url = history
        .current()
        .map(|e| e.url.clone())
        .unwrap_or_else(|| source.url.clone());

    let record = TabRecord {
        tab_id: clone_id,
        frame_key,
        url,
        pinned: false,
        audio_muted: false,
        dev_tools_open: false,
        message_box_detail: None,
        about_details: None,
        history,
        ..source.clone()
    };
    let window_id = record.window_id;
    let position = tab_registry::strip_index(state, tab_id).map(|i| i + 1);
    let current_index = record.history.current_index;
    tab_registry::insert_tab(&mut next, record, position);

    let active = options.active.unwrap_or(true);
    if active {
        tab_registry::set_active(&mut next, clone_id)?;
    }
    effects.push(Effect::CloneSurface {
        source_tab_id: tab_id,
        tab_id: clone_id,
        window_id,
        active,
    });
    if let (true, Some(index)) = (moved_in_history, current_index) {
        effects.push(Effect::NavigateToIndex {
            tab_id: clone_id,
            index,
        });
    }
    Ok(next)
}

/// Sets `pinned`, or toggles it when `pinned` is `None`. Pinning moves the tab
/// to the end of the pinned section; unpinning moves it just after.
pub fn pin(state: &AppState, tab_id: TabId, pinned: Option<bool>) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    let target = pinned.unwrap_or(!tab.pinned);
    if target == tab.pinned {
        return Ok(state.clone());
    }
    let window_id = tab.window_id;
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| t.pinned = target)?;
    let position = if target { usize::MAX } else { 0 };
    tab_registry::place(&mut next, tab_id, window_id, position)?;
    Ok(next)
}

pub fn set_audio_muted(
    state: &AppState,
    tab_id: TabId,
    muted: bool,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    if tab.audio_muted == muted {
        return Ok(state.clone());
    }
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| t.audio_muted = muted)?;
    effects.push(Effect::SetAudioMuted { tab_id, muted });
    Ok(next)
}

/// Makes the tab the one active tab of its window.
pub fn set_active(state: &AppState, tab_id: TabId, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    tab_registry::get_by_tab_id(state, tab_id)?;
    if tab_registry::is_active(state, tab_id) {
        return Ok(state.clone());
    }
    let mut next = state.clone();
    let window_id = tab_registry::set_active(&mut next, tab_id)?;
    effects.push(Effect::ActivateSurface { tab_id, window_id });
    Ok(next)
}

pub fn toggle_dev_tools(state: &AppState, tab_id: TabId, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    let open = !tab_registry::get_by_tab_id(state, tab_id)?.dev_tools_open;
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| t.dev_tools_open = open)?;
    effects.push(Effect::ToggleDevTools { tab_id, open });
    Ok(next)
}

/// Starts navigation to `url`. The new location is recorded in the history
/// right away and any error-page context from the previous load is dropped.
pub fn load_url(state: &AppState, tab_id: TabId, url: &str, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    let history = history_adapter::push_entry(&tab.history, url, None);
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| {
        t.url = url.to_string();
        t.history = history;
        t.about_details = None;
    })?;
    effects.push(Effect::LoadUrl {
        tab_id,
        url: url.to_string(),
    });
    Ok(next)
}

/// Loads `url` in the active tab of `window_id` (the caller's active window
/// when `window_id` is the unassigned sentinel).
pub fn load_url_in_active_tab(
    state: &AppState,
    window_id: WindowId,
    url: &str,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let window_id = ctx.resolve_window(Some(window_id));
    let tab_id = tab_registry::active_tab(state, window_id)?.tab_id;
    load_url(state, tab_id, url, effects)
}

pub fn go_back(state: &AppState, tab_id: TabId, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    navigate_history(state, tab_id, effects, |h| history_adapter::go_back(tab_id, h))
}

pub fn go_forward(state: &AppState, tab_id: TabId, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    navigate_history(state, tab_id, effects, |h| history_adapter::go_forward(tab_id, h))
}

pub fn go_to_index(state: &AppState, tab_id: TabId, index: i64, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    navigate_history(state, tab_id, effects, |h| history_adapter::go_to_index(h, index))
}

fn navigate_history<F>(
    state: &AppState,
    tab_id: TabId,
    effects: &mut Vec<Effect>,
    step: F,
) -> Result<AppState, TabError>
where
    F: FnOnce(&NavigationHistory) -> Result<NavigationHistory, TabError>,
{
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    let history = step(&tab.history)?;
    let (index, url) = match (history.current_index, history.current()) {
        (Some(index), Some(entry)) => (index, entry.url.clone()),
        _ => return Err(TabError::HistoryBoundary(tab_id)),
    };
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| {
        t.url = url;
        t.history = history;
    })?;
    effects.push(Effect::NavigateToIndex { tab_id, index });
    Ok(next)
}

/// Folds a frame-state update from the window into the tab record.
pub fn update_frame(state: &AppState, frame: &FrameUpdate) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, frame.tab_id)?;
    let mut record = tab.clone();
    if let Some(key) = frame.key {
        record.frame_key = key;
    }
    if let Some(location) = &frame.location {
        record.history = history_adapter::push_entry(&record.history, location, frame.title.as_deref());
        record.url = location.clone();
    }
    if let Some(title) = &frame.title {
        record.title = Some(title.clone());
    }
    if let Some(muted) = frame.audio_muted {
        record.audio_muted = muted;
    }
    let pinned = frame.pinned;
    let mut next = state.clone();
    tab_registry::update_tab(&mut next, record)?;
    tab_registry::reserve_ids(&mut next);
    match pinned {
        Some(p) => pin(&next, frame.tab_id, Some(p)),
        None => Ok(next),
    }
}

pub fn show_message_box(state: &AppState, tab_id: TabId, detail: &MessageBoxDetail) -> Result<AppState, TabError> {
    tab_registry::get_by_tab_id(state, tab_id)?;
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| {
        t.message_box_detail = Some(detail.clone());
    })?;
    Ok(next)
}

/// Replaces the content of a message box that is already showing.
pub fn update_message_box(state: &AppState, tab_id: TabId, detail: &MessageBoxDetail) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    if tab.message_box_detail.is_none() {
        return Err(TabError::NoMessageBox(tab_id));
    }
    show_message_box(state, tab_id, detail)
}

/// Clears the message box and forwards the response to its opener.
pub fn dismiss_message_box(
    state: &AppState,
    tab_id: TabId,
    response: MessageBoxResponse,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    if tab.message_box_detail.is_none() {
        return Err(TabError::NoMessageBox(tab_id));
    }
    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| t.message_box_detail = None)?;
    effects.push(Effect::MessageBoxResponse { tab_id, response });
    Ok(next)
}
