//! Action reducer: the single state-transition engine for the tab registry.
//!
//! [`reduce`] maps `(state, action)` to the next state plus the side effects
//! the host must run. It never fails: reference misses, precondition misses
//! and unavailable collaborators are absorbed and the input snapshot is
//! returned as-is (the same `Arc`).

use std::sync::Arc;

use tracing::{debug, trace};

use crate::host::ReduceContext;
use crate::managers::history_adapter;
use crate::managers::tab_lifecycle;
use crate::managers::tab_registry;
use crate::types::action::{Action, AnchorRect, BrowserOpts, ErrorDetails, FrameOpts, MuteRequest};
use crate::types::drag::{DragData, DragOverData, DragState, DragType};
use crate::types::effect::{Effect, FLASH_RESOURCE_ID};
use crate::types::errors::TabError;
use crate::types::history::HistoryDirection;
use crate::types::state::AppState;
use crate::types::tab::{AboutDetails, FrameKey, TabId, WindowId};

/// Result of one reducer call.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Arc<AppState>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
            effects: Vec::new(),
        }
    }

    /// Whether the state snapshot was replaced.
    pub fn changed_from(&self, previous: &Arc<AppState>) -> bool {
        !Arc::ptr_eq(&self.state, previous)
    }
}

/// Applies `action` to `state`.
pub fn reduce(state: &Arc<AppState>, action: Action, ctx: &ReduceContext) -> Transition {
    let kind = action.kind();
    trace!(action = kind, "reducing");

    let mut effects = Vec::new();
    let outcome = apply(state, action, ctx, &mut effects);

    match outcome {
        Ok(Some(next)) if next != **state => Transition {
            state: Arc::new(next),
            effects,
        },
        Ok(_) => Transition {
            state: Arc::clone(state),
            effects,
        },
        Err(err) => {
            debug!(action = kind, error = %err, "action ignored");
            Transition::unchanged(state)
        }
    }
}

/// `Ok(None)` means the action was handled without touching state.
fn apply(
    state: &AppState,
    action: Action,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<Option<AppState>, TabError> {
    let next = match action {
        Action::StateInitialize { snapshot } => tab_lifecycle::init(state, &snapshot),
        Action::TabCreated { tab } | Action::TabUpdated { tab } => {
            tab_lifecycle::maybe_create_tab(state, &tab, ctx)?
        }
        Action::TabMoved {
            tab_id,
            frame_opts,
            browser_opts,
            window_id,
        } => {
            let window_id = window_id.unwrap_or(WindowId::NONE);
            tab_lifecycle::move_to(state, tab_id, &frame_opts, &browser_opts, window_id, effects)?
        }
        Action::CreateTabRequested { create_properties } => {
            tab_lifecycle::create_tab(state, &create_properties, ctx, effects)?
        }
        Action::MaybeCreateTabRequested { create_properties } => {
            tab_lifecycle::maybe_create_tab_requested(state, &create_properties, ctx, effects)?
        }
        Action::ActiveSurfaceClosed => active_surface_closed(state, ctx, effects)?,
        Action::TabClosed {
            tab_value,
            force_close,
        } => {
            let tab_id = tab_value.tab_id.ok_or(TabError::MissingTabId)?;
            tab_lifecycle::close_tab(state, tab_id, force_close, ctx, effects)?
        }
        Action::AllowFlashOnce { tab_id, url } | Action::AllowFlashAlways { tab_id, url } => {
            allow_flash(tab_id, &url, ctx, effects)?;
            return Ok(None);
        }
        Action::TabCloned { tab_id, options } => tab_lifecycle::clone_tab(state, tab_id, &options, effects)?,
        Action::TabPinned { tab_id, pinned } => tab_lifecycle::pin(state, tab_id, pinned)?,
        Action::AudioMutedOne { tab_id, muted } => {
            tab_lifecycle::set_audio_muted(state, tab_id, muted, effects)?
        }
        Action::AudioMutedAll { frame_list } => set_all_audio_muted(state, &frame_list, effects),
        Action::ActiveFrameSet { tab_id } => tab_lifecycle::set_active(state, tab_id, effects)?,
        Action::DevtoolsToggled { tab_id } => tab_lifecycle::toggle_dev_tools(state, tab_id, effects)?,
        Action::LoadUrlRequested { tab_id, url } => tab_lifecycle::load_url(state, tab_id, &url, effects)?,
        Action::LoadUrlInActiveTab { window_id, url } => {
            tab_lifecycle::load_url_in_active_tab(state, window_id, &url, ctx, effects)?
        }
        Action::GoBack { tab_id } => tab_lifecycle::go_back(state, tab_id, effects)?,
        Action::GoForward { tab_id } => tab_lifecycle::go_forward(state, tab_id, effects)?,
        Action::GoToIndex { tab_id, index } => tab_lifecycle::go_to_index(state, tab_id, index, effects)?,
        Action::GoBackLong { tab_id, rect } => {
            show_history_picker(state, tab_id, HistoryDirection::Back, rect, ctx, effects)?;
            return Ok(None);
        }
        Action::GoForwardLong { tab_id, rect } => {
            show_history_picker(state, tab_id, HistoryDirection::Forward, rect, ctx, effects)?;
            return Ok(None);
        }
        Action::FrameChanged { frame } => tab_lifecycle::update_frame(state, &frame)?,
        Action::FrameErrorSet {
            frame_props,
            error_details,
        } => set_frame_error(state, frame_props.tab_id, &error_details, ctx)?,
        Action::DragStarted {
            drag_type,
            data,
            window_id,
        } => drag_started(state, drag_type, data, window_id),
        Action::DraggedOver {
            dragging_over_key,
            dragging_over_left_half,
            window_id,
        } => dragged_over(state, dragging_over_key, dragging_over_left_half, window_id)?,
        Action::DragEnded => drag_ended(state, effects)?,
        Action::TabMessageBoxShown { tab_id, detail } => {
            tab_lifecycle::show_message_box(state, tab_id, &detail)?
        }
        Action::TabMessageBoxUpdated { tab_id, detail } => {
            tab_lifecycle::update_message_box(state, tab_id, &detail)?
        }
        Action::TabMessageBoxDismissed { tab_id, response } => {
            tab_lifecycle::dismiss_message_box(state, tab_id, response, effects)?
        }
        Action::Unknown => return Ok(None),
    };
    Ok(Some(next))
}

/// Closes the active tab of the focused window, or its inspector if that is open.
fn active_surface_closed(
    state: &AppState,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<AppState, TabError> {
    let window_id = ctx
        .windows
        .active_window_id()
        .ok_or(TabError::WindowNotFound(WindowId::NONE))?;
    let tab = tab_registry::active_tab(state, window_id)?;
    if tab.dev_tools_open {
        tab_lifecycle::toggle_dev_tools(state, tab.tab_id, effects)
    } else {
        tab_lifecycle::close_tab(state, tab.tab_id, false, ctx, effects)
    }
}

/// Authorizes the plugin only if the surface still shows the URL it was requested for.
fn allow_flash(tab_id: TabId, url: &str, ctx: &ReduceContext, effects: &mut Vec<Effect>) -> Result<(), TabError> {
    let surface = ctx
        .live_surface(tab_id)
        .ok_or(TabError::SurfaceUnavailable(tab_id))?;
    if surface.url() == url {
        effects.push(Effect::AuthorizePlugin {
            tab_id,
            resource_id: FLASH_RESOURCE_ID,
        });
    } else {
        debug!(tab = %tab_id, "surface navigated away; plugin not authorized");
    }
    Ok(())
}

/// Threads the state through each request in list order; a request naming a
/// missing tab is skipped without affecting the others.
fn set_all_audio_muted(state: &AppState, frame_list: &[MuteRequest], effects: &mut Vec<Effect>) -> AppState {
    frame_list.iter().fold(state.clone(), |current, request| {
        let mut step = Vec::new();
        match tab_lifecycle::set_audio_muted(&current, request.tab_id, request.muted, &mut step) {
            Ok(next) => {
                effects.append(&mut step);
                next
            }
            Err(err) => {
                debug!(error = %err, "mute request skipped");
                current
            }
        }
    })
}

fn show_history_picker(
    state: &AppState,
    tab_id: TabId,
    direction: HistoryDirection,
    rect: AnchorRect,
    ctx: &ReduceContext,
    effects: &mut Vec<Effect>,
) -> Result<(), TabError> {
    let tab = tab_registry::get_by_tab_id(state, tab_id)?;
    let Some(entries) = history_adapter::history_entries(Some(tab)) else {
        return Ok(());
    };
    let window_id = ctx.windows.active_window_id().unwrap_or(tab.window_id);
    effects.push(Effect::ShowHistoryPicker {
        direction,
        entries,
        anchor_x: rect.left,
        anchor_y: rect.bottom,
        partition_number: tab.partition_number,
        tab_id,
        window_id,
    });
    Ok(())
}

/// Captures error-page context for a failed load.
fn set_frame_error(
    state: &AppState,
    tab_id: TabId,
    details: &ErrorDetails,
    ctx: &ReduceContext,
) -> Result<AppState, TabError> {
    let surface = ctx
        .live_surface(tab_id)
        .ok_or(TabError::SurfaceUnavailable(tab_id))?;
    tab_registry::get_by_tab_id(state, tab_id)?;

    // Skip back over entries that are the failing URL itself, so a failed
    // reload does not report itself as the previous location. Stops at the
    // first entry rather than stepping before it.
    let mut previous_location = Some(surface.url().to_string());
    let mut index = surface.current_entry_index();
    while previous_location.as_deref() == Some(details.url.as_str()) {
        previous_location = match index {
            Some(i) if i > 0 => {
                index = Some(i - 1);
                surface.entry_url_at(i - 1).map(str::to_string)
            }
            _ => None,
        };
    }

    let title = details
        .title
        .clone()
        .unwrap_or_else(|| ctx.error_text.error_text(details.error_code.unwrap_or(0)));
    let mut about = AboutDetails {
        title,
        message: details.message.clone(),
        previous_location,
        url: Some(details.url.clone()),
        error_code: details.error_code,
        extra: details.extra.clone(),
    };
    // Payload fields win over the derived ones.
    if let Some(location) = about.extra.remove("previousLocation") {
        about.previous_location = location.as_str().map(str::to_string);
    }

    let mut next = state.clone();
    tab_registry::modify_tab(&mut next, tab_id, |t| t.about_details = Some(about))?;
    Ok(next)
}

fn drag_started(state: &AppState, drag_type: DragType, data: DragData, window_id: WindowId) -> AppState {
    AppState {
        drag: Some(DragState {
            drag_type,
            data,
            drag_over: None,
            drop_window_id: window_id,
        }),
        ..state.clone()
    }
}

fn dragged_over(
    state: &AppState,
    key: FrameKey,
    left_half: bool,
    window_id: WindowId,
) -> Result<AppState, TabError> {
    let drag = state.drag.as_ref().ok_or(TabError::NoPendingDrag)?;
    let drag = DragState {
        drag_over: Some(DragOverData {
            dragging_over_key: key,
            dragging_over_left_half: left_half,
        }),
        drop_window_id: if window_id.is_none() { drag.drop_window_id } else { window_id },
        ..drag.clone()
    };
    Ok(AppState {
        drag: Some(drag),
        ..state.clone()
    })
}

/// Resolves a pending tab drag into a move, then clears the drag.
fn drag_ended(state: &AppState, effects: &mut Vec<Effect>) -> Result<AppState, TabError> {
    let drag = state
        .drag
        .as_ref()
        .filter(|d| d.is_tab())
        .ok_or(TabError::NoPendingDrag)?;
    let frame_opts = FrameOpts {
        index: None,
        index_by_frame_key: drag.drag_over.map(|o| o.dragging_over_key),
        prepend_index_by_frame_key: drag.drag_over.is_some_and(|o| o.dragging_over_left_half),
    };
    let browser_opts = BrowserOpts {
        position_by_mouse_cursor: true,
    };

    let dragged = drag.data.tab_id.or_else(|| {
        drag.data.frame_key.and_then(|key| {
            state
                .tabs
                .values()
                .find(|t| t.frame_key == key)
                .map(|t| t.tab_id)
        })
    });
    // Without a hover target a drop in the tab's own window has nowhere to go.
    let dragged = dragged.filter(|&tab_id| {
        drag.drag_over.is_some()
            || (!drag.drop_window_id.is_none()
                && state
                    .tabs
                    .get(&tab_id)
                    .is_some_and(|t| t.window_id != drag.drop_window_id))
    });
    let moved = match dragged {
        Some(tab_id) => {
            let mut step = Vec::new();
            match tab_lifecycle::move_to(state, tab_id, &frame_opts, &browser_opts, drag.drop_window_id, &mut step) {
                Ok(next) => {
                    effects.append(&mut step);
                    next
                }
                Err(err) => {
                    debug!(error = %err, "tab drop did not move");
                    state.clone()
                }
            }
        }
        None => state.clone(),
    };
    Ok(AppState { drag: None, ..moved })
}
