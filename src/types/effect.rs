use serde::Serialize;

use super::history::{HistoryDirection, HistoryListEntry};
use super::tab::{MessageBoxResponse, TabId, WindowId};

/// Resource id handed to the rendering surface when a plugin is authorized.
pub const FLASH_RESOURCE_ID: &str = "flash";

/// Side-effect intents emitted by the reducer, executed afterwards by an
/// [`crate::host::EffectExecutor`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Effect {
    /// Create a rendering surface for a freshly registered tab.
    CreateSurface {
        tab_id: TabId,
        window_id: WindowId,
        url: String,
        partition_number: u32,
        active: bool,
        index: usize,
    },
    /// Create a surface for `tab_id` that duplicates the source's session history.
    CloneSurface {
        source_tab_id: TabId,
        tab_id: TabId,
        window_id: WindowId,
        active: bool,
    },
    CloseSurface {
        tab_id: TabId,
        force_close: bool,
    },
    ActivateSurface {
        tab_id: TabId,
        window_id: WindowId,
    },
    /// Reparent a surface into another window.
    AttachToWindow {
        tab_id: TabId,
        window_id: WindowId,
        index: usize,
        position_by_mouse_cursor: bool,
    },
    SetAudioMuted {
        tab_id: TabId,
        muted: bool,
    },
    ToggleDevTools {
        tab_id: TabId,
        open: bool,
    },
    LoadUrl {
        tab_id: TabId,
        url: String,
    },
    NavigateToIndex {
        tab_id: TabId,
        index: usize,
    },
    AuthorizePlugin {
        tab_id: TabId,
        resource_id: &'static str,
    },
    ShowHistoryPicker {
        direction: HistoryDirection,
        entries: Vec<HistoryListEntry>,
        anchor_x: f64,
        anchor_y: f64,
        partition_number: u32,
        tab_id: TabId,
        window_id: WindowId,
    },
    MessageBoxResponse {
        tab_id: TabId,
        response: MessageBoxResponse,
    },
}

impl Effect {
    pub fn tab_id(&self) -> TabId {
        match self {
            Effect::CreateSurface { tab_id, .. }
            | Effect::CloneSurface { tab_id, .. }
            | Effect::CloseSurface { tab_id, .. }
            | Effect::ActivateSurface { tab_id, .. }
            | Effect::AttachToWindow { tab_id, .. }
            | Effect::SetAudioMuted { tab_id, .. }
            | Effect::ToggleDevTools { tab_id, .. }
            | Effect::LoadUrl { tab_id, .. }
            | Effect::NavigateToIndex { tab_id, .. }
            | Effect::AuthorizePlugin { tab_id, .. }
            | Effect::ShowHistoryPicker { tab_id, .. }
            | Effect::MessageBoxResponse { tab_id, .. } => *tab_id,
        }
    }
}
