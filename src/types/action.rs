use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::drag::{DragData, DragType};
use super::state::StateSnapshot;
use super::tab::{FrameKey, MessageBoxDetail, MessageBoxResponse, TabId, WindowId};

/// A requested state transition. Tagged by `actionType` on the wire; any
/// unrecognised tag deserializes to [`Action::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "actionType",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    StateInitialize {
        snapshot: StateSnapshot,
    },
    TabCreated {
        tab: TabDescriptor,
    },
    TabUpdated {
        tab: TabDescriptor,
    },
    TabMoved {
        tab_id: TabId,
        #[serde(default)]
        frame_opts: FrameOpts,
        #[serde(default)]
        browser_opts: BrowserOpts,
        #[serde(default)]
        window_id: Option<WindowId>,
    },
    CreateTabRequested {
        #[serde(default)]
        create_properties: CreateProperties,
    },
    MaybeCreateTabRequested {
        #[serde(default)]
        create_properties: CreateProperties,
    },
    ActiveSurfaceClosed,
    TabClosed {
        #[serde(default)]
        tab_value: TabValueRef,
        #[serde(default)]
        force_close: bool,
    },
    AllowFlashOnce {
        tab_id: TabId,
        url: String,
    },
    AllowFlashAlways {
        tab_id: TabId,
        url: String,
    },
    TabCloned {
        tab_id: TabId,
        #[serde(default)]
        options: CloneOptions,
    },
    TabPinned {
        tab_id: TabId,
        /// `None` toggles the current value.
        #[serde(default)]
        pinned: Option<bool>,
    },
    AudioMutedOne {
        tab_id: TabId,
        muted: bool,
    },
    AudioMutedAll {
        frame_list: Vec<MuteRequest>,
    },
    ActiveFrameSet {
        tab_id: TabId,
    },
    DevtoolsToggled {
        tab_id: TabId,
    },
    LoadUrlRequested {
        tab_id: TabId,
        url: String,
    },
    LoadUrlInActiveTab {
        window_id: WindowId,
        url: String,
    },
    GoBack {
        tab_id: TabId,
    },
    GoForward {
        tab_id: TabId,
    },
    GoToIndex {
        tab_id: TabId,
        index: i64,
    },
    GoBackLong {
        tab_id: TabId,
        #[serde(default)]
        rect: AnchorRect,
    },
    GoForwardLong {
        tab_id: TabId,
        #[serde(default)]
        rect: AnchorRect,
    },
    FrameChanged {
        frame: FrameUpdate,
    },
    FrameErrorSet {
        frame_props: FrameProps,
        error_details: ErrorDetails,
    },
    DragStarted {
        drag_type: DragType,
        data: DragData,
        #[serde(default)]
        window_id: WindowId,
    },
    DraggedOver {
        dragging_over_key: FrameKey,
        #[serde(default)]
        dragging_over_left_half: bool,
        #[serde(default)]
        window_id: WindowId,
    },
    DragEnded,
    TabMessageBoxShown {
        tab_id: TabId,
        detail: MessageBoxDetail,
    },
    TabMessageBoxUpdated {
        tab_id: TabId,
        detail: MessageBoxDetail,
    },
    TabMessageBoxDismissed {
        tab_id: TabId,
        response: MessageBoxResponse,
    },
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Wire name of the action, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::StateInitialize { .. } => "state-initialize",
            Action::TabCreated { .. } => "tab-created",
            Action::TabUpdated { .. } => "tab-updated",
            Action::TabMoved { .. } => "tab-moved",
            Action::CreateTabRequested { .. } => "create-tab-requested",
            Action::MaybeCreateTabRequested { .. } => "maybe-create-tab-requested",
            Action::ActiveSurfaceClosed => "active-surface-closed",
            Action::TabClosed { .. } => "tab-closed",
            Action::AllowFlashOnce { .. } => "allow-flash-once",
            Action::AllowFlashAlways { .. } => "allow-flash-always",
            Action::TabCloned { .. } => "tab-cloned",
            Action::TabPinned { .. } => "tab-pinned",
            Action::AudioMutedOne { .. } => "audio-muted-one",
            Action::AudioMutedAll { .. } => "audio-muted-all",
            Action::ActiveFrameSet { .. } => "active-frame-set",
            Action::DevtoolsToggled { .. } => "devtools-toggled",
            Action::LoadUrlRequested { .. } => "load-url-requested",
            Action::LoadUrlInActiveTab { .. } => "load-url-in-active-tab",
            Action::GoBack { .. } => "go-back",
            Action::GoForward { .. } => "go-forward",
            Action::GoToIndex { .. } => "go-to-index",
            Action::GoBackLong { .. } => "go-back-long",
            Action::GoForwardLong { .. } => "go-forward-long",
            Action::FrameChanged { .. } => "frame-changed",
            Action::FrameErrorSet { .. } => "frame-error-set",
            Action::DragStarted { .. } => "drag-started",
            Action::DraggedOver { .. } => "dragged-over",
            Action::DragEnded => "drag-ended",
            Action::TabMessageBoxShown { .. } => "tab-message-box-shown",
            Action::TabMessageBoxUpdated { .. } => "tab-message-box-updated",
            Action::TabMessageBoxDismissed { .. } => "tab-message-box-dismissed",
            Action::Unknown => "unknown",
        }
    }
}

/// Descriptor used by `tab-created` / `tab-updated`. Absent fields leave an
/// existing record untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDescriptor {
    pub tab_id: TabId,
    #[serde(default)]
    pub window_id: Option<WindowId>,
    #[serde(default)]
    pub frame_key: Option<FrameKey>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub partition_number: Option<u32>,
    #[serde(default)]
    pub pinned: Option<bool>,
    #[serde(default)]
    pub audio_muted: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub index: Option<usize>,
}

impl TabDescriptor {
    pub fn new(tab_id: TabId) -> Self {
        Self {
            tab_id,
            window_id: None,
            frame_key: None,
            url: None,
            title: None,
            partition_number: None,
            pinned: None,
            audio_muted: None,
            active: None,
            index: None,
        }
    }
}

/// Properties for a requested new tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProperties {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub window_id: Option<WindowId>,
    #[serde(default)]
    pub partition_number: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub pinned: Option<bool>,
    #[serde(default)]
    pub index: Option<usize>,
}

/// Placement within the target window's tab strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOpts {
    #[serde(default)]
    pub index: Option<usize>,
    /// Place next to the tab owning this frame key.
    #[serde(default)]
    pub index_by_frame_key: Option<FrameKey>,
    /// With `index_by_frame_key`: insert before rather than after the sibling.
    #[serde(default)]
    pub prepend_index_by_frame_key: bool,
}

/// Window-level options for a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserOpts {
    #[serde(default)]
    pub position_by_mouse_cursor: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabValueRef {
    #[serde(default)]
    pub tab_id: Option<TabId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneOptions {
    /// Activate the clone. Defaults to true.
    #[serde(default)]
    pub active: Option<bool>,
    /// Navigate the clone one step back after cloning.
    #[serde(default)]
    pub back: bool,
    /// Navigate the clone one step forward after cloning.
    #[serde(default)]
    pub forward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuteRequest {
    pub tab_id: TabId,
    pub muted: bool,
}

/// Screen anchor of the button that was long-pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
}

/// Frame-state update pushed by the window. Absent fields are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameUpdate {
    pub tab_id: TabId,
    #[serde(default)]
    pub key: Option<FrameKey>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub audio_muted: Option<bool>,
    #[serde(default)]
    pub pinned: Option<bool>,
}

impl FrameUpdate {
    pub fn new(tab_id: TabId) -> Self {
        Self {
            tab_id,
            key: None,
            location: None,
            title: None,
            audio_muted: None,
            pinned: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameProps {
    pub tab_id: TabId,
}

/// Payload of a failed load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<i32>,
    /// Any further fields; they override the derived ones on conflict.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
