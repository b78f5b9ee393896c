use serde::{Deserialize, Serialize};

use super::tab::{FrameKey, TabId, WindowId};

/// Kind of payload being dragged. Only tabs are resolved by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragType {
    Tab,
    Bookmark,
    Other,
}

/// The dragged item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragData {
    #[serde(default)]
    pub tab_id: Option<TabId>,
    #[serde(default)]
    pub frame_key: Option<FrameKey>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Where the pointer currently hovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOverData {
    pub dragging_over_key: FrameKey,
    /// Pointer is over the left half of the target, so the drop goes before it.
    #[serde(default)]
    pub dragging_over_left_half: bool,
}

/// In-progress drag gesture. Present only between drag start and drag end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    #[serde(rename = "type")]
    pub drag_type: DragType,
    pub data: DragData,
    #[serde(default, rename = "dragOverData")]
    pub drag_over: Option<DragOverData>,
    #[serde(default)]
    pub drop_window_id: WindowId,
}

impl DragState {
    pub fn is_tab(&self) -> bool {
        self.drag_type == DragType::Tab
    }
}
