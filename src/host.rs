//! Seams to the collaborators that live outside the tab core.
//!
//! Queries (`RenderingSurface`, `SurfaceRegistry`, `WindowManager`,
//! `ErrorText`) are read during reduction. Commands travel the other way as
//! [`Effect`] values and are handed to an [`EffectExecutor`] after the new
//! state has been produced.

use std::collections::HashMap;

use crate::types::effect::Effect;
use crate::types::settings::ShellSettings;
use crate::types::tab::{TabId, WindowId};

/// Live view that loads and displays a tab's content.
pub trait RenderingSurface {
    fn is_destroyed(&self) -> bool;
    fn url(&self) -> &str;
    fn current_entry_index(&self) -> Option<usize>;
    fn entry_url_at(&self, index: usize) -> Option<&str>;
}

pub trait SurfaceRegistry {
    fn surface(&self, tab_id: TabId) -> Option<&dyn RenderingSurface>;
}

pub trait WindowManager {
    fn active_window_id(&self) -> Option<WindowId>;
}

/// Localized fallback title for a network error code.
pub trait ErrorText {
    fn error_text(&self, error_code: i32) -> String;
}

/// Runs reducer-emitted effects. Fire-and-forget: nothing flows back into state.
pub trait EffectExecutor {
    fn execute(&mut self, effect: &Effect);
}

/// Read-only collaborators and settings consulted by the reducer.
#[derive(Clone, Copy)]
pub struct ReduceContext<'a> {
    pub surfaces: &'a dyn SurfaceRegistry,
    pub windows: &'a dyn WindowManager,
    pub error_text: &'a dyn ErrorText,
    pub settings: &'a ShellSettings,
}

impl<'a> ReduceContext<'a> {
    /// Resolves the unassigned sentinel to the caller's active window.
    pub fn resolve_window(&self, window_id: Option<WindowId>) -> WindowId {
        match window_id {
            Some(id) if !id.is_none() => id,
            _ => self.windows.active_window_id().unwrap_or(WindowId::NONE),
        }
    }

    /// Surface for `tab_id`, skipping destroyed ones.
    pub fn live_surface(&self, tab_id: TabId) -> Option<&'a dyn RenderingSurface> {
        self.surfaces.surface(tab_id).filter(|s| !s.is_destroyed())
    }
}

// === In-memory host ===

/// Simulated rendering surface with its own session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    pub entries: Vec<String>,
    pub current_index: Option<usize>,
    pub destroyed: bool,
    pub dev_tools_open: bool,
    pub muted: bool,
    pub authorized_plugins: Vec<String>,
}

impl MemorySurface {
    pub fn new(url: &str) -> Self {
        Self::with_history(vec![url.to_string()], 0)
    }

    pub fn with_history(entries: Vec<String>, current_index: usize) -> Self {
        let current_index = if entries.is_empty() {
            None
        } else {
            Some(current_index.min(entries.len() - 1))
        };
        Self {
            entries,
            current_index,
            destroyed: false,
            dev_tools_open: false,
            muted: false,
            authorized_plugins: Vec::new(),
        }
    }

    fn navigate(&mut self, url: &str) {
        if let Some(i) = self.current_index {
            self.entries.truncate(i + 1);
        }
        self.entries.push(url.to_string());
        self.current_index = Some(self.entries.len() - 1);
    }
}

impl RenderingSurface for MemorySurface {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn url(&self) -> &str {
        self.current_index
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn current_entry_index(&self) -> Option<usize> {
        self.current_index
    }

    fn entry_url_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}

/// Host that keeps surfaces in memory and applies effects to them.
///
/// Backs the replay binary and the test suite.
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub surfaces: HashMap<TabId, MemorySurface>,
    pub active_window: Option<WindowId>,
    /// Every effect executed, in order.
    pub executed: Vec<Effect>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_window(mut self, window_id: WindowId) -> Self {
        self.active_window = Some(window_id);
        self
    }

    pub fn with_surface(mut self, tab_id: TabId, surface: MemorySurface) -> Self {
        self.surfaces.insert(tab_id, surface);
        self
    }
}

impl SurfaceRegistry for MemoryHost {
    fn surface(&self, tab_id: TabId) -> Option<&dyn RenderingSurface> {
        self.surfaces
            .get(&tab_id)
            .map(|s| s as &dyn RenderingSurface)
    }
}

impl WindowManager for MemoryHost {
    fn active_window_id(&self) -> Option<WindowId> {
        self.active_window
    }
}

impl EffectExecutor for MemoryHost {
    fn execute(&mut self, effect: &Effect) {
        match effect {
            Effect::CreateSurface { tab_id, url, .. } => {
                self.surfaces.insert(*tab_id, MemorySurface::new(url));
            }
            Effect::CloneSurface {
                source_tab_id,
                tab_id,
                ..
            } => {
                if let Some(source) = self.surfaces.get(source_tab_id).cloned() {
                    self.surfaces.insert(*tab_id, MemorySurface { authorized_plugins: Vec::new(), ..source });
                }
            }
            Effect::CloseSurface { tab_id, .. } => {
                if let Some(surface) = self.surfaces.get_mut(tab_id) {
                    surface.destroyed = true;
                }
            }
            Effect::ActivateSurface { window_id, .. } | Effect::AttachToWindow { window_id, .. } => {
                self.active_window = Some(*window_id);
            }
            Effect::SetAudioMuted { tab_id, muted } => {
                if let Some(surface) = self.surfaces.get_mut(tab_id) {
                    surface.muted = *muted;
                }
            }
            Effect::ToggleDevTools { tab_id, open } => {
                if let Some(surface) = self.surfaces.get_mut(tab_id) {
                    surface.dev_tools_open = *open;
                }
            }
            Effect::LoadUrl { tab_id, url } => {
                if let Some(surface) = self.surfaces.get_mut(tab_id) {
                    surface.navigate(url);
                }
            }
            Effect::NavigateToIndex { tab_id, index } => {
                if let Some(surface) = self.surfaces.get_mut(tab_id) {
                    if *index < surface.entries.len() {
                        surface.current_index = Some(*index);
                    }
                }
            }
            Effect::AuthorizePlugin {
                tab_id,
                resource_id,
            } => {
                if let Some(surface) = self.surfaces.get_mut(tab_id) {
                    surface.authorized_plugins.push(resource_id.to_string());
                }
            }
            Effect::ShowHistoryPicker { .. } | Effect::MessageBoxResponse { .. } => {}
        }
        self.executed.push(effect.clone());
    }
}
