use thiserror::Error;

use super::tab::{TabId, WindowId};

// === TabError ===

/// Reasons a tab operation did not apply. The reducer absorbs these and
/// leaves the state unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(TabId),
    /// No tab strip or active tab is known for the window.
    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),
    /// A history index outside the tab's entries.
    #[error("Invalid history index: {0}")]
    InvalidIndex(i64),
    /// Back/forward at the end of the history.
    #[error("No history entry in that direction for tab {0}")]
    HistoryBoundary(TabId),
    /// `drag-ended` without a tab drag in progress.
    #[error("No tab drag in progress")]
    NoPendingDrag,
    /// The rendering surface is missing or destroyed.
    #[error("Rendering surface unavailable for tab {0}")]
    SurfaceUnavailable(TabId),
    /// A pinned tab was asked to close without force.
    #[error("Pinned tab {0} kept open")]
    PinnedCloseRefused(TabId),
    /// A creation request matched a tab that already exists.
    #[error("Equivalent tab already exists: {0}")]
    AlreadyExists(TabId),
    /// The tab has no message box to update or dismiss.
    #[error("No message box on tab {0}")]
    NoMessageBox(TabId),
    /// The action names no tab at all.
    #[error("Action carries no tab id")]
    MissingTabId,
    /// No tab ids or frame keys are left to allocate.
    #[error("Tab id space exhausted")]
    IdSpaceExhausted,
}

// === SettingsError ===

/// Errors related to shell settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
}

// === LocaleError ===

/// Errors related to localization engine operations.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The requested locale is not supported.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
    /// The locale file was not found or could not be parsed.
    #[error("Locale file not found: {0}")]
    FileNotFound(String),
}

// === ReplayError ===

/// Errors raised by the action replay driver.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read actions: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed action on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}
