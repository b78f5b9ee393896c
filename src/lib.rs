//! Tabshell: the tab-lifecycle core of a multi-window browser shell.
//!
//! State lives in an immutable [`types::state::AppState`] snapshot. Actions are
//! folded into it by [`reducer::reduce`], which also returns the side effects
//! for the host to run. [`shell::Shell`] ties the pieces together.

pub mod host;
pub mod logging;
pub mod managers;
pub mod reducer;
pub mod services;
pub mod shell;
pub mod types;
