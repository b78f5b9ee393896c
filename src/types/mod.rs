// Tab shell shared type definitions
// Each submodule defines plain data types used across the crate.

pub mod action;
pub mod drag;
pub mod effect;
pub mod errors;
pub mod history;
pub mod settings;
pub mod state;
pub mod tab;
