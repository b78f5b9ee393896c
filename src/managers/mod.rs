// Tab shell state managers
// Managers hold the tab logic: the registry, session history and lifecycle operations.

pub mod history_adapter;
pub mod tab_lifecycle;
pub mod tab_registry;
