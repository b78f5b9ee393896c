// Tab shell services
// Services back the tab core with settings persistence and localized text.

pub mod localization_engine;
pub mod settings_engine;
