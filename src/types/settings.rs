use serde::{Deserialize, Serialize};

/// Tunables for the tab shell. Every field has a default so partial files load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellSettings {
    /// URL opened by a create request that names none.
    pub default_url: String,
    pub default_partition_number: u32,
    /// Refuse non-forced closes of pinned tabs.
    pub keep_pinned_tabs_on_close: bool,
    pub locale: String,
    pub locales_dir: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            default_url: "about:newtab".to_string(),
            default_partition_number: 0,
            keep_pinned_tabs_on_close: true,
            locale: "en".to_string(),
            locales_dir: "locales".to_string(),
        }
    }
}
