use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::host::ErrorText;
use crate::types::errors::LocaleError;

/// Supported locales.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ru"];

/// Default locale when the configured one is not supported.
const DEFAULT_LOCALE: &str = "en";

/// Trait defining the localization engine interface.
pub trait LocalizationEngineTrait {
    fn initialize(&mut self) -> Result<(), LocaleError>;
    fn set_locale(&mut self, lang: &str) -> Result<(), LocaleError>;
    fn get_locale(&self) -> &str;
    fn t(&self, key: &str, params: Option<&HashMap<String, String>>) -> String;
    fn get_available_locales(&self) -> Vec<String>;
}

/// Localization engine holding the translations used for user-facing text,
/// chiefly the fallback titles of error pages.
pub struct LocalizationEngine {
    /// Current active locale (e.g., "en" or "ru").
    current_locale: String,
    /// Loaded locale data: maps locale name to its parsed JSON value.
    locales: HashMap<String, Value>,
    /// Path to the directory containing locale JSON files.
    locales_dir: PathBuf,
}

impl LocalizationEngine {
    /// Creates a new LocalizationEngine with the given locales directory path.
    pub fn new(locales_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_locale: DEFAULT_LOCALE.to_string(),
            locales: HashMap::new(),
            locales_dir: locales_dir.into(),
        }
    }

    /// Creates a new LocalizationEngine using the default `locales/` directory.
    pub fn with_default_path() -> Self {
        Self::new("locales")
    }

    /// Looks up a nested key in a JSON value using dot notation.
    /// For example, "errors.-105" looks up `value["errors"]["-105"]`.
    ///
    /// Negative error codes contain no dots, so they split cleanly.
    fn lookup_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
        key.split('.').try_fold(data, |current, part| current.get(part))
    }

    /// Replaces `{param_name}` placeholders in a string with values from the params map.
    fn interpolate(template: &str, params: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in params {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }
        result
    }

    /// Translation for `key` in the active locale, if present.
    fn lookup(&self, key: &str) -> Option<&str> {
        let data = self.locales.get(&self.current_locale)?;
        Self::lookup_key(data, key)?.as_str()
    }
}

impl LocalizationEngineTrait for LocalizationEngine {
    /// Loads all locale JSON files from the locales directory.
    fn initialize(&mut self) -> Result<(), LocaleError> {
        let dir = &self.locales_dir;

        if !dir.exists() {
            return Err(LocaleError::FileNotFound(dir.to_string_lossy().to_string()));
        }

        for locale in SUPPORTED_LOCALES {
            let file_path = dir.join(format!("{}.json", locale));
            if file_path.exists() {
                let content = fs::read_to_string(&file_path).map_err(|e| {
                    LocaleError::FileNotFound(format!("{}: {}", file_path.to_string_lossy(), e))
                })?;
                let data: Value = serde_json::from_str(&content).map_err(|e| {
                    LocaleError::FileNotFound(format!(
                        "Failed to parse {}: {}",
                        file_path.to_string_lossy(),
                        e
                    ))
                })?;
                debug!(locale, "locale loaded");
                self.locales.insert(locale.to_string(), data);
            }
        }

        // At least one locale must be loaded
        if self.locales.is_empty() {
            return Err(LocaleError::FileNotFound("No locale files found".to_string()));
        }

        Ok(())
    }

    /// Switches the active locale. Returns an error if the locale is not supported
    /// or not loaded.
    fn set_locale(&mut self, lang: &str) -> Result<(), LocaleError> {
        if !SUPPORTED_LOCALES.contains(&lang) {
            return Err(LocaleError::UnsupportedLocale(lang.to_string()));
        }
        if !self.locales.contains_key(lang) {
            return Err(LocaleError::FileNotFound(format!("Locale '{}' not loaded", lang)));
        }
        self.current_locale = lang.to_string();
        Ok(())
    }

    fn get_locale(&self) -> &str {
        &self.current_locale
    }

    /// Looks up a translation key using dot notation and optionally interpolates parameters.
    /// Returns the key itself if the translation is not found.
    fn t(&self, key: &str, params: Option<&HashMap<String, String>>) -> String {
        let Some(text) = self.lookup(key) else {
            return key.to_string();
        };
        match params {
            Some(p) => Self::interpolate(text, p),
            None => text.to_string(),
        }
    }

    /// Returns a list of all available (loaded) locales.
    fn get_available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.locales.keys().cloned().collect();
        locales.sort();
        locales
    }
}

impl ErrorText for LocalizationEngine {
    /// `errors.<code>` from the active locale, then the built-in English text,
    /// then a generic message carrying the code.
    fn error_text(&self, error_code: i32) -> String {
        if let Some(text) = self.lookup(&format!("errors.{}", error_code)) {
            return text.to_string();
        }
        if let Some(text) = builtin_error_text(error_code) {
            return text.to_string();
        }
        let mut params = HashMap::new();
        params.insert("code".to_string(), error_code.to_string());
        match self.lookup("errors.unknown") {
            Some(template) => Self::interpolate(template, &params),
            None => format!("Unknown error ({})", error_code),
        }
    }
}

/// English descriptions of the common network error codes.
pub fn builtin_error_text(error_code: i32) -> Option<&'static str> {
    let text = match error_code {
        -1 => "The operation is still in progress",
        -2 => "A network error occurred",
        -3 => "The request was aborted",
        -6 => "The file or directory could not be found",
        -7 => "The operation timed out",
        -10 => "Access was denied",
        -20 => "The request was blocked",
        -21 => "The network connection changed",
        -100 => "The connection was closed",
        -101 => "The connection was reset",
        -102 => "The connection was refused",
        -104 => "The connection attempt failed",
        -105 => "The server's address could not be resolved",
        -106 => "The internet connection appears to be offline",
        -107 => "A secure connection could not be established",
        -109 => "The address is unreachable",
        -118 => "The connection timed out",
        -200 => "The server's certificate does not match its name",
        -201 => "The server's certificate has expired or is not yet valid",
        -202 => "The server's certificate is not trusted",
        -300 => "The URL is invalid",
        -310 => "The page redirected too many times",
        -324 => "The server sent an empty response",
        _ => return None,
    };
    Some(text)
}
