use serde::{Deserialize, Serialize};

/// Top-level shell settings container, persisted as JSON.
///
/// Sections missing from the file take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ShellSettings {
    pub general: GeneralSettings,
    pub window: WindowSettings,
}

/// General browsing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub home_page: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            home_page: "https://www.google.com".to_string(),
        }
    }
}

/// Initial main-window geometry in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self { width: 1024, height: 768 }
    }
}
