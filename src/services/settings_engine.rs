// Tabshell Settings Engine
// Persists the home page and window geometry as JSON at the platform config path.
// Every write goes through a sibling temp file, so a crash mid-save leaves the
// previous file intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ShellSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ShellSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ShellSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ShellSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::default_settings_path()
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: ShellSettings::default(),
        }
    }

    fn staging_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.tmp", self.config_path))
    }
}

fn io_error(action: &str, e: std::io::Error) -> SettingsError {
    SettingsError::IoError(format!("Failed to {}: {}", action, e))
}

/// Turns `"general.home_page"` into the pointer of the section holding the
/// field and the field name: `("/general", "home_page")`.
fn split_key(key: &str) -> Result<(String, &str), SettingsError> {
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(SettingsError::InvalidKey(format!("Malformed key '{}'", key)));
    }
    Ok(match key.rsplit_once('.') {
        Some((section, field)) => (format!("/{}", section.replace('.', "/")), field),
        None => (String::new(), key),
    })
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads the config file. A missing file yields defaults; a malformed one
    /// is a serialization error and leaves the current settings untouched.
    fn load(&mut self) -> Result<ShellSettings, SettingsError> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no settings file at {}, using defaults", self.config_path);
                self.settings = ShellSettings::default();
                return Ok(self.settings.clone());
            }
            Err(e) => return Err(io_error("read config file", e)),
        };

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    /// Writes the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error("create config directory", e))?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|e| io_error("write config file", e))?;
        fs::rename(&staging, path).map_err(|e| io_error("replace config file", e))?;
        debug!("settings saved to {}", self.config_path);
        Ok(())
    }

    fn get_settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Updates one existing field by dot-notation key (`"general.home_page"`)
    /// and saves immediately.
    ///
    /// The new value is validated by deserializing the whole settings tree;
    /// on any error the settings in memory and on disk are unchanged.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let (section, field) = split_key(key)?;
        let unknown = || SettingsError::InvalidKey(format!("Key '{}' not found in settings", key));

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        match tree.pointer_mut(&section).ok_or_else(unknown)? {
            Value::Object(map) if map.contains_key(field) => {
                map.insert(field.to_string(), value);
            }
            Value::Object(_) => return Err(unknown()),
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )))
            }
        }

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
