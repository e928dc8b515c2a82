use thiserror::Error;

// === EngineError ===

/// Errors reported by the embedded rendering engine or its profile.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rendering surface could not be created.
    #[error("Failed to create rendering surface: {0}")]
    SurfaceCreation(String),
    /// A profile storage operation failed.
    #[error("Profile operation failed: {0}")]
    Profile(String),
    /// The running engine build lacks an optional capability.
    #[error("Engine capability unavailable: {0}")]
    Unsupported(String),
    /// The window's last tab is gone; no further tabs can be opened.
    #[error("The browser window has been closed.")]
    SessionClosed,
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === IconError ===

/// Errors raised while turning vector icon data into a bitmap handle.
#[derive(Debug, Error)]
pub enum IconError {
    /// The icon source could not be rasterized.
    #[error("Icon rasterization failed: {0}")]
    Rasterization(String),
}

// === ShellError ===

/// Errors surfaced by the browser shell itself.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The home page entered by the user was empty after trimming.
    #[error("Home page URL cannot be empty.")]
    EmptyHomePage,
    /// The rendering engine reported an error.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Settings could not be loaded or saved.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
