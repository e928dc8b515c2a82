use serde::{Deserialize, Serialize};

use crate::types::tab::TabId;

/// Kind of window page content asked the engine to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    Tab,
    Window,
    Dialog,
    BackgroundTab,
}

/// Runtime capabilities page content can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Fullscreen,
    PointerLock,
    Geolocation,
    Notifications,
    MediaAudioCapture,
    MediaVideoCapture,
    MediaAudioVideoCapture,
    DesktopVideoCapture,
    DesktopAudioVideoCapture,
    ClipboardReadWrite,
}

/// How the policy treats a feature before any user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRule {
    AutoGrant,
    Prompt,
    AutoDeny,
}

/// The decision reported back to the engine for one permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionDecision {
    Grant,
    Deny,
}

/// Answer to a new-window request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewWindowResponse {
    /// Render the popup into this freshly created tab.
    Open(TabId),
    Deny,
}
