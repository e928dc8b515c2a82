//! Seams to the embedded web engine.
//!
//! The shell never renders, fetches or stores anything itself. It drives a
//! [`RenderingSurface`] per tab, a shared [`Profile`], and receives the
//! surfaces' lifecycle notifications as tagged [`SurfaceEvent`]s delivered on
//! the UI thread.

pub mod memory;

use crate::types::content::WebAttribute;
use crate::types::errors::EngineError;
use crate::types::permission::{Feature, PermissionDecision};
use crate::types::tab::TabId;

/// One tab's embedded web view.
///
/// Requests return immediately; their effect is observed later through the
/// surface's events.
pub trait RenderingSurface {
    fn load(&mut self, url: &str);
    fn stop(&mut self);
    fn back(&mut self);
    fn forward(&mut self);
    fn reload(&mut self);
    fn current_url(&self) -> String;
    fn current_title(&self) -> String;
    fn is_loading(&self) -> bool;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    /// Current value of a content setting, `None` when the engine cannot report it.
    fn attribute(&self, attribute: WebAttribute) -> Option<bool>;
    fn set_attribute(&mut self, attribute: WebAttribute, value: bool);
    /// Reports the single decision for a feature permission request.
    fn set_feature_permission(&mut self, origin: &str, feature: Feature, decision: PermissionDecision);
    fn set_visible(&mut self, visible: bool);
    /// Returns false when the engine build has no inspector.
    fn open_inspector(&mut self) -> bool;
    /// Stops event delivery for this surface. Calling it twice is a no-op.
    fn disconnect(&mut self);
}

/// Process-wide storage scope shared by every tab.
pub trait Profile {
    fn name(&self) -> &str;
    fn clear_cookies(&mut self) -> Result<(), EngineError>;
    fn clear_http_cache(&mut self) -> Result<(), EngineError>;
    fn clear_visited_links(&mut self) -> Result<(), EngineError>;
    /// Whether this engine build can attach custom request headers.
    fn supports_custom_headers(&self) -> bool;
    fn set_http_header(&mut self, name: &str, value: &str) -> Result<(), EngineError>;
}

/// Creates rendering surfaces bound to a profile.
pub trait SurfaceFactory {
    fn create_surface(
        &mut self,
        tab: TabId,
        profile: &dyn Profile,
    ) -> Result<Box<dyn RenderingSurface>, EngineError>;
}

/// Lifecycle notification from one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEventKind {
    UrlChanged(String),
    TitleChanged(String),
    LoadStarted,
    LoadProgress(u8),
    LoadFinished { success: bool },
}

/// A surface notification tagged with the tab it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub tab: TabId,
    pub kind: SurfaceEventKind,
}

impl SurfaceEvent {
    pub fn new(tab: TabId, kind: SurfaceEventKind) -> Self {
        Self { tab, kind }
    }
}
