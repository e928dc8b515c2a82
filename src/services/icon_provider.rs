//! Toolbar icon assets.
//!
//! Icons are kept as SVG sources and turned into bitmap handles by a
//! [`Rasterizer`]. A failed conversion never aborts startup: the button gets a
//! neutral placeholder instead and the failure is logged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::warn;

use crate::types::errors::IconError;

/// Toolbar icon size in logical pixels.
pub const DEFAULT_ICON_SIZE: u32 = 16;

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"><rect width="16" height="16" fill="#d3d3d3"/></svg>"##;

/// Every icon the chrome uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    App,
    Back,
    Forward,
    Reload,
    Home,
    Stop,
    Settings,
    NewTab,
    CloseTab,
    Shield,
    Inspect,
}

impl Icon {
    pub const ALL: [Icon; 11] = [
        Icon::App,
        Icon::Back,
        Icon::Forward,
        Icon::Reload,
        Icon::Home,
        Icon::Stop,
        Icon::Settings,
        Icon::NewTab,
        Icon::CloseTab,
        Icon::Shield,
        Icon::Inspect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Icon::App => "app",
            Icon::Back => "back",
            Icon::Forward => "forward",
            Icon::Reload => "reload",
            Icon::Home => "home",
            Icon::Stop => "stop",
            Icon::Settings => "settings",
            Icon::NewTab => "new_tab",
            Icon::CloseTab => "close_tab",
            Icon::Shield => "shield",
            Icon::Inspect => "inspect",
        }
    }

    pub fn svg(self) -> &'static str {
        match self {
            Icon::App => r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 24 24" fill="none" stroke="#007aff" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><circle cx="12" cy="12" r="10"></circle><line x1="2" y1="12" x2="22" y2="12"></line><path d="M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"></path></svg>"##,
            Icon::Back => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><polyline points="14 18 8 12 14 6"></polyline></svg>"#,
            Icon::Forward => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><polyline points="10 18 16 12 10 6"></polyline></svg>"#,
            Icon::Reload => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><path d="M21.5 2v6h-6"></path><path d="M2.5 22v-6h6"></path><path d="M2 12C2 6.5 6.5 2 12 2s10 4.5 10 10c0 .2 0 .3 0 .5"></path><path d="M22 12c0 5.5-4.5 10-10 10S2 17.5 2 12c0-.2 0-.3 0-.5"></path></svg>"#,
            Icon::Home => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><path d="m3 9 9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"></path><polyline points="9 22 9 12 15 12 15 22"></polyline></svg>"#,
            Icon::Stop => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round"><line x1="18" y1="6" x2="6" y2="18"></line><line x1="6" y1="6" x2="18" y2="18"></line></svg>"#,
            Icon::Settings => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><circle cx="12" cy="12" r="3"></circle><path d="M19.4 15a1.65 1.65 0 0 0 .33 1.82l.06.06a2 2 0 0 1 0 2.83 2 2 0 0 1-2.83 0l-.06-.06a1.65 1.65 0 0 0-1.82-.33 1.65 1.65 0 0 0-1 1.51V21a2 2 0 0 1-2 2 2 2 0 0 1-2-2v-.09A1.65 1.65 0 0 0 9 19.4a1.65 1.65 0 0 0-1.82.33l-.06.06a2 2 0 0 1-2.83 0 2 2 0 0 1 0-2.83l.06-.06a1.65 1.65 0 0 0 .33-1.82 1.65 1.65 0 0 0-1.51-1H3a2 2 0 0 1-2-2 2 2 0 0 1 2-2h.09A1.65 1.65 0 0 0 4.6 9a1.65 1.65 0 0 0-.33-1.82l-.06-.06a2 2 0 0 1 0-2.83 2 2 0 0 1 2.83 0l.06.06a1.65 1.65 0 0 0 1.82.33H9a1.65 1.65 0 0 0 1-1.51V3a2 2 0 0 1 2-2 2 2 0 0 1 2 2v.09a1.65 1.65 0 0 0 1 1.51 1.65 1.65 0 0 0 1.82-.33l.06-.06a2 2 0 0 1 2.83 0 2 2 0 0 1 0 2.83l-.06.06a1.65 1.65 0 0 0-.33 1.82V9a1.65 1.65 0 0 0 1.51 1H21a2 2 0 0 1 2 2 2 2 0 0 1-2 2h-.09a1.65 1.65 0 0 0-1.51 1z"></path></svg>"#,
            Icon::NewTab => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><line x1="12" y1="5" x2="12" y2="19"></line><line x1="5" y1="12" x2="19" y2="12"></line></svg>"#,
            Icon::CloseTab => r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="3.5" stroke-linecap="round" stroke-linejoin="round"><line x1="18" y1="6" x2="6" y2="18"></line><line x1="6" y1="6" x2="18" y2="18"></line></svg>"#,
            Icon::Shield => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"></path></svg>"#,
            Icon::Inspect => r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.3" stroke-linecap="round" stroke-linejoin="round"><polyline points="16 18 22 12 16 6"></polyline><polyline points="8 6 2 12 8 18"></polyline></svg>"#,
        }
    }
}

/// A ready-to-display icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle {
    pub icon: Icon,
    pub size: u32,
    /// Front-end specific image reference, e.g. a data URI.
    pub image: String,
    pub placeholder: bool,
}

/// Converts SVG source into a front-end image reference.
pub trait Rasterizer {
    fn rasterize(&self, svg: &str, size: u32) -> Result<String, IconError>;
}

/// Encodes SVG as a base64 `data:` URI that a webview renders directly.
pub struct SvgDataUri;

impl Rasterizer for SvgDataUri {
    fn rasterize(&self, svg: &str, _size: u32) -> Result<String, IconError> {
        let trimmed = svg.trim_start();
        if !trimmed.starts_with("<svg") || !trimmed.trim_end().ends_with("</svg>") {
            return Err(IconError::Rasterization("not an SVG document".to_string()));
        }
        Ok(data_uri(svg))
    }
}

fn data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

/// Hands out toolbar icons through a rasterizer.
pub struct IconProvider<R: Rasterizer> {
    rasterizer: R,
    size: u32,
}

impl<R: Rasterizer> IconProvider<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer, size: DEFAULT_ICON_SIZE }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Loads `icon`, substituting the placeholder glyph when rasterization fails.
    pub fn load(&self, icon: Icon) -> IconHandle {
        match self.rasterizer.rasterize(icon.svg(), self.size) {
            Ok(image) => IconHandle { icon, size: self.size, image, placeholder: false },
            Err(e) => {
                warn!("icon '{}' fell back to placeholder: {}", icon.name(), e);
                IconHandle {
                    icon,
                    size: self.size,
                    image: data_uri(PLACEHOLDER_SVG),
                    placeholder: true,
                }
            }
        }
    }

    pub fn load_all(&self) -> Vec<IconHandle> {
        Icon::ALL.iter().map(|icon| self.load(*icon)).collect()
    }
}

impl Default for IconProvider<SvgDataUri> {
    fn default() -> Self {
        Self::new(SvgDataUri)
    }
}
