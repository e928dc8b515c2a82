use serde::{Deserialize, Serialize};

/// Per-surface content settings the shell knows how to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WebAttribute {
    JavascriptEnabled,
    LocalStorageEnabled,
    PluginsEnabled,
    DnsPrefetchEnabled,
    HyperlinkAuditingEnabled,
    ScrollAnimatorEnabled,
    ErrorPageEnabled,
    FullScreenSupportEnabled,
    ScreenCaptureEnabled,
    WebGlEnabled,
    XssAuditingEnabled,
    LocalContentCanAccessRemoteUrls,
    LocalContentCanAccessFileUrls,
    PdfViewerEnabled,
}

/// Display metadata for one content setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    pub label: &'static str,
    pub default: bool,
    pub description: &'static str,
}

impl WebAttribute {
    /// Every attribute in dialog order.
    pub const ALL: [WebAttribute; 14] = [
        WebAttribute::JavascriptEnabled,
        WebAttribute::LocalStorageEnabled,
        WebAttribute::PluginsEnabled,
        WebAttribute::DnsPrefetchEnabled,
        WebAttribute::HyperlinkAuditingEnabled,
        WebAttribute::ScrollAnimatorEnabled,
        WebAttribute::ErrorPageEnabled,
        WebAttribute::FullScreenSupportEnabled,
        WebAttribute::ScreenCaptureEnabled,
        WebAttribute::WebGlEnabled,
        WebAttribute::XssAuditingEnabled,
        WebAttribute::LocalContentCanAccessRemoteUrls,
        WebAttribute::LocalContentCanAccessFileUrls,
        WebAttribute::PdfViewerEnabled,
    ];

    /// Attributes switched off on every new surface, whatever the engine default.
    pub const HARDENED_OFF: [WebAttribute; 5] = [
        WebAttribute::DnsPrefetchEnabled,
        WebAttribute::HyperlinkAuditingEnabled,
        WebAttribute::ScreenCaptureEnabled,
        WebAttribute::XssAuditingEnabled,
        WebAttribute::WebGlEnabled,
    ];

    pub fn info(self) -> AttributeInfo {
        let (label, default, description) = match self {
            WebAttribute::JavascriptEnabled => (
                "Enable JavaScript",
                true,
                "Allows websites to run scripts.",
            ),
            WebAttribute::LocalStorageEnabled => (
                "Enable Local Storage",
                true,
                "Allows websites to store data locally.",
            ),
            WebAttribute::PluginsEnabled => (
                "Enable Plugins (e.g., PDF viewer)",
                true,
                "Allows browser plugins to run.",
            ),
            WebAttribute::DnsPrefetchEnabled => (
                "Enable DNS Prefetching",
                false,
                "May improve page load times but can reveal browsing habits to DNS servers.",
            ),
            WebAttribute::HyperlinkAuditingEnabled => (
                "Enable Hyperlink Auditing (<a ping>)",
                false,
                "Allows sites to track clicks on links.",
            ),
            WebAttribute::ScrollAnimatorEnabled => (
                "Enable Smooth Scrolling",
                true,
                "Enables smooth scrolling animations.",
            ),
            WebAttribute::ErrorPageEnabled => (
                "Show Custom Error Pages",
                true,
                "Shows browser-specific error pages instead of server errors.",
            ),
            WebAttribute::FullScreenSupportEnabled => (
                "Allow Fullscreen Requests",
                true,
                "Allows sites to request fullscreen mode.",
            ),
            WebAttribute::ScreenCaptureEnabled => (
                "Allow Screen Capture",
                false,
                "Allows sites to capture screen content (use with caution).",
            ),
            WebAttribute::WebGlEnabled => (
                "Enable WebGL",
                false,
                "Allows 3D graphics. Disabling can reduce fingerprinting and resource usage.",
            ),
            WebAttribute::XssAuditingEnabled => (
                "Enable XSS Auditor (if available)",
                false,
                "Attempt to prevent cross-site scripting attacks (effectiveness varies, often deprecated).",
            ),
            WebAttribute::LocalContentCanAccessRemoteUrls => (
                "Allow Local Files to Access Remote Content",
                false,
                "Security risk: Local files (file://) accessing internet resources.",
            ),
            WebAttribute::LocalContentCanAccessFileUrls => (
                "Allow Local Files to Access Other Local Files",
                false,
                "Security risk: Local files accessing other local files via file:// URLs.",
            ),
            WebAttribute::PdfViewerEnabled => (
                "Enable Built-in PDF Viewer",
                true,
                "Uses the browser's internal PDF viewer.",
            ),
        };
        AttributeInfo { label, default, description }
    }
}
