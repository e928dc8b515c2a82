//! Tabshell window, built on `wry` + `tao`.
//!
//! One chrome webview renders the tab strip, toolbar, status line and dialog
//! overlays from HTML. Every tab gets its own child webview on the same
//! window:
//! - Windows: WebView2
//! - Linux: WebKitGTK (X11)
//! - macOS: WKWebView
//!
//! wry callbacks never touch shell state. They post [`UserEvent`]s through the
//! event loop proxy and the loop applies them on the UI thread.

pub mod prompt;
pub mod webview_app;
pub mod wry_surface;

use crate::types::tab::TabId;

/// A raw notification from one page's webview.
#[derive(Debug, Clone)]
pub enum PageSignal {
    Started(String),
    Finished(String),
    Title(String),
    /// The shell stopped a load it had in flight.
    Stopped,
    /// Page content asked for a new window.
    NewWindow(String),
    /// A download the user accepted has ended.
    Downloaded { file: String, success: bool },
}

#[derive(Debug)]
pub enum UserEvent {
    /// Message posted by the chrome webview.
    Ipc(String),
    Page { tab: TabId, signal: PageSignal },
}
