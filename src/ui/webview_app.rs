//! Browser window built on `wry` + `tao`.
//!
//! Architecture:
//! - The chrome webview (tab strip, toolbar, status line, dialog overlays) is
//!   rendered from `resources/ui/chrome.html` and talks to Rust through
//!   `window.ipc.postMessage()`.
//! - Every tab is a child webview in the content area below the chrome.
//! - After each command or page signal the session's `Chrome` snapshot and tab
//!   strip are pushed to the chrome webview as JSON.
//! - While a dialog overlay is open the chrome webview covers the whole window
//!   and the page webviews are hidden.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, warn};
use tao::dpi::{LogicalPosition, LogicalSize};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tao::window::{Window, WindowBuilder};
use wry::{Rect, WebView, WebViewBuilder};

use crate::app::App;
use crate::dialogs::security::SecurityCommand;
use crate::dialogs::UserPrompt;
use crate::engine::SurfaceEvent;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::chrome::DEFAULT_WINDOW_TITLE;
use crate::types::dialog::DialogOutcome;
use crate::types::permission::{NewWindowResponse, WindowKind};
use crate::types::tab::TabId;
use crate::ui::prompt::{OverlayHost, RfdPrompt};
use crate::ui::wry_surface::{ContentArea, PageRegistry, WryFactory, WryProfile};
use crate::ui::{PageSignal, UserEvent};

/// Height of the tab strip, toolbar and status line.
const CHROME_HEIGHT: f64 = 96.0;

const CHROME_HTML: &str = include_str!("../../resources/ui/chrome.html");
const CHROME_JS: &str = include_str!("../../resources/ui/chrome.js");

fn chrome_page() -> String {
    CHROME_HTML.replace("/*CHROME_JS*/", CHROME_JS)
}

struct Shell {
    app: App,
    window: Rc<Window>,
    chrome_view: WebView,
    registry: PageRegistry,
    area: Rc<Cell<ContentArea>>,
    overlay: bool,
}

impl Shell {
    fn logical_size(&self) -> (f64, f64) {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        (size.width, size.height)
    }

    fn layout(&mut self) {
        let (width, height) = self.logical_size();
        let chrome_height = if self.overlay { height } else { CHROME_HEIGHT.min(height) };
        let chrome_rect = Rect {
            position: LogicalPosition::new(0.0, 0.0).into(),
            size: LogicalSize::new(width, chrome_height).into(),
        };
        if let Err(e) = self.chrome_view.set_bounds(chrome_rect) {
            warn!("could not resize chrome: {}", e);
        }
        let area = ContentArea {
            x: 0.0,
            y: CHROME_HEIGHT,
            width,
            height: height - CHROME_HEIGHT,
        };
        self.area.set(area);
        self.registry.layout(area);
    }

    fn eval(&self, script: &str) {
        if let Err(e) = self.chrome_view.evaluate_script(script) {
            warn!("chrome script failed: {}", e);
        }
    }

    /// Pushes the chrome snapshot and tab strip to the chrome webview.
    fn render(&self) {
        let chrome = self.app.session.chrome();
        self.window.set_title(&chrome.window_title);
        let payload = serde_json::json!({
            "chrome": chrome,
            "tabs": self.app.session.tab_strip(),
        });
        self.eval(&format!("if(window.__shell)__shell.render({})", payload));
    }

    fn push_icons(&self) {
        let icons: serde_json::Map<String, serde_json::Value> = self
            .app
            .icons
            .iter()
            .map(|handle| (handle.icon.name().to_string(), serde_json::Value::String(handle.image.clone())))
            .collect();
        self.eval(&format!("if(window.__shell)__shell.setIcons({})", serde_json::Value::Object(icons)));
    }

    fn show_overlay(&mut self, script: String) {
        self.overlay = true;
        self.registry.show_only(None);
        self.layout();
        self.eval(&script);
    }

    fn hide_overlay(&mut self) {
        self.overlay = false;
        self.registry.show_only(self.app.session.active_id());
        self.layout();
        self.eval("if(window.__shell)__shell.hideOverlay()");
    }

    fn handle_page(&mut self, tab: TabId, signal: PageSignal) {
        let signal = match signal {
            PageSignal::NewWindow(url) => {
                self.open_popup(tab, &url);
                return;
            }
            PageSignal::Downloaded { file, success } => {
                self.app.session.download_finished(&file, success);
                self.render();
                return;
            }
            other => other,
        };
        for kind in self.registry.translate(tab, signal) {
            self.app.session.handle_event(SurfaceEvent::new(tab, kind));
        }
        self.render();
    }

    fn open_popup(&mut self, source: TabId, url: &str) {
        // wry does not tell popups from new tabs; window.open() is the common case.
        match self.app.session.request_new_window(source, WindowKind::Window) {
            NewWindowResponse::Open(tab) => {
                debug!("popup {} opened in tab {}", url, tab);
                self.app.session.navigate(url);
            }
            NewWindowResponse::Deny => debug!("popup {} denied", url),
        }
        self.render();
    }

    // ─── IPC handler ───

    fn handle_ipc(&mut self, message: &str) {
        let msg: serde_json::Value = match serde_json::from_str(message) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("malformed chrome message: {}", e);
                return;
            }
        };
        let Some(cmd) = msg.get("cmd").and_then(|v| v.as_str()) else {
            return;
        };
        let index = msg.get("index").and_then(|v| v.as_u64()).map(|i| i as usize);
        let session = &mut self.app.session;

        match cmd {
            "ready" => {
                self.push_icons();
            }
            "navigate" => {
                let input = msg.get("url").and_then(|v| v.as_str()).unwrap_or("");
                session.navigate(input);
            }
            "back" => session.back(),
            "forward" => session.forward(),
            "reload" => session.reload(),
            "stop" => session.stop(),
            "home" => session.navigate_home(),
            "inspect" => {
                session.open_inspector();
            }
            "new_tab" => {
                if let Err(e) = session.add_tab(None, true) {
                    error!("could not open tab: {}", e);
                    RfdPrompt.warn("New Tab", &format!("Could not open a new tab: {}", e));
                }
            }
            "close_tab" => {
                if let Some(index) = index {
                    session.close_tab(index);
                }
            }
            "select_tab" => {
                if let Some(index) = index {
                    session.set_active(index);
                }
            }
            "open_preferences" => {
                let form = serde_json::json!({ "home_page": session.home_url() });
                self.show_overlay(format!("if(window.__shell)__shell.showPreferences({})", form));
                return;
            }
            "preferences" => {
                let outcome = match msg.get("home_page").and_then(|v| v.as_str()) {
                    Some(text) => DialogOutcome::Confirmed(text.to_string()),
                    None => DialogOutcome::Cancelled,
                };
                self.app.open_preferences(&mut OverlayHost::preferences(outcome));
                self.hide_overlay();
            }
            "open_security" => {
                let dialog = session.security_snapshot();
                let view = serde_json::json!({
                    "content": dialog.has_content_settings(),
                    "checkboxes": dialog.checkboxes(),
                    "do_not_track": dialog.do_not_track(),
                });
                self.show_overlay(format!("if(window.__shell)__shell.showSecurity({})", view));
                return;
            }
            "security" => {
                let commands: Vec<SecurityCommand> = msg
                    .get("commands")
                    .cloned()
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default();
                let finishes = commands
                    .last()
                    .map_or(true, |c| matches!(c, SecurityCommand::Apply | SecurityCommand::Close));
                self.app.open_security_dialog(&mut OverlayHost::security(commands));
                if finishes {
                    self.hide_overlay();
                }
            }
            other => debug!("unknown chrome command '{}'", other),
        }
        self.render();
    }
}

// ─── Main entry point ───

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings_engine = SettingsEngine::new(None);
    let window_settings = settings_engine.load().unwrap_or_default().window;

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = Rc::new(
        WindowBuilder::new()
            .with_title(DEFAULT_WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(window_settings.width as f64, window_settings.height as f64))
            .build(&event_loop)?,
    );

    let ipc_proxy = proxy.clone();
    let chrome_view = WebViewBuilder::new()
        .with_bounds(Rect {
            position: LogicalPosition::new(0.0, 0.0).into(),
            size: LogicalSize::new(window_settings.width as f64, CHROME_HEIGHT).into(),
        })
        .with_html(chrome_page())
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let _ = ipc_proxy.send_event(UserEvent::Ipc(msg.body().clone()));
        })
        .build_as_child(&*window)?;

    let registry = PageRegistry::default();
    let area = Rc::new(Cell::new(ContentArea {
        x: 0.0,
        y: CHROME_HEIGHT,
        width: window_settings.width as f64,
        height: window_settings.height as f64 - CHROME_HEIGHT,
    }));
    let factory = WryFactory::new(window.clone(), proxy.clone(), registry.clone(), area.clone());
    let profile = WryProfile::new("default", registry.clone());
    let app = App::new(None, Box::new(factory), Box::new(profile))?;

    let mut shell = Shell {
        app,
        window,
        chrome_view,
        registry,
        area,
        overlay: false,
    };
    shell.layout();
    shell.render();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                shell.app.shutdown();
                *control_flow = ControlFlow::Exit;
                return;
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(_),
                ..
            } => shell.layout(),
            Event::UserEvent(UserEvent::Ipc(message)) => shell.handle_ipc(&message),
            Event::UserEvent(UserEvent::Page { tab, signal }) => shell.handle_page(tab, signal),
            _ => {}
        }

        if shell.app.should_exit() {
            *control_flow = ControlFlow::Exit;
        }
    });
}
