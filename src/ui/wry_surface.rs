//! Rendering surfaces backed by child `wry` webviews.
//!
//! wry reports page loads and title changes but has no progress signal, no
//! load-failure flag, no permission delegate and no runtime content settings.
//! Content settings are recorded per page and reported back as set;
//! permission decisions are only logged. Downloads go where the user picks in
//! a save dialog and are refused when the dialog is cancelled.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::rc::Rc;

use log::{debug, info, warn};
use tao::dpi::{LogicalPosition, LogicalSize};
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use wry::{PageLoadEvent, Rect, WebView, WebViewBuilder};

use crate::engine::{Profile, RenderingSurface, SurfaceEventKind, SurfaceFactory};
use crate::services::display;
use crate::types::content::WebAttribute;
use crate::types::errors::EngineError;
use crate::types::permission::{Feature, PermissionDecision};
use crate::types::tab::TabId;
use crate::ui::prompt::choose_download_path;
use crate::ui::{PageSignal, UserEvent};

/// Where page webviews sit inside the window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentArea {
    pub fn rect(&self) -> Rect {
        Rect {
            position: LogicalPosition::new(self.x, self.y).into(),
            size: LogicalSize::new(self.width.max(0.0), self.height.max(0.0)).into(),
        }
    }
}

#[derive(Default)]
struct PageState {
    url: String,
    title: String,
    loading: bool,
    history: Vec<String>,
    cursor: usize,
    /// The entry at `cursor` belongs to the load in flight and takes
    /// whatever URL the engine settles on (normalized form, redirect).
    provisional: bool,
    /// The shell stopped the load; its failure has already been reported.
    stopped: bool,
    attributes: BTreeMap<WebAttribute, bool>,
    connected: bool,
}

impl PageState {
    /// Records a load the shell asked for. It always gets an entry of its own.
    fn begin_shell_load(&mut self, url: &str) {
        if self.provisional && !self.history.is_empty() {
            self.history[self.cursor] = url.to_string();
        } else {
            self.push(url);
        }
        self.url = url.to_string();
        self.loading = true;
        self.provisional = true;
        self.stopped = false;
    }

    /// Applies one webview signal and returns the lifecycle events it means.
    fn apply(&mut self, signal: PageSignal) -> Vec<SurfaceEventKind> {
        match signal {
            PageSignal::Started(url) => {
                self.settle(&url);
                self.loading = true;
                self.provisional = true;
                self.stopped = false;
                vec![SurfaceEventKind::LoadStarted, SurfaceEventKind::UrlChanged(url)]
            }
            PageSignal::Finished(url) => {
                let mut events = Vec::new();
                if self.url != url {
                    events.push(SurfaceEventKind::UrlChanged(url.clone()));
                }
                self.settle(&url);
                self.provisional = false;
                if std::mem::take(&mut self.stopped) {
                    debug!("finish of stopped load at {} ignored", url);
                    return events;
                }
                self.loading = false;
                events.push(SurfaceEventKind::LoadFinished { success: true });
                events
            }
            PageSignal::Title(title) => {
                self.title = title.clone();
                vec![SurfaceEventKind::TitleChanged(title)]
            }
            PageSignal::Stopped if self.loading => {
                self.loading = false;
                self.provisional = false;
                self.stopped = true;
                vec![SurfaceEventKind::LoadFinished { success: false }]
            }
            PageSignal::Stopped | PageSignal::NewWindow(_) | PageSignal::Downloaded { .. } => Vec::new(),
        }
    }

    /// Moves to `url`: stays on a matching entry, steps onto a matching
    /// neighbour (back, forward), rewrites a provisional entry, else pushes.
    fn settle(&mut self, url: &str) {
        let at = |index: usize| self.history.get(index).map(String::as_str);
        if at(self.cursor) == Some(url) {
            // already there
        } else if self.cursor > 0 && at(self.cursor - 1) == Some(url) {
            self.cursor -= 1;
        } else if at(self.cursor + 1) == Some(url) {
            self.cursor += 1;
        } else if self.provisional && !self.history.is_empty() {
            self.history[self.cursor] = url.to_string();
        } else {
            self.push(url);
        }
        self.url = url.to_string();
    }

    fn push(&mut self, url: &str) {
        if !self.history.is_empty() {
            self.history.truncate(self.cursor + 1);
        }
        self.history.push(url.to_string());
        self.cursor = self.history.len() - 1;
    }

    fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }
}

struct Page {
    webview: WebView,
    state: RefCell<PageState>,
}

/// Every live page webview, by tab.
#[derive(Clone, Default)]
pub struct PageRegistry {
    pages: Rc<RefCell<HashMap<TabId, Rc<Page>>>>,
}

impl PageRegistry {
    fn get(&self, tab: TabId) -> Option<Rc<Page>> {
        self.pages.borrow().get(&tab).cloned()
    }

    /// Updates the page state for `signal` and returns the lifecycle events
    /// the shell should see. Nothing comes back for disconnected pages.
    pub fn translate(&self, tab: TabId, signal: PageSignal) -> Vec<SurfaceEventKind> {
        let Some(page) = self.get(tab) else {
            return Vec::new();
        };
        let mut state = page.state.borrow_mut();
        if !state.connected {
            return Vec::new();
        }
        state.apply(signal)
    }

    /// Moves every page to `area`.
    pub fn layout(&self, area: ContentArea) {
        for page in self.pages.borrow().values() {
            if let Err(e) = page.webview.set_bounds(area.rect()) {
                warn!("could not resize page: {}", e);
            }
        }
    }

    /// Shows only the page of `tab`; `None` hides them all.
    pub fn show_only(&self, tab: Option<TabId>) {
        for (id, page) in self.pages.borrow().iter() {
            let _ = page.webview.set_visible(Some(*id) == tab);
        }
    }

    fn any_page(&self) -> Option<Rc<Page>> {
        self.pages.borrow().values().next().cloned()
    }
}

/// Builds page webviews as children of the browser window.
pub struct WryFactory {
    window: Rc<Window>,
    proxy: EventLoopProxy<UserEvent>,
    registry: PageRegistry,
    area: Rc<Cell<ContentArea>>,
}

impl WryFactory {
    pub fn new(
        window: Rc<Window>,
        proxy: EventLoopProxy<UserEvent>,
        registry: PageRegistry,
        area: Rc<Cell<ContentArea>>,
    ) -> Self {
        Self { window, proxy, registry, area }
    }
}

impl SurfaceFactory for WryFactory {
    fn create_surface(
        &mut self,
        tab: TabId,
        profile: &dyn Profile,
    ) -> Result<Box<dyn RenderingSurface>, EngineError> {
        let load_proxy = self.proxy.clone();
        let title_proxy = self.proxy.clone();
        let popup_proxy = self.proxy.clone();
        let download_proxy = self.proxy.clone();

        let webview = WebViewBuilder::new()
            .with_bounds(self.area.get().rect())
            .with_visible(false)
            .with_devtools(true)
            .with_on_page_load_handler(move |event, url| {
                let signal = match event {
                    PageLoadEvent::Started => PageSignal::Started(url),
                    PageLoadEvent::Finished => PageSignal::Finished(url),
                };
                let _ = load_proxy.send_event(UserEvent::Page { tab, signal });
            })
            .with_document_title_changed_handler(move |title| {
                let _ = title_proxy.send_event(UserEvent::Page { tab, signal: PageSignal::Title(title) });
            })
            .with_new_window_req_handler(move |url, _features| {
                // The shell decides and loads the popup into a tab of its own.
                let _ = popup_proxy.send_event(UserEvent::Page { tab, signal: PageSignal::NewWindow(url) });
                wry::NewWindowResponse::Deny
            })
            .with_download_started_handler(move |url, path| {
                let suggested = display::download_file_name(&url);
                match choose_download_path(&suggested) {
                    Some(chosen) => {
                        info!("tab {}: saving {} to {}", tab, url, chosen.display());
                        *path = chosen;
                        true
                    }
                    None => {
                        debug!("tab {}: download of {} declined", tab, url);
                        false
                    }
                }
            })
            .with_download_completed_handler(move |url, path, success| {
                let file = path
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| display::download_file_name(&url));
                let signal = PageSignal::Downloaded { file, success };
                let _ = download_proxy.send_event(UserEvent::Page { tab, signal });
            })
            .build_as_child(&*self.window)
            .map_err(|e| EngineError::SurfaceCreation(e.to_string()))?;

        let page = Rc::new(Page {
            webview,
            state: RefCell::new(PageState { connected: true, ..PageState::default() }),
        });
        self.registry.pages.borrow_mut().insert(tab, page.clone());
        debug!("created webview for tab {} in profile '{}'", tab, profile.name());

        Ok(Box::new(WrySurface {
            tab,
            page,
            proxy: self.proxy.clone(),
            registry: self.registry.clone(),
        }))
    }
}

pub struct WrySurface {
    tab: TabId,
    page: Rc<Page>,
    proxy: EventLoopProxy<UserEvent>,
    registry: PageRegistry,
}

impl WrySurface {
    fn run_script(&self, script: &str) {
        if let Err(e) = self.page.webview.evaluate_script(script) {
            warn!("tab {}: script failed: {}", self.tab, e);
        }
    }
}

impl RenderingSurface for WrySurface {
    fn load(&mut self, url: &str) {
        self.page.state.borrow_mut().begin_shell_load(url);
        if let Err(e) = self.page.webview.load_url(url) {
            warn!("tab {}: could not load {}: {}", self.tab, url, e);
        }
    }

    fn stop(&mut self) {
        self.run_script("window.stop()");
        let _ = self.proxy.send_event(UserEvent::Page { tab: self.tab, signal: PageSignal::Stopped });
    }

    fn back(&mut self) {
        if self.can_go_back() {
            self.run_script("history.back()");
        }
    }

    fn forward(&mut self) {
        if self.can_go_forward() {
            self.run_script("history.forward()");
        }
    }

    fn reload(&mut self) {
        self.run_script("location.reload()");
    }

    fn current_url(&self) -> String {
        self.page.state.borrow().url.clone()
    }

    fn current_title(&self) -> String {
        self.page.state.borrow().title.clone()
    }

    fn is_loading(&self) -> bool {
        self.page.state.borrow().loading
    }

    fn can_go_back(&self) -> bool {
        self.page.state.borrow().can_go_back()
    }

    fn can_go_forward(&self) -> bool {
        self.page.state.borrow().can_go_forward()
    }

    fn attribute(&self, attribute: WebAttribute) -> Option<bool> {
        self.page.state.borrow().attributes.get(&attribute).copied()
    }

    fn set_attribute(&mut self, attribute: WebAttribute, value: bool) {
        debug!("tab {}: recorded {:?} = {}", self.tab, attribute, value);
        self.page.state.borrow_mut().attributes.insert(attribute, value);
    }

    fn set_feature_permission(&mut self, origin: &str, feature: Feature, decision: PermissionDecision) {
        info!("tab {}: {:?} for {} -> {:?}", self.tab, feature, origin, decision);
    }

    fn set_visible(&mut self, visible: bool) {
        if let Err(e) = self.page.webview.set_visible(visible) {
            warn!("tab {}: could not change visibility: {}", self.tab, e);
        }
    }

    fn open_inspector(&mut self) -> bool {
        self.page.webview.open_devtools();
        true
    }

    fn disconnect(&mut self) {
        let mut state = self.page.state.borrow_mut();
        if state.connected {
            state.connected = false;
            debug!("tab {}: disconnected", self.tab);
        }
    }
}

impl Drop for WrySurface {
    fn drop(&mut self) {
        self.registry.pages.borrow_mut().remove(&self.tab);
    }
}

/// The default web context shared by every page.
///
/// wry clears browsing data as a whole, so cookie and cache clears both go
/// through `clear_all_browsing_data` on any live page.
pub struct WryProfile {
    name: String,
    registry: PageRegistry,
}

impl WryProfile {
    pub fn new(name: &str, registry: PageRegistry) -> Self {
        Self { name: name.to_string(), registry }
    }

    fn clear_browsing_data(&self, what: &str) -> Result<(), EngineError> {
        let page = self
            .registry
            .any_page()
            .ok_or_else(|| EngineError::Profile(format!("no open page to clear {} through", what)))?;
        page.webview
            .clear_all_browsing_data()
            .map_err(|e| EngineError::Profile(e.to_string()))
    }
}

impl Profile for WryProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn clear_cookies(&mut self) -> Result<(), EngineError> {
        self.clear_browsing_data("cookies")
    }

    fn clear_http_cache(&mut self) -> Result<(), EngineError> {
        self.clear_browsing_data("the HTTP cache")
    }

    fn clear_visited_links(&mut self) -> Result<(), EngineError> {
        // Visited links live in the browsing data cleared above.
        debug!("profile '{}': no separate visited-links store", self.name);
        Ok(())
    }

    fn supports_custom_headers(&self) -> bool {
        false
    }

    fn set_http_header(&mut self, name: &str, _value: &str) -> Result<(), EngineError> {
        Err(EngineError::Unsupported(format!("custom request header '{}'", name)))
    }
}
