//! The tab session controller.
//!
//! Owns every open tab, tracks which one is active, and is the only writer of
//! the shared window [`Chrome`]. Surface events arrive tagged with the tab
//! they came from; tab-local state (label, tooltip, load state) follows every
//! subscribed tab, while chrome is only touched by the active tab.

use log::{debug, info, warn};

use crate::dialogs::security::SecurityDialog;
use crate::dialogs::{preferences, DialogHost, UserPrompt};
use crate::engine::{Profile, RenderingSurface, SurfaceEvent, SurfaceEventKind, SurfaceFactory};
use crate::managers::page_policy::{PagePolicy, TabOpener};
use crate::services::display::{self, LOADING_LABEL, NEW_TAB_LABEL};
use crate::types::chrome::{Chrome, StatusMessage, TabStripEntry};
use crate::types::content::WebAttribute;
use crate::types::dialog::DialogOutcome;
use crate::types::errors::{EngineError, ShellError};
use crate::types::permission::{Feature, NewWindowResponse, PermissionDecision, WindowKind};
use crate::types::tab::{LoadState, TabId, TabSnapshot};

/// Home page used when none is configured.
pub const DEFAULT_HOME_PAGE: &str = "https://www.google.com";

/// URL a popup tab starts on before the engine renders into it.
const POPUP_URL: &str = "about:blank";

const LOAD_COMPLETE_TIMEOUT_MS: u32 = 3000;
const LOAD_FAILED_TIMEOUT_MS: u32 = 5000;
const NO_PAGE_TIMEOUT_MS: u32 = 3000;
const DOWNLOAD_TIMEOUT_MS: u32 = 5000;

struct Tab {
    id: TabId,
    surface: Box<dyn RenderingSurface>,
    policy: PagePolicy,
    url: String,
    title: String,
    load_state: LoadState,
    label: String,
    tooltip: String,
    subscribed: bool,
}

impl Tab {
    fn snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            id: self.id,
            url: self.url.clone(),
            title: self.title.clone(),
            load_state: self.load_state,
            label: self.label.clone(),
            tooltip: self.tooltip.clone(),
        }
    }

    /// Pulls the surface's live page state into the record.
    fn sync_from_surface(&mut self) {
        self.url = self.surface.current_url();
        self.title = self.surface.current_title();
        match (self.surface.is_loading(), self.load_state.is_loading()) {
            (true, false) => self.load_state = LoadState::Loading { progress: 0 },
            (false, true) => self.load_state = LoadState::Idle,
            _ => {}
        }
    }

    fn refresh_label(&mut self) {
        self.label = display::tab_label(&self.title, &self.url);
        self.tooltip = display::tab_tooltip(&self.title, &self.url);
    }
}

/// Ordered set of tabs sharing one window and one profile.
pub struct TabSession {
    factory: Box<dyn SurfaceFactory>,
    profile: Box<dyn Profile>,
    tabs: Vec<Tab>,
    active: Option<TabId>,
    home_url: String,
    chrome: Chrome,
    closed: bool,
}

impl TabSession {
    pub fn new(factory: Box<dyn SurfaceFactory>, profile: Box<dyn Profile>, home_url: &str) -> Self {
        let home_url = display::normalize_home_page(home_url)
            .unwrap_or_else(|| DEFAULT_HOME_PAGE.to_string());
        let chrome = Chrome {
            home_tooltip: home_tooltip(&home_url),
            ..Chrome::default()
        };
        Self {
            factory,
            profile,
            tabs: Vec::new(),
            active: None,
            home_url,
            chrome,
            closed: false,
        }
    }

    // ---- read access ----

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn tab_strip(&self) -> Vec<TabStripEntry> {
        self.tabs
            .iter()
            .map(|tab| TabStripEntry {
                id: tab.id,
                label: tab.label.clone(),
                tooltip: tab.tooltip.clone(),
                active: self.active == Some(tab.id),
            })
            .collect()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|tab| tab.id).collect()
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    pub fn tab(&self, id: TabId) -> Option<TabSnapshot> {
        self.index_of(id).map(|index| self.tabs[index].snapshot())
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    /// True once the last tab has been closed; the window should go away.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn profile(&self) -> &dyn Profile {
        self.profile.as_ref()
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    fn active_tab(&self) -> Option<&Tab> {
        self.active_index().map(|index| &self.tabs[index])
    }

    fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let index = self.active_index()?;
        Some(&mut self.tabs[index])
    }

    // ---- tab lifecycle ----

    /// Opens a tab at the end of the strip and starts loading `url`, or the
    /// home page when `url` is `None`.
    ///
    /// The first tab of a session always becomes active.
    pub fn add_tab(&mut self, url: Option<&str>, make_active: bool) -> Result<TabId, EngineError> {
        if self.closed {
            return Err(EngineError::SessionClosed);
        }
        let id = TabId::new();
        let mut surface = self.factory.create_surface(id, self.profile.as_ref())?;
        for attribute in WebAttribute::HARDENED_OFF {
            surface.set_attribute(attribute, false);
        }
        surface.set_visible(false);

        let target = match url {
            Some(url) => url.to_string(),
            None => self.home_url.clone(),
        };
        self.tabs.push(Tab {
            id,
            surface,
            policy: PagePolicy::new(id),
            url: String::new(),
            title: String::new(),
            load_state: LoadState::Idle,
            label: NEW_TAB_LABEL.to_string(),
            tooltip: LOADING_LABEL.to_string(),
            subscribed: true,
        });
        info!("opened tab {} for {}", id, target);

        if let Some(tab) = self.tabs.last_mut() {
            tab.surface.load(&target);
        }
        if make_active || self.active.is_none() {
            self.activate(id);
        } else {
            self.refresh_nav_buttons();
        }
        Ok(id)
    }

    /// Closes the tab at `index`. Out-of-range indices are ignored.
    ///
    /// The tab stops receiving events before its surface is torn down. When
    /// the active tab closes, the tab now at the same index (or the new last
    /// tab) takes over. Closing the last tab closes the session.
    pub fn close_tab(&mut self, index: usize) {
        if index >= self.tabs.len() {
            debug!("close_tab: no tab at index {}", index);
            return;
        }
        let tab = &mut self.tabs[index];
        tab.subscribed = false;
        tab.surface.disconnect();
        tab.surface.stop();
        tab.surface.set_visible(false);
        let removed = self.tabs.remove(index);
        let was_active = self.active == Some(removed.id);
        info!("closed tab {}", removed.id);
        drop(removed);

        if self.tabs.is_empty() {
            self.active = None;
            self.closed = true;
            self.chrome = Chrome {
                home_tooltip: home_tooltip(&self.home_url),
                ..Chrome::default()
            };
            info!("last tab closed, closing window");
            return;
        }
        if was_active {
            let next = index.min(self.tabs.len() - 1);
            let id = self.tabs[next].id;
            self.activate(id);
        } else {
            self.refresh_nav_buttons();
        }
    }

    pub fn close_tab_by_id(&mut self, id: TabId) {
        if let Some(index) = self.index_of(id) {
            self.close_tab(index);
        }
    }

    pub fn close_active_tab(&mut self) {
        if let Some(index) = self.active_index() {
            self.close_tab(index);
        }
    }

    /// Closes every tab, front to back, and with them the session.
    pub fn shutdown(&mut self) {
        while !self.tabs.is_empty() {
            self.close_tab(0);
        }
    }

    /// Makes the tab at `index` active. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) {
        match self.tabs.get(index) {
            Some(tab) => {
                let id = tab.id;
                self.activate(id);
            }
            None => debug!("set_active: no tab at index {}", index),
        }
    }

    pub fn set_active_id(&mut self, id: TabId) {
        if self.index_of(id).is_some() {
            self.activate(id);
        }
    }

    fn activate(&mut self, id: TabId) {
        if let Some(previous) = self.active.filter(|prev| *prev != id) {
            if let Some(index) = self.index_of(previous) {
                self.tabs[index].surface.set_visible(false);
            }
        }
        self.active = Some(id);
        if let Some(index) = self.index_of(id) {
            self.tabs[index].surface.set_visible(true);
        }
        self.resync_chrome();
    }

    /// Re-derives all chrome from the active tab's surface.
    ///
    /// The surface is asked for its URL, title and loading flag rather than
    /// trusting the tab record, which lags behind until queued events arrive.
    fn resync_chrome(&mut self) {
        let Some(index) = self.active_index() else {
            self.refresh_nav_buttons();
            return;
        };
        let tab = &mut self.tabs[index];
        tab.sync_from_surface();
        tab.refresh_label();
        if tab.load_state.is_loading() && tab.title.is_empty() {
            tab.label = LOADING_LABEL.to_string();
        }
        self.chrome.address_bar = tab.url.clone();
        self.chrome.window_title = display::window_title(&tab.title, &tab.url);
        self.chrome.status = Some(match tab.load_state {
            LoadState::Loading { .. } => StatusMessage::sticky(LOADING_LABEL),
            LoadState::Finished { success: false } => failed_status(&tab.url),
            _ => StatusMessage::transient("Load Complete", LOAD_COMPLETE_TIMEOUT_MS),
        });
        self.refresh_nav_buttons();
    }

    fn refresh_nav_buttons(&mut self) {
        let (back, forward, stop) = match self.active_tab() {
            Some(tab) => (
                tab.surface.can_go_back(),
                tab.surface.can_go_forward(),
                tab.load_state.is_loading(),
            ),
            None => (false, false, false),
        };
        self.chrome.back_enabled = back;
        self.chrome.forward_enabled = forward;
        self.chrome.stop_enabled = stop;
    }

    // ---- navigation commands, all against the active tab ----

    /// Loads address-bar text in the active tab. Returns the URL loaded.
    pub fn navigate(&mut self, raw: &str) -> Option<String> {
        let url = display::normalize_url(raw)?;
        let tab = self.active_tab_mut()?;
        tab.surface.load(&url);
        debug!("tab {} navigating to {}", tab.id, url);
        Some(url)
    }

    pub fn navigate_home(&mut self) {
        let home = self.home_url.clone();
        if let Some(tab) = self.active_tab_mut() {
            tab.surface.load(&home);
        }
    }

    pub fn back(&mut self) {
        if let Some(tab) = self.active_tab_mut() {
            tab.surface.back();
        }
    }

    pub fn forward(&mut self) {
        if let Some(tab) = self.active_tab_mut() {
            tab.surface.forward();
        }
    }

    pub fn reload(&mut self) {
        if let Some(tab) = self.active_tab_mut() {
            tab.surface.reload();
        }
    }

    pub fn stop(&mut self) {
        if let Some(tab) = self.active_tab_mut() {
            tab.surface.stop();
        }
    }

    /// Opens developer tools for the active tab.
    pub fn open_inspector(&mut self) -> bool {
        let opened = match self.active_tab_mut() {
            Some(tab) => tab.surface.open_inspector(),
            None => {
                self.chrome.status = Some(StatusMessage::transient(
                    "No active page to inspect.",
                    NO_PAGE_TIMEOUT_MS,
                ));
                return false;
            }
        };
        if !opened {
            self.chrome.status = Some(StatusMessage::transient(
                "Developer tools are not available in this build.",
                NO_PAGE_TIMEOUT_MS,
            ));
        }
        opened
    }

    /// Reports a finished download in the status line. `file` is the saved
    /// file's name, or the suggested one when nothing was written.
    pub fn download_finished(&mut self, file: &str, success: bool) {
        let text = if success {
            info!("download saved as {}", file);
            format!("Download complete: {}", file)
        } else {
            warn!("download of {} failed", file);
            format!("Download failed: {}", file)
        };
        self.chrome.status = Some(StatusMessage::transient(text, DOWNLOAD_TIMEOUT_MS));
    }

    /// Replaces the home page. Blank input is rejected and leaves it unchanged.
    pub fn set_home_page(&mut self, raw: &str) -> Result<String, ShellError> {
        let url = display::normalize_home_page(raw).ok_or(ShellError::EmptyHomePage)?;
        info!("home page set to {}", url);
        self.home_url = url.clone();
        self.chrome.home_tooltip = home_tooltip(&url);
        Ok(url)
    }

    // ---- surface events ----

    /// Applies one surface notification.
    ///
    /// Events from unsubscribed or unknown tabs are dropped. Chrome is only
    /// updated when the event comes from the active tab.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        let Some(index) = self.index_of(event.tab) else {
            debug!("dropping {:?} from closed tab {}", event.kind, event.tab);
            return;
        };
        if !self.tabs[index].subscribed {
            debug!("dropping {:?} from unsubscribed tab {}", event.kind, event.tab);
            return;
        }
        let is_active = self.active == Some(event.tab);

        match event.kind {
            SurfaceEventKind::UrlChanged(url) => self.on_url_changed(index, is_active, url),
            SurfaceEventKind::TitleChanged(title) => self.on_title_changed(index, is_active, title),
            SurfaceEventKind::LoadStarted => self.on_load_started(index, is_active),
            SurfaceEventKind::LoadProgress(progress) => self.on_load_progress(index, is_active, progress),
            SurfaceEventKind::LoadFinished { success } => self.on_load_finished(index, is_active, success),
        }
        self.refresh_nav_buttons();
    }

    fn on_url_changed(&mut self, index: usize, is_active: bool, url: String) {
        let tab = &mut self.tabs[index];
        tab.url = url;
        self.apply_title(index, is_active);
        if is_active {
            self.chrome.address_bar = self.tabs[index].url.clone();
        }
    }

    fn on_title_changed(&mut self, index: usize, is_active: bool, title: String) {
        self.tabs[index].title = title;
        self.apply_title(index, is_active);
    }

    fn on_load_started(&mut self, index: usize, is_active: bool) {
        let tab = &mut self.tabs[index];
        tab.load_state = LoadState::Loading { progress: 0 };
        if tab.title.is_empty() {
            tab.label = LOADING_LABEL.to_string();
        }
        if is_active {
            self.chrome.status = Some(StatusMessage::sticky(LOADING_LABEL));
        }
    }

    fn on_load_progress(&mut self, index: usize, is_active: bool, progress: u8) {
        let progress = progress.min(100);
        self.tabs[index].load_state = LoadState::Loading { progress };
        if is_active {
            self.chrome.status = Some(StatusMessage::sticky(format!("Loading... {}%", progress)));
        }
    }

    fn on_load_finished(&mut self, index: usize, is_active: bool, success: bool) {
        self.tabs[index].load_state = LoadState::Finished { success };
        if is_active {
            self.chrome.status = Some(if success {
                StatusMessage::transient("Load Complete", LOAD_COMPLETE_TIMEOUT_MS)
            } else {
                failed_status(&self.tabs[index].url)
            });
        }
        if !success {
            warn!("tab {} failed to load {}", self.tabs[index].id, self.tabs[index].url);
        }
        self.apply_title(index, is_active);
    }

    fn apply_title(&mut self, index: usize, is_active: bool) {
        let tab = &mut self.tabs[index];
        tab.refresh_label();
        if is_active {
            self.chrome.window_title = display::window_title(&tab.title, &tab.url);
        }
    }

    // ---- page policy ----

    /// Routes a popup request from `source` through its page policy.
    pub fn request_new_window(&mut self, source: TabId, kind: WindowKind) -> NewWindowResponse {
        let policy = match self.index_of(source) {
            Some(index) if self.tabs[index].subscribed => self.tabs[index].policy,
            _ => {
                debug!("ignoring popup request from closed tab {}", source);
                return NewWindowResponse::Deny;
            }
        };
        policy.on_new_window_request(kind, self)
    }

    /// Decides a feature permission request from `source` and reports the
    /// decision to its surface. `None` when the tab is gone.
    pub fn request_feature_permission<P: UserPrompt + ?Sized>(
        &mut self,
        source: TabId,
        origin: &str,
        feature: Feature,
        prompt: &mut P,
    ) -> Option<PermissionDecision> {
        let index = self.index_of(source).filter(|index| self.tabs[*index].subscribed)?;
        let tab = &mut self.tabs[index];
        let decision = tab.policy.on_feature_permission_request(origin, feature, prompt);
        tab.surface.set_feature_permission(origin, feature, decision);
        Some(decision)
    }

    // ---- dialogs ----

    /// Runs the preferences dialog. Returns the new home page when it changed.
    pub fn open_preferences<H: DialogHost + ?Sized>(&mut self, host: &mut H) -> Option<String> {
        let text = preferences::exec(&self.home_url, host).confirmed()?;
        match self.set_home_page(&text) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("preferences rejected: {}", e);
                host.warn("Settings Error", &e.to_string());
                None
            }
        }
    }

    /// The security dialog as it would open now, for front-ends that render it
    /// before any command arrives.
    pub fn security_snapshot(&self) -> SecurityDialog {
        SecurityDialog::open(
            self.active_tab().map(|tab| tab.surface.as_ref() as &dyn RenderingSurface),
            self.profile.as_ref(),
        )
    }

    /// Runs the security dialog against the active tab and the shared profile.
    pub fn open_security_dialog<H: DialogHost + ?Sized>(&mut self, host: &mut H) -> DialogOutcome<usize> {
        let index = self.active_index();
        let surface: Option<&mut dyn RenderingSurface> = match index {
            Some(index) => Some(self.tabs[index].surface.as_mut() as &mut dyn RenderingSurface),
            None => None,
        };
        SecurityDialog::exec(surface, self.profile.as_mut(), host)
    }
}

impl TabOpener for TabSession {
    fn open_popup_tab(&mut self) -> Option<TabId> {
        match self.add_tab(Some(POPUP_URL), true) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("could not open popup tab: {}", e);
                None
            }
        }
    }
}

fn home_tooltip(home_url: &str) -> String {
    format!("Go to home page ({})", home_url)
}

fn failed_status(url: &str) -> StatusMessage {
    StatusMessage::transient(
        format!("Failed to load: {}", display::strip_query(url)),
        LOAD_FAILED_TIMEOUT_MS,
    )
}
