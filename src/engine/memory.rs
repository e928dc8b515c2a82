//! In-process engine used by the headless demo and the test suite.
//!
//! Surfaces keep their state in a table shared with the [`MemoryEngine`]
//! handle, so a driver can complete loads, rename pages and inspect every
//! request the shell made. Lifecycle events are queued per surface and only
//! reach the shell when the driver drains them, which mirrors the
//! asynchronous delivery of a real engine.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use log::debug;

use crate::engine::{Profile, RenderingSurface, SurfaceEvent, SurfaceEventKind, SurfaceFactory};
use crate::types::content::WebAttribute;
use crate::types::errors::EngineError;
use crate::types::permission::{Feature, PermissionDecision};
use crate::types::tab::TabId;

/// A request the shell made against a surface, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Created(TabId),
    Load(TabId, String),
    Stop(TabId),
    Back(TabId),
    Forward(TabId),
    Reload(TabId),
    SetAttribute(TabId, WebAttribute, bool),
    Permission(TabId, String, Feature, PermissionDecision),
    Inspector(TabId),
    Disconnected(TabId),
    Destroyed(TabId),
}

/// Snapshot of one memory surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRecord {
    pub profile: String,
    pub url: String,
    pub title: String,
    pub loading: bool,
    pub history: Vec<String>,
    pub cursor: usize,
    pub attributes: BTreeMap<WebAttribute, bool>,
    pub visible: bool,
    pub connected: bool,
    pub destroyed: bool,
}

impl SurfaceRecord {
    fn new(profile: &str) -> Self {
        let attributes = WebAttribute::ALL
            .iter()
            .map(|attr| {
                // Engines usually ship WebGL on; the shell is expected to harden it.
                let value = match attr {
                    WebAttribute::WebGlEnabled => true,
                    other => other.info().default,
                };
                (*attr, value)
            })
            .collect();
        Self {
            profile: profile.to_string(),
            url: String::new(),
            title: String::new(),
            loading: false,
            history: Vec::new(),
            cursor: 0,
            attributes,
            visible: false,
            connected: true,
            destroyed: false,
        }
    }

    fn can_go_back(&self) -> bool {
        !self.history.is_empty() && self.cursor > 0
    }

    fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }
}

#[derive(Default)]
struct EngineState {
    surfaces: HashMap<TabId, SurfaceRecord>,
    pending: VecDeque<SurfaceEvent>,
    calls: Vec<EngineCall>,
    fail_next: Option<String>,
    inspector_available: bool,
}

impl EngineState {
    fn emit(&mut self, tab: TabId, kind: SurfaceEventKind) {
        match self.surfaces.get(&tab) {
            Some(record) if record.connected && !record.destroyed => {
                self.pending.push_back(SurfaceEvent::new(tab, kind));
            }
            _ => debug!("memory engine: suppressed {:?} for detached surface {}", kind, tab),
        }
    }

    fn begin_load(&mut self, tab: TabId) {
        let url = match self.surfaces.get_mut(&tab) {
            Some(record) => {
                record.loading = true;
                record.url.clone()
            }
            None => return,
        };
        self.emit(tab, SurfaceEventKind::LoadStarted);
        self.emit(tab, SurfaceEventKind::UrlChanged(url));
    }
}

/// Handle to the in-process engine. Cloning shares the same state.
#[derive(Clone)]
pub struct MemoryEngine {
    state: Rc<RefCell<EngineState>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        let state = EngineState {
            inspector_available: true,
            ..EngineState::default()
        };
        Self { state: Rc::new(RefCell::new(state)) }
    }

    /// Makes the next `create_surface` call fail with `reason`.
    pub fn fail_next_surface(&self, reason: &str) {
        self.state.borrow_mut().fail_next = Some(reason.to_string());
    }

    pub fn set_inspector_available(&self, available: bool) {
        self.state.borrow_mut().inspector_available = available;
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        self.state.borrow_mut().pending.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.borrow().calls.clone()
    }

    pub fn surface(&self, tab: TabId) -> Option<SurfaceRecord> {
        self.state.borrow().surfaces.get(&tab).cloned()
    }

    /// Starts a page-initiated load of the current URL of `tab`.
    pub fn start(&self, tab: TabId) {
        self.state.borrow_mut().begin_load(tab);
    }

    /// Reports load progress for `tab`. A surface reporting progress is loading.
    pub fn progress(&self, tab: TabId, percent: u8) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.surfaces.get_mut(&tab) {
            record.loading = true;
        }
        state.emit(tab, SurfaceEventKind::LoadProgress(percent.min(100)));
    }

    /// Renames the page shown by `tab`.
    pub fn set_title(&self, tab: TabId, title: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.surfaces.get_mut(&tab) {
            record.title = title.to_string();
        }
        state.emit(tab, SurfaceEventKind::TitleChanged(title.to_string()));
    }

    /// Moves `tab` to `url` without a load, like a redirect or fragment change.
    pub fn set_url(&self, tab: TabId, url: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.surfaces.get_mut(&tab) {
            record.url = url.to_string();
            if let Some(entry) = record.history.get_mut(record.cursor) {
                *entry = url.to_string();
            }
        }
        state.emit(tab, SurfaceEventKind::UrlChanged(url.to_string()));
    }

    /// Completes the current load of `tab`, naming the page on success.
    pub fn finish(&self, tab: TabId, success: bool, title: Option<&str>) {
        let mut state = self.state.borrow_mut();
        match state.surfaces.get_mut(&tab) {
            Some(record) => {
                record.loading = false;
                if let Some(title) = title {
                    record.title = title.to_string();
                }
            }
            None => return,
        }
        if let Some(title) = title {
            state.emit(tab, SurfaceEventKind::TitleChanged(title.to_string()));
        }
        state.emit(tab, SurfaceEventKind::LoadFinished { success });
    }

    /// Makes `attribute` unreadable on `tab`, as an engine build without it would.
    pub fn forget_attribute(&self, tab: TabId, attribute: WebAttribute) {
        if let Some(record) = self.state.borrow_mut().surfaces.get_mut(&tab) {
            record.attributes.remove(&attribute);
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceFactory for MemoryEngine {
    fn create_surface(
        &mut self,
        tab: TabId,
        profile: &dyn Profile,
    ) -> Result<Box<dyn RenderingSurface>, EngineError> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.fail_next.take() {
            return Err(EngineError::SurfaceCreation(reason));
        }
        state.surfaces.insert(tab, SurfaceRecord::new(profile.name()));
        state.calls.push(EngineCall::Created(tab));
        Ok(Box::new(MemorySurface { tab, state: self.state.clone() }))
    }
}

/// A surface living in the [`MemoryEngine`] table.
pub struct MemorySurface {
    tab: TabId,
    state: Rc<RefCell<EngineState>>,
}

impl MemorySurface {
    fn read<T>(&self, f: impl FnOnce(&SurfaceRecord) -> T, fallback: T) -> T {
        self.state.borrow().surfaces.get(&self.tab).map(f).unwrap_or(fallback)
    }

    fn step_history(&mut self, forward: bool) {
        let mut state = self.state.borrow_mut();
        let moved = match state.surfaces.get_mut(&self.tab) {
            Some(record) if forward && record.can_go_forward() => {
                record.cursor += 1;
                true
            }
            Some(record) if !forward && record.can_go_back() => {
                record.cursor -= 1;
                true
            }
            _ => false,
        };
        if moved {
            if let Some(record) = state.surfaces.get_mut(&self.tab) {
                record.url = record.history[record.cursor].clone();
                record.title.clear();
            }
            state.begin_load(self.tab);
        }
    }
}

impl RenderingSurface for MemorySurface {
    fn load(&mut self, url: &str) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::Load(self.tab, url.to_string()));
        if let Some(record) = state.surfaces.get_mut(&self.tab) {
            if !record.history.is_empty() {
                record.history.truncate(record.cursor + 1);
            }
            record.history.push(url.to_string());
            record.cursor = record.history.len() - 1;
            record.url = url.to_string();
            record.title.clear();
        }
        state.begin_load(self.tab);
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::Stop(self.tab));
        let was_loading = match state.surfaces.get_mut(&self.tab) {
            Some(record) => std::mem::replace(&mut record.loading, false),
            None => false,
        };
        if was_loading {
            state.emit(self.tab, SurfaceEventKind::LoadFinished { success: false });
        }
    }

    fn back(&mut self) {
        self.state.borrow_mut().calls.push(EngineCall::Back(self.tab));
        self.step_history(false);
    }

    fn forward(&mut self) {
        self.state.borrow_mut().calls.push(EngineCall::Forward(self.tab));
        self.step_history(true);
    }

    fn reload(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::Reload(self.tab));
        let has_page = state
            .surfaces
            .get(&self.tab)
            .map(|record| !record.url.is_empty())
            .unwrap_or(false);
        if has_page {
            state.begin_load(self.tab);
        }
    }

    fn current_url(&self) -> String {
        self.read(|record| record.url.clone(), String::new())
    }

    fn current_title(&self) -> String {
        self.read(|record| record.title.clone(), String::new())
    }

    fn is_loading(&self) -> bool {
        self.read(|record| record.loading, false)
    }

    fn can_go_back(&self) -> bool {
        self.read(SurfaceRecord::can_go_back, false)
    }

    fn can_go_forward(&self) -> bool {
        self.read(SurfaceRecord::can_go_forward, false)
    }

    fn attribute(&self, attribute: WebAttribute) -> Option<bool> {
        self.read(|record| record.attributes.get(&attribute).copied(), None)
    }

    fn set_attribute(&mut self, attribute: WebAttribute, value: bool) {
        let mut state = self.state.borrow_mut();
        state.calls.push(EngineCall::SetAttribute(self.tab, attribute, value));
        if let Some(record) = state.surfaces.get_mut(&self.tab) {
            record.attributes.insert(attribute, value);
        }
    }

    fn set_feature_permission(&mut self, origin: &str, feature: Feature, decision: PermissionDecision) {
        self.state.borrow_mut().calls.push(EngineCall::Permission(
            self.tab,
            origin.to_string(),
            feature,
            decision,
        ));
    }

    fn set_visible(&mut self, visible: bool) {
        if let Some(record) = self.state.borrow_mut().surfaces.get_mut(&self.tab) {
            record.visible = visible;
        }
    }

    fn open_inspector(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.inspector_available {
            return false;
        }
        state.calls.push(EngineCall::Inspector(self.tab));
        true
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        let tab = self.tab;
        let was_connected = match state.surfaces.get_mut(&tab) {
            Some(record) => std::mem::replace(&mut record.connected, false),
            None => false,
        };
        if was_connected {
            state.pending.retain(|event| event.tab != tab);
            state.calls.push(EngineCall::Disconnected(tab));
        }
    }
}

impl Drop for MemorySurface {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.surfaces.get_mut(&self.tab) {
            record.destroyed = true;
            record.visible = false;
        }
        state.calls.push(EngineCall::Destroyed(self.tab));
    }
}

/// Which profile operation a [`MemoryProfile`] should refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOp {
    Cookies,
    Cache,
    VisitedLinks,
}

/// Contents of a [`MemoryProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileContents {
    pub cookies: usize,
    pub cache_entries: usize,
    pub visited_links: usize,
    pub headers: BTreeMap<String, String>,
}

/// Shared in-memory profile. Cloning shares the same contents.
#[derive(Clone)]
pub struct MemoryProfile {
    name: String,
    supports_headers: bool,
    contents: Rc<RefCell<ProfileContents>>,
    failing: Rc<RefCell<Option<ProfileOp>>>,
}

impl MemoryProfile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supports_headers: true,
            contents: Rc::new(RefCell::new(ProfileContents::default())),
            failing: Rc::new(RefCell::new(None)),
        }
    }

    /// A profile for an engine build that cannot set request headers.
    pub fn without_header_support(name: &str) -> Self {
        Self { supports_headers: false, ..Self::new(name) }
    }

    /// Seeds the profile with some stored data.
    pub fn with_data(self, cookies: usize, cache_entries: usize, visited_links: usize) -> Self {
        {
            let mut contents = self.contents.borrow_mut();
            contents.cookies = cookies;
            contents.cache_entries = cache_entries;
            contents.visited_links = visited_links;
        }
        self
    }

    pub fn fail_on(&self, op: ProfileOp) {
        *self.failing.borrow_mut() = Some(op);
    }

    pub fn contents(&self) -> ProfileContents {
        self.contents.borrow().clone()
    }

    fn check(&self, op: ProfileOp) -> Result<(), EngineError> {
        if *self.failing.borrow() == Some(op) {
            return Err(EngineError::Profile(format!("{:?} storage is locked", op)));
        }
        Ok(())
    }
}

impl Profile for MemoryProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn clear_cookies(&mut self) -> Result<(), EngineError> {
        self.check(ProfileOp::Cookies)?;
        self.contents.borrow_mut().cookies = 0;
        Ok(())
    }

    fn clear_http_cache(&mut self) -> Result<(), EngineError> {
        self.check(ProfileOp::Cache)?;
        self.contents.borrow_mut().cache_entries = 0;
        Ok(())
    }

    fn clear_visited_links(&mut self) -> Result<(), EngineError> {
        self.check(ProfileOp::VisitedLinks)?;
        self.contents.borrow_mut().visited_links = 0;
        Ok(())
    }

    fn supports_custom_headers(&self) -> bool {
        self.supports_headers
    }

    fn set_http_header(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if !self.supports_headers {
            return Err(EngineError::Unsupported("custom HTTP headers".to_string()));
        }
        self.contents
            .borrow_mut()
            .headers
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}
