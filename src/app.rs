//! Application bootstrap.
//!
//! Ties the persisted settings, the tab session and the toolbar icons
//! together. Front-ends own an [`App`] and forward user commands and surface
//! events to `app.session`.

use log::{error, info, warn};

use crate::dialogs::DialogHost;
use crate::engine::{Profile, SurfaceFactory};
use crate::managers::tab_session::TabSession;
use crate::services::icon_provider::{IconHandle, IconProvider};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::dialog::DialogOutcome;
use crate::types::errors::ShellError;

/// Installs the `env_logger` backend. `RUST_LOG` overrides the `info` default.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Central application struct.
pub struct App {
    pub session: TabSession,
    pub settings_engine: SettingsEngine,
    pub icons: Vec<IconHandle>,
}

impl App {
    /// Loads settings from `settings_path` (or the platform default), builds
    /// the session on the configured home page and opens the first tab.
    pub fn new(
        settings_path: Option<String>,
        factory: Box<dyn SurfaceFactory>,
        profile: Box<dyn Profile>,
    ) -> Result<Self, ShellError> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = match settings_engine.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}; continuing with default settings", e);
                settings_engine.get_settings().clone()
            }
        };

        let icons = IconProvider::default().load_all();
        let mut session = TabSession::new(factory, profile, &settings.general.home_page);
        if let Err(e) = session.add_tab(None, true) {
            error!("could not open the first tab: {}", e);
            return Err(e.into());
        }
        info!(
            "started with home page {} (settings at {})",
            session.home_url(),
            settings_engine.get_config_path()
        );

        Ok(Self { session, settings_engine, icons })
    }

    /// Runs the preferences dialog and persists a changed home page.
    pub fn open_preferences<H: DialogHost + ?Sized>(&mut self, host: &mut H) -> Option<String> {
        let url = self.session.open_preferences(host)?;
        if let Err(e) = self
            .settings_engine
            .set_value("general.home_page", serde_json::Value::String(url.clone()))
        {
            warn!("home page changed but not saved: {}", e);
        }
        Some(url)
    }

    pub fn open_security_dialog<H: DialogHost + ?Sized>(&mut self, host: &mut H) -> DialogOutcome<usize> {
        self.session.open_security_dialog(host)
    }

    /// True once the last tab has closed.
    pub fn should_exit(&self) -> bool {
        self.session.is_closed()
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
        info!("shut down");
    }
}
