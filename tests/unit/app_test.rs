//! Unit tests for application bootstrap: settings, first tab and persistence.

use std::fs;

use tabshell::app::App;
use tabshell::dialogs::scripted::ScriptedHost;
use tabshell::dialogs::security::SecurityCommand;
use tabshell::engine::memory::{MemoryEngine, MemoryProfile};
use tabshell::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabshell::types::content::WebAttribute;
use tabshell::types::dialog::DialogOutcome;
use tabshell::types::errors::{EngineError, ShellError};
use tempfile::TempDir;

fn settings_path(dir: &TempDir) -> String {
    dir.path().join("settings.json").to_string_lossy().to_string()
}

fn start(dir: &TempDir) -> (MemoryEngine, App) {
    let engine = MemoryEngine::new();
    let app = App::new(
        Some(settings_path(dir)),
        Box::new(engine.clone()),
        Box::new(MemoryProfile::new("default")),
    )
    .unwrap();
    (engine, app)
}

#[test]
fn test_first_tab_opens_on_configured_home_page() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{ "general": { "home_page": "start.example" } }"#,
    )
    .unwrap();
    let (engine, app) = start(&dir);

    assert_eq!(app.session.home_url(), "https://start.example");
    assert_eq!(app.session.tab_count(), 1);
    let first = app.session.active_id().unwrap();
    assert_eq!(engine.surface(first).unwrap().url, "https://start.example");
    assert!(!app.should_exit());
}

#[test]
fn test_missing_settings_file_uses_default_home_page() {
    let dir = TempDir::new().unwrap();
    let (_engine, app) = start(&dir);
    assert_eq!(app.session.home_url(), "https://www.google.com");
    assert!(!app.icons.is_empty());
}

#[test]
fn test_malformed_settings_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "not json at all").unwrap();
    let (_engine, app) = start(&dir);
    assert_eq!(app.session.home_url(), "https://www.google.com");
    assert_eq!(app.session.tab_count(), 1);
}

#[test]
fn test_first_tab_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let engine = MemoryEngine::new();
    engine.fail_next_surface("no display");
    let result = App::new(
        Some(settings_path(&dir)),
        Box::new(engine.clone()),
        Box::new(MemoryProfile::new("default")),
    );
    match result {
        Err(ShellError::Engine(EngineError::SurfaceCreation(reason))) => assert_eq!(reason, "no display"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("startup should fail without a first tab"),
    }
}

#[test]
fn test_preferences_change_is_persisted() {
    let dir = TempDir::new().unwrap();
    let (_engine, mut app) = start(&dir);
    let mut host = ScriptedHost::new().preferences(DialogOutcome::Confirmed("example.net".into()));

    assert_eq!(app.open_preferences(&mut host).as_deref(), Some("https://example.net"));

    let mut stored = SettingsEngine::new(Some(settings_path(&dir)));
    assert_eq!(stored.load().unwrap().general.home_page, "https://example.net");
}

#[test]
fn test_rejected_preferences_are_not_persisted() {
    let dir = TempDir::new().unwrap();
    let (_engine, mut app) = start(&dir);
    let mut host = ScriptedHost::new().preferences(DialogOutcome::Confirmed(String::new()));
    assert_eq!(app.open_preferences(&mut host), None);
    assert!(!dir.path().join("settings.json").exists());
}

#[test]
fn test_security_dialog_reaches_active_tab() {
    let dir = TempDir::new().unwrap();
    let (engine, mut app) = start(&dir);
    let tab = app.session.active_id().unwrap();
    let mut host = ScriptedHost::new()
        .security(SecurityCommand::Toggle(WebAttribute::PluginsEnabled, false))
        .security(SecurityCommand::Apply);
    assert_eq!(app.open_security_dialog(&mut host), DialogOutcome::Confirmed(1));
    let attrs = engine.surface(tab).unwrap().attributes;
    assert_eq!(attrs.get(&WebAttribute::PluginsEnabled), Some(&false));
}

#[test]
fn test_shutdown_closes_session() {
    let dir = TempDir::new().unwrap();
    let (engine, mut app) = start(&dir);
    let tab = app.session.active_id().unwrap();
    app.shutdown();
    assert!(app.should_exit());
    assert!(engine.surface(tab).unwrap().destroyed);
}
