//! Tabshell: a tabbed web-browser shell.
//!
//! Entry point: opens the browser window on the wry/tao front-end. When built
//! without the `gui` feature, drives the shell against the in-process engine
//! and prints what the window would show.

#[cfg(feature = "gui")]
fn main() {
    tabshell::app::init_logging();
    if let Err(e) = tabshell::ui::webview_app::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "gui"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tabshell::app::{init_logging, App};
    use tabshell::dialogs::scripted::ScriptedHost;
    use tabshell::dialogs::security::SecurityCommand;
    use tabshell::engine::memory::{MemoryEngine, MemoryProfile};
    use tabshell::types::content::WebAttribute;
    use tabshell::types::dialog::DialogOutcome;
    use tabshell::types::permission::{Feature, WindowKind};

    init_logging();
    println!();
    println!("Tabshell v{} (headless)", env!("CARGO_PKG_VERSION"));
    println!();

    let settings_dir = std::env::temp_dir().join("tabshell-demo");
    let settings_path = settings_dir.join("settings.json").to_string_lossy().to_string();
    let engine = MemoryEngine::new();
    let profile = MemoryProfile::new("default").with_data(12, 40, 7);
    let mut app = App::new(Some(settings_path), Box::new(engine.clone()), Box::new(profile.clone()))?;

    section("Tabs");
    let first = app.session.active_id().ok_or("no first tab")?;
    pump(&engine, &mut app);
    engine.progress(first, 60);
    engine.finish(first, true, Some("Google"));
    pump(&engine, &mut app);

    let docs = app.session.add_tab(Some("https://doc.rust-lang.org/std/?search=vec"), false)?;
    app.session.navigate("crates.io");
    pump(&engine, &mut app);
    engine.finish(docs, false, None);
    pump(&engine, &mut app);
    print_window(&app);

    app.session.set_active(1);
    print_window(&app);

    section("Page policy");
    let popup = app.session.request_new_window(docs, WindowKind::Window);
    println!("  window popup      -> {:?}", popup);
    let background = app.session.request_new_window(docs, WindowKind::BackgroundTab);
    println!("  background popup  -> {:?}", background);
    let mut host = ScriptedHost::new().answer(true);
    for feature in [Feature::Fullscreen, Feature::Geolocation, Feature::Notifications] {
        let decision = app
            .session
            .request_feature_permission(docs, "https://maps.example.org", feature, &mut host);
        println!("  {:<16?} -> {:?}", feature, decision);
    }
    pump(&engine, &mut app);

    section("Preferences");
    let mut host = ScriptedHost::new().preferences(DialogOutcome::Confirmed("  ".to_string()));
    app.open_preferences(&mut host);
    if let Some(prompt) = host.last_prompt() {
        println!("  blank home page   -> {}: {}", prompt.title, prompt.message);
    }
    let mut host = ScriptedHost::new().preferences(DialogOutcome::Confirmed("example.org".to_string()));
    let home = app.open_preferences(&mut host);
    println!("  new home page     -> {:?}", home);
    println!("  home tooltip      -> {}", app.session.chrome().home_tooltip);

    section("Security & Privacy");
    let mut host = ScriptedHost::new()
        .security(SecurityCommand::Toggle(WebAttribute::JavascriptEnabled, false))
        .security(SecurityCommand::SetDoNotTrack(true))
        .security(SecurityCommand::ClearAllData)
        .answer(true)
        .security(SecurityCommand::Apply);
    let outcome = app.open_security_dialog(&mut host);
    println!("  outcome           -> {:?}", outcome);
    for prompt in host.prompts() {
        println!("  [{:?}] {}: {}", prompt.kind, prompt.title, prompt.message.replace('\n', " "));
    }
    println!("  profile           -> {:?}", profile.contents());

    section("Closing");
    while !app.should_exit() {
        app.session.close_active_tab();
        println!("  tabs left: {}", app.session.tab_count());
    }
    app.shutdown();
    let _ = std::fs::remove_dir_all(&settings_dir);
    println!();
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("--- {} ---", name);
}

#[cfg(not(feature = "gui"))]
fn pump(engine: &tabshell::engine::memory::MemoryEngine, app: &mut tabshell::app::App) {
    for event in engine.drain_events() {
        app.session.handle_event(event);
    }
}

#[cfg(not(feature = "gui"))]
fn print_window(app: &tabshell::app::App) {
    let chrome = app.session.chrome();
    println!("  window   : {}", chrome.window_title);
    println!("  address  : {}", chrome.address_bar);
    if let Some(status) = &chrome.status {
        println!("  status   : {}", status.text);
    }
    println!(
        "  buttons  : back={} forward={} stop={}",
        chrome.back_enabled, chrome.forward_enabled, chrome.stop_enabled
    );
    for entry in app.session.tab_strip() {
        let marker = if entry.active { "*" } else { " " };
        println!("  {} [{}] {}", marker, entry.label, entry.tooltip);
    }
    println!();
}
