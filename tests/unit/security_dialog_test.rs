//! Unit tests for the Security & Privacy dialog.

use tabshell::dialogs::scripted::{PromptKind, ScriptedHost};
use tabshell::dialogs::security::{SecurityCommand, SecurityDialog};
use tabshell::engine::memory::{MemoryEngine, MemoryProfile, ProfileOp};
use tabshell::engine::{RenderingSurface, SurfaceFactory};
use tabshell::types::content::WebAttribute;
use tabshell::types::dialog::DialogOutcome;
use tabshell::types::tab::TabId;

fn surface(engine: &mut MemoryEngine, profile: &MemoryProfile) -> (TabId, Box<dyn RenderingSurface>) {
    let tab = TabId::new();
    let surface = engine.create_surface(tab, profile).unwrap();
    (tab, surface)
}

fn run(
    surface: Option<&mut Box<dyn RenderingSurface>>,
    profile: &mut MemoryProfile,
    host: &mut ScriptedHost,
) -> DialogOutcome<usize> {
    SecurityDialog::exec(surface.map(|s| s.as_mut() as &mut dyn RenderingSurface), profile, host)
}

#[test]
fn test_dialog_snapshots_live_attributes() {
    let mut engine = MemoryEngine::new();
    let profile = MemoryProfile::new("default");
    let (_tab, mut s) = surface(&mut engine, &profile);
    s.set_attribute(WebAttribute::PluginsEnabled, false);

    let dialog = SecurityDialog::open(Some(s.as_ref()), &profile);
    assert!(dialog.has_content_settings());
    assert_eq!(dialog.checkboxes().len(), WebAttribute::ALL.len());
    assert_eq!(dialog.is_checked(WebAttribute::PluginsEnabled), Some(false));
    assert_eq!(dialog.is_checked(WebAttribute::JavascriptEnabled), Some(true));
    assert_eq!(dialog.is_checked(WebAttribute::WebGlEnabled), Some(true));
    assert_eq!(
        dialog.checkboxes()[0].label,
        WebAttribute::JavascriptEnabled.info().label
    );
}

#[test]
fn test_unreadable_attribute_uses_table_default() {
    let mut engine = MemoryEngine::new();
    let profile = MemoryProfile::new("default");
    let (tab, s) = surface(&mut engine, &profile);
    engine.forget_attribute(tab, WebAttribute::WebGlEnabled);
    let dialog = SecurityDialog::open(Some(s.as_ref()), &profile);
    assert_eq!(dialog.is_checked(WebAttribute::WebGlEnabled), Some(false));
}

#[test]
fn test_confirm_applies_only_changed_attribute() {
    let mut engine = MemoryEngine::new();
    let mut profile = MemoryProfile::new("default");
    let (tab, mut s) = surface(&mut engine, &profile);
    let mut host = ScriptedHost::new()
        .security(SecurityCommand::Toggle(WebAttribute::JavascriptEnabled, false))
        .security(SecurityCommand::Toggle(WebAttribute::LocalStorageEnabled, true))
        .security(SecurityCommand::Apply);

    let outcome = run(Some(&mut s), &mut profile, &mut host);

    assert_eq!(outcome, DialogOutcome::Confirmed(1));
    let attrs = engine.surface(tab).unwrap().attributes;
    assert_eq!(attrs.get(&WebAttribute::JavascriptEnabled), Some(&false));
    assert_eq!(attrs.get(&WebAttribute::LocalStorageEnabled), Some(&true));
    let prompt = host.last_prompt().unwrap();
    assert_eq!(prompt.title, "Settings Applied");
    assert!(prompt.message.starts_with("1 setting(s) have been applied."));
}

#[test]
fn test_close_discards_local_edits() {
    let mut engine = MemoryEngine::new();
    let mut profile = MemoryProfile::new("default");
    let (tab, mut s) = surface(&mut engine, &profile);
    let before = engine.surface(tab).unwrap().attributes;
    let mut host = ScriptedHost::new()
        .security(SecurityCommand::Toggle(WebAttribute::JavascriptEnabled, false))
        .security(SecurityCommand::Toggle(WebAttribute::PdfViewerEnabled, false))
        .security(SecurityCommand::SetDoNotTrack(true))
        .security(SecurityCommand::Close);

    assert_eq!(run(Some(&mut s), &mut profile, &mut host), DialogOutcome::Cancelled);
    assert_eq!(engine.surface(tab).unwrap().attributes, before);
    assert!(profile.contents().headers.is_empty());
    assert!(host.prompts().is_empty());
}

#[test]
fn test_exhausted_host_closes_dialog() {
    let mut engine = MemoryEngine::new();
    let mut profile = MemoryProfile::new("default");
    let (_tab, mut s) = surface(&mut engine, &profile);
    let mut host = ScriptedHost::new();
    assert_eq!(run(Some(&mut s), &mut profile, &mut host), DialogOutcome::Cancelled);
    assert_eq!(host.security_views(), 1);
}

#[test]
fn test_apply_diffs_against_live_values_at_confirm_time() {
    let mut engine = MemoryEngine::new();
    let mut profile = MemoryProfile::new("default");
    let (_tab, mut s) = surface(&mut engine, &profile);
    let mut dialog = SecurityDialog::open(Some(s.as_ref()), &profile);
    dialog.set_checked(WebAttribute::JavascriptEnabled, false);
    // The page changed the live value while the dialog was open.
    s.set_attribute(WebAttribute::JavascriptEnabled, false);

    let mut host = ScriptedHost::new();
    let applied = dialog.apply(Some(s.as_mut() as &mut dyn RenderingSurface), &mut profile, &mut host);
    assert_eq!(applied, 0);
    assert_eq!(host.last_prompt().unwrap().title, "Settings");
}

#[test]
fn test_no_active_tab_disables_content_settings() {
    let mut profile = MemoryProfile::new("default");
    let dialog = SecurityDialog::open(None, &profile);
    assert!(!dialog.has_content_settings());
    assert!(dialog.checkboxes().is_empty());

    let mut edited = dialog.clone();
    assert!(!edited.set_checked(WebAttribute::JavascriptEnabled, false));

    let mut host = ScriptedHost::new()
        .security(SecurityCommand::Toggle(WebAttribute::JavascriptEnabled, false))
        .security(SecurityCommand::Apply);
    assert_eq!(run(None, &mut profile, &mut host), DialogOutcome::Confirmed(0));
}

#[test]
fn test_do_not_track_sets_header_without_counting() {
    let mut engine = MemoryEngine::new();
    let mut profile = MemoryProfile::new("default");
    let (_tab, mut s) = surface(&mut engine, &profile);
    let mut host = ScriptedHost::new()
        .security(SecurityCommand::SetDoNotTrack(true))
        .security(SecurityCommand::Apply);

    assert_eq!(run(Some(&mut s), &mut profile, &mut host), DialogOutcome::Confirmed(0));
    assert_eq!(profile.contents().headers.get("DNT").map(String::as_str), Some("1"));
    assert_eq!(
        host.last_prompt().unwrap().message,
        "No settings were changed.\nDo Not Track header set to 1."
    );
}

#[test]
fn test_unchecked_do_not_track_sends_zero() {
    let mut profile = MemoryProfile::new("default");
    let mut host = ScriptedHost::new().security(SecurityCommand::Apply);
    run(None, &mut profile, &mut host);
    assert_eq!(profile.contents().headers.get("DNT").map(String::as_str), Some("0"));
}

#[test]
fn test_do_not_track_disabled_without_header_support() {
    let mut profile = MemoryProfile::without_header_support("default");
    let mut dialog = SecurityDialog::open(None, &profile);
    let dnt = dialog.do_not_track();
    assert!(!dnt.enabled);
    assert!(!dnt.checked);
    assert_eq!(dnt.tooltip, "Requires an engine build with custom header support.");
    assert!(!dialog.set_do_not_track(true));

    let mut host = ScriptedHost::new()
        .security(SecurityCommand::SetDoNotTrack(true))
        .security(SecurityCommand::Apply);
    run(None, &mut profile, &mut host);
    assert!(profile.contents().headers.is_empty());
    assert_eq!(host.last_prompt().unwrap().message, "No settings were changed.");
}

#[test]
fn test_clear_cookies_declined_keeps_data() {
    let mut profile = MemoryProfile::new("default").with_data(5, 7, 9);
    let mut host = ScriptedHost::new()
        .answer(false)
        .security(SecurityCommand::ClearCookies)
        .security(SecurityCommand::Close);
    run(None, &mut profile, &mut host);
    assert_eq!(profile.contents().cookies, 5);
    assert_eq!(host.prompts().len(), 1);
    assert_eq!(host.prompts()[0].title, "Confirm Clear Cookies");
}

#[test]
fn test_clear_defaults_to_no() {
    let mut profile = MemoryProfile::new("default").with_data(5, 7, 9);
    let mut host = ScriptedHost::new().security(SecurityCommand::ClearCache);
    run(None, &mut profile, &mut host);
    assert_eq!(profile.contents().cache_entries, 7);
    assert_eq!(host.prompts()[0].answer, Some(false));
}

#[test]
fn test_confirmed_clears_act_immediately() {
    let mut profile = MemoryProfile::new("default").with_data(5, 7, 9);
    let mut host = ScriptedHost::new()
        .answer(true)
        .answer(true)
        .security(SecurityCommand::ClearCookies)
        .security(SecurityCommand::ClearCache)
        .security(SecurityCommand::Close);

    assert_eq!(run(None, &mut profile, &mut host), DialogOutcome::Cancelled);
    let contents = profile.contents();
    assert_eq!((contents.cookies, contents.cache_entries, contents.visited_links), (0, 0, 9));
    let titles: Vec<&str> = host.prompts().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Confirm Clear Cookies", "Cookies Cleared", "Confirm Clear Cache", "Cache Cleared"]
    );
}

#[test]
fn test_clear_all_data_empties_profile() {
    let mut profile = MemoryProfile::new("default").with_data(5, 7, 9);
    let dialog = SecurityDialog::open(None, &profile);
    let mut host = ScriptedHost::new().answer(true);
    assert!(dialog.clear_all_data(&mut profile, &mut host));
    let contents = profile.contents();
    assert_eq!((contents.cookies, contents.cache_entries, contents.visited_links), (0, 0, 0));
    assert_eq!(host.last_prompt().unwrap().title, "Browsing Data Cleared");
}

#[test]
fn test_clear_all_data_stops_at_first_failure() {
    let mut profile = MemoryProfile::new("default").with_data(5, 7, 9);
    profile.fail_on(ProfileOp::Cache);
    let dialog = SecurityDialog::open(None, &profile);
    let mut host = ScriptedHost::new().answer(true);

    assert!(!dialog.clear_all_data(&mut profile, &mut host));
    let contents = profile.contents();
    assert_eq!(contents.visited_links, 0);
    assert_eq!(contents.cache_entries, 7);
    assert_eq!(contents.cookies, 5);

    let prompt = host.last_prompt().unwrap();
    assert_eq!(prompt.kind, PromptKind::Warn);
    assert_eq!(prompt.title, "Clear Failed");
    assert!(prompt.message.starts_with("Could not clear HTTP cache:"));
    assert!(prompt.message.contains("storage is locked"));
}

#[test]
fn test_clear_cookies_failure_is_reported() {
    let mut profile = MemoryProfile::new("default").with_data(5, 7, 9);
    profile.fail_on(ProfileOp::Cookies);
    let dialog = SecurityDialog::open(None, &profile);
    let mut host = ScriptedHost::new().answer(true);
    assert!(!dialog.clear_cookies(&mut profile, &mut host));
    assert_eq!(host.last_prompt().unwrap().title, "Clear Failed");
    assert_eq!(profile.contents().cookies, 5);
}
