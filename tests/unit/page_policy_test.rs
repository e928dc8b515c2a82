//! Unit tests for the per-surface popup and permission policy.

use rstest::rstest;
use tabshell::dialogs::scripted::{PromptKind, ScriptedHost};
use tabshell::managers::page_policy::{PagePolicy, TabOpener};
use tabshell::types::permission::{Feature, FeatureRule, NewWindowResponse, PermissionDecision, WindowKind};
use tabshell::types::tab::TabId;

/// Opener that records how often it was asked and can be made to fail.
struct FakeOpener {
    opened: Vec<TabId>,
    fail: bool,
}

impl FakeOpener {
    fn new() -> Self {
        Self { opened: Vec::new(), fail: false }
    }
}

impl TabOpener for FakeOpener {
    fn open_popup_tab(&mut self) -> Option<TabId> {
        if self.fail {
            return None;
        }
        let id = TabId::new();
        self.opened.push(id);
        Some(id)
    }
}

#[rstest]
#[case(Feature::Fullscreen, FeatureRule::AutoGrant)]
#[case(Feature::PointerLock, FeatureRule::AutoGrant)]
#[case(Feature::Geolocation, FeatureRule::Prompt)]
#[case(Feature::Notifications, FeatureRule::AutoDeny)]
#[case(Feature::MediaAudioCapture, FeatureRule::AutoDeny)]
#[case(Feature::MediaVideoCapture, FeatureRule::AutoDeny)]
#[case(Feature::MediaAudioVideoCapture, FeatureRule::AutoDeny)]
#[case(Feature::DesktopVideoCapture, FeatureRule::AutoDeny)]
#[case(Feature::DesktopAudioVideoCapture, FeatureRule::AutoDeny)]
#[case(Feature::ClipboardReadWrite, FeatureRule::AutoDeny)]
fn test_feature_rules(#[case] feature: Feature, #[case] expected: FeatureRule) {
    assert_eq!(PagePolicy::feature_rule(feature), expected);
}

#[rstest]
#[case(Feature::Fullscreen, PermissionDecision::Grant)]
#[case(Feature::PointerLock, PermissionDecision::Grant)]
#[case(Feature::Notifications, PermissionDecision::Deny)]
#[case(Feature::MediaVideoCapture, PermissionDecision::Deny)]
#[case(Feature::ClipboardReadWrite, PermissionDecision::Deny)]
fn test_non_prompting_features_never_ask(#[case] feature: Feature, #[case] expected: PermissionDecision) {
    let policy = PagePolicy::new(TabId::new());
    let mut host = ScriptedHost::new().answer(true);
    let decision = policy.on_feature_permission_request("https://site.test", feature, &mut host);
    assert_eq!(decision, expected);
    assert!(host.prompts().is_empty());
}

#[rstest]
#[case(true, PermissionDecision::Grant)]
#[case(false, PermissionDecision::Deny)]
fn test_geolocation_follows_user_answer(#[case] answer: bool, #[case] expected: PermissionDecision) {
    let policy = PagePolicy::new(TabId::new());
    let mut host = ScriptedHost::new().answer(answer);
    let decision =
        policy.on_feature_permission_request("https://maps.example.org:443", Feature::Geolocation, &mut host);
    assert_eq!(decision, expected);

    let prompt = host.last_prompt().unwrap();
    assert_eq!(prompt.kind, PromptKind::Ask);
    assert_eq!(prompt.title, "Location Permission");
    assert_eq!(prompt.message, "Allow maps.example.org to access your location?");
}

#[test]
fn test_geolocation_defaults_to_deny() {
    let policy = PagePolicy::new(TabId::new());
    let mut host = ScriptedHost::new();
    let decision = policy.on_feature_permission_request("https://a.test", Feature::Geolocation, &mut host);
    assert_eq!(decision, PermissionDecision::Deny);
    assert_eq!(host.last_prompt().unwrap().answer, Some(false));
}

#[test]
fn test_geolocation_prompt_uses_origin_without_host() {
    let policy = PagePolicy::new(TabId::new());
    let mut host = ScriptedHost::new();
    policy.on_feature_permission_request("null", Feature::Geolocation, &mut host);
    assert_eq!(host.last_prompt().unwrap().message, "Allow null to access your location?");
}

#[rstest]
#[case(WindowKind::Tab)]
#[case(WindowKind::Window)]
#[case(WindowKind::Dialog)]
fn test_foreground_popups_open_a_tab(#[case] kind: WindowKind) {
    let policy = PagePolicy::new(TabId::new());
    let mut opener = FakeOpener::new();
    let response = policy.on_new_window_request(kind, &mut opener);
    assert_eq!(opener.opened.len(), 1);
    assert_eq!(response, NewWindowResponse::Open(opener.opened[0]));
}

#[test]
fn test_background_popup_is_denied_without_opening() {
    let policy = PagePolicy::new(TabId::new());
    let mut opener = FakeOpener::new();
    assert_eq!(
        policy.on_new_window_request(WindowKind::BackgroundTab, &mut opener),
        NewWindowResponse::Deny
    );
    assert!(opener.opened.is_empty());
}

#[test]
fn test_popup_denied_when_opener_fails() {
    let policy = PagePolicy::new(TabId::new());
    let mut opener = FakeOpener { opened: Vec::new(), fail: true };
    assert_eq!(policy.on_new_window_request(WindowKind::Tab, &mut opener), NewWindowResponse::Deny);
}

#[test]
fn test_policy_remembers_its_tab() {
    let tab = TabId::new();
    assert_eq!(PagePolicy::new(tab).tab(), tab);
}
