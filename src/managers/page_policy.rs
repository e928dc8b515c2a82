//! Popup and feature-permission policy, one instance per rendering surface.

use log::{debug, info};

use crate::dialogs::UserPrompt;
use crate::services::display::host_of;
use crate::types::permission::{Feature, FeatureRule, NewWindowResponse, PermissionDecision, WindowKind};
use crate::types::tab::TabId;

/// Something that can open a tab for popup content.
pub trait TabOpener {
    /// Creates and activates a tab for a popup. `None` when that failed.
    fn open_popup_tab(&mut self) -> Option<TabId>;
}

/// Policy bound to the surface of one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    tab: TabId,
}

impl PagePolicy {
    pub fn new(tab: TabId) -> Self {
        Self { tab }
    }

    /// The tab whose surface this policy answers for.
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Fixed treatment of each feature kind.
    pub fn feature_rule(feature: Feature) -> FeatureRule {
        match feature {
            Feature::Fullscreen | Feature::PointerLock => FeatureRule::AutoGrant,
            Feature::Geolocation => FeatureRule::Prompt,
            _ => FeatureRule::AutoDeny,
        }
    }

    /// Tab, window and dialog popups open as a new active tab; anything else is denied.
    pub fn on_new_window_request<O: TabOpener + ?Sized>(
        &self,
        kind: WindowKind,
        opener: &mut O,
    ) -> NewWindowResponse {
        match kind {
            WindowKind::Tab | WindowKind::Window | WindowKind::Dialog => {
                match opener.open_popup_tab() {
                    Some(tab) => {
                        debug!("popup ({:?}) from tab {} opened as tab {}", kind, self.tab, tab);
                        NewWindowResponse::Open(tab)
                    }
                    None => NewWindowResponse::Deny,
                }
            }
            other => {
                debug!("denied {:?} popup from tab {}", other, self.tab);
                NewWindowResponse::Deny
            }
        }
    }

    /// Decides one permission request. Exactly one decision per call.
    pub fn on_feature_permission_request<P: UserPrompt + ?Sized>(
        &self,
        origin: &str,
        feature: Feature,
        prompt: &mut P,
    ) -> PermissionDecision {
        let host = match host_of(origin) {
            host if host.is_empty() => origin.to_string(),
            host => host,
        };
        let decision = match Self::feature_rule(feature) {
            FeatureRule::AutoGrant => PermissionDecision::Grant,
            FeatureRule::AutoDeny => PermissionDecision::Deny,
            FeatureRule::Prompt => {
                let allowed = prompt.ask(
                    "Location Permission",
                    &format!("Allow {} to access your location?", host),
                    false,
                );
                if allowed {
                    PermissionDecision::Grant
                } else {
                    PermissionDecision::Deny
                }
            }
        };
        info!("{:?} for {} requested by {}: {:?}", feature, self.tab, host, decision);
        decision
    }
}
