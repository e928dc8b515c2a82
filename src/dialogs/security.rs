//! Security & Privacy dialog.
//!
//! Content settings are edited on a local copy taken when the dialog opens and
//! only written back on "Apply & Close", diffed against the live values at
//! that moment. Profile-wide clear actions act immediately after their own
//! confirmation and cannot be undone.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dialogs::{DialogHost, UserPrompt};
use crate::engine::{Profile, RenderingSurface};
use crate::types::content::WebAttribute;
use crate::types::dialog::DialogOutcome;

pub const SECURITY_TITLE: &str = "Security & Privacy";
pub const NO_ACTIVE_PAGE_NOTE: &str = "No active page to configure content settings for.";
pub const RELOAD_NOTE: &str = "Note: Some settings may require a page reload to take full effect.";
pub const DNT_LABEL: &str = "Send 'Do Not Track' (DNT) Header";
const DNT_TOOLTIP: &str = "Asks websites not to track you. Compliance is voluntary.";
const DNT_UNSUPPORTED_TOOLTIP: &str = "Requires an engine build with custom header support.";

/// A user action inside the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityCommand {
    Toggle(WebAttribute, bool),
    SetDoNotTrack(bool),
    ClearCookies,
    ClearCache,
    ClearAllData,
    /// "Apply & Close".
    Apply,
    /// "Close": discard edits.
    Close,
}

/// One content-setting checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkbox {
    pub attribute: WebAttribute,
    pub label: &'static str,
    pub tooltip: &'static str,
    pub checked: bool,
}

/// The Do-Not-Track checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoNotTrack {
    pub checked: bool,
    pub enabled: bool,
    pub tooltip: &'static str,
}

/// Local state of an open security dialog.
#[derive(Debug, Clone)]
pub struct SecurityDialog {
    content: Option<Vec<Checkbox>>,
    do_not_track: DoNotTrack,
}

impl SecurityDialog {
    /// Snapshots the active tab's content settings, if there is an active tab.
    pub fn open(surface: Option<&dyn RenderingSurface>, profile: &dyn Profile) -> Self {
        let content = surface.map(|surface| {
            WebAttribute::ALL
                .iter()
                .map(|attribute| {
                    let meta = attribute.info();
                    Checkbox {
                        attribute: *attribute,
                        label: meta.label,
                        tooltip: meta.description,
                        checked: surface.attribute(*attribute).unwrap_or(meta.default),
                    }
                })
                .collect()
        });

        let supported = profile.supports_custom_headers();
        // The engine cannot report the current header, so it starts unchecked.
        let do_not_track = DoNotTrack {
            checked: false,
            enabled: supported,
            tooltip: if supported { DNT_TOOLTIP } else { DNT_UNSUPPORTED_TOOLTIP },
        };

        Self { content, do_not_track }
    }

    pub fn has_content_settings(&self) -> bool {
        self.content.is_some()
    }

    pub fn checkboxes(&self) -> &[Checkbox] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub fn is_checked(&self, attribute: WebAttribute) -> Option<bool> {
        self.checkboxes()
            .iter()
            .find(|cb| cb.attribute == attribute)
            .map(|cb| cb.checked)
    }

    /// Edits the local copy. Returns false when content settings are disabled.
    pub fn set_checked(&mut self, attribute: WebAttribute, checked: bool) -> bool {
        let checkbox = self
            .content
            .as_mut()
            .and_then(|boxes| boxes.iter_mut().find(|cb| cb.attribute == attribute));
        match checkbox {
            Some(cb) => {
                cb.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn do_not_track(&self) -> &DoNotTrack {
        &self.do_not_track
    }

    /// Edits the Do-Not-Track checkbox. Ignored while the control is disabled.
    pub fn set_do_not_track(&mut self, checked: bool) -> bool {
        if !self.do_not_track.enabled {
            return false;
        }
        self.do_not_track.checked = checked;
        true
    }

    /// "Apply & Close": writes changed content settings and the DNT header.
    ///
    /// Returns the number of content settings that changed. The DNT header is
    /// set from the checkbox whenever supported and is not part of the count.
    pub fn apply<P: UserPrompt + ?Sized>(
        self,
        surface: Option<&mut dyn RenderingSurface>,
        profile: &mut dyn Profile,
        prompt: &mut P,
    ) -> usize {
        let mut applied = 0;
        if let (Some(boxes), Some(surface)) = (self.content.as_ref(), surface) {
            for cb in boxes {
                let live = surface
                    .attribute(cb.attribute)
                    .unwrap_or(cb.attribute.info().default);
                if live != cb.checked {
                    surface.set_attribute(cb.attribute, cb.checked);
                    applied += 1;
                }
            }
        }

        let mut header_note = String::new();
        if self.do_not_track.enabled {
            let value = if self.do_not_track.checked { "1" } else { "0" };
            match profile.set_http_header("DNT", value) {
                Ok(()) => {
                    info!("DNT header set to {} for profile '{}'", value, profile.name());
                    header_note = format!("\nDo Not Track header set to {}.", value);
                }
                Err(e) => {
                    warn!("could not set DNT header: {}", e);
                    prompt.warn("Settings Error", &format!("Could not set the DNT header: {}", e));
                }
            }
        }

        if applied > 0 {
            prompt.inform(
                "Settings Applied",
                &format!(
                    "{} setting(s) have been applied.\nSome content settings may require a page reload to take full effect.{}",
                    applied, header_note
                ),
            );
        } else {
            prompt.inform("Settings", &format!("No settings were changed.{}", header_note));
        }
        applied
    }

    /// Deletes every cookie after confirmation. Returns true when cleared.
    pub fn clear_cookies<P: UserPrompt + ?Sized>(&self, profile: &mut dyn Profile, prompt: &mut P) -> bool {
        if !prompt.ask(
            "Confirm Clear Cookies",
            "Are you sure you want to delete all cookies?",
            false,
        ) {
            return false;
        }
        match profile.clear_cookies() {
            Ok(()) => {
                info!("cleared cookies for profile '{}'", profile.name());
                prompt.inform("Cookies Cleared", "All cookies have been cleared.");
                true
            }
            Err(e) => report_failure(prompt, "cookies", &e.to_string()),
        }
    }

    /// Clears the HTTP cache after confirmation. Returns true when cleared.
    pub fn clear_cache<P: UserPrompt + ?Sized>(&self, profile: &mut dyn Profile, prompt: &mut P) -> bool {
        if !prompt.ask(
            "Confirm Clear Cache",
            "Are you sure you want to clear the HTTP cache?",
            false,
        ) {
            return false;
        }
        match profile.clear_http_cache() {
            Ok(()) => {
                info!("cleared HTTP cache for profile '{}'", profile.name());
                prompt.inform("Cache Cleared", "HTTP cache has been cleared.");
                true
            }
            Err(e) => report_failure(prompt, "HTTP cache", &e.to_string()),
        }
    }

    /// Clears visited links, cache and cookies after one confirmation.
    ///
    /// Stops at the first failing step; earlier steps stay cleared.
    pub fn clear_all_data<P: UserPrompt + ?Sized>(&self, profile: &mut dyn Profile, prompt: &mut P) -> bool {
        if !prompt.ask(
            "Confirm Clear All Browsing Data",
            "This will clear cookies, HTTP cache, and visited links history. This action cannot be undone. Are you sure?",
            false,
        ) {
            return false;
        }
        let outcome = profile
            .clear_visited_links()
            .map_err(|e| ("visited links", e))
            .and_then(|_| profile.clear_http_cache().map_err(|e| ("HTTP cache", e)))
            .and_then(|_| profile.clear_cookies().map_err(|e| ("cookies", e)));
        if let Err((scope, e)) = outcome {
            return report_failure(prompt, scope, &e.to_string());
        }
        info!("cleared all browsing data for profile '{}'", profile.name());
        prompt.inform(
            "Browsing Data Cleared",
            "Cookies, HTTP cache, and visited links history have been cleared.",
        );
        true
    }

    /// Runs the dialog modally until the host applies or closes it.
    ///
    /// Returns `Confirmed(count)` on "Apply & Close" and `Cancelled` on "Close".
    pub fn exec<H: DialogHost + ?Sized>(
        mut surface: Option<&mut dyn RenderingSurface>,
        profile: &mut dyn Profile,
        host: &mut H,
    ) -> DialogOutcome<usize> {
        let mut dialog = Self::open(surface.as_deref(), &*profile);
        loop {
            match host.next_security_command(&dialog) {
                SecurityCommand::Toggle(attribute, checked) => {
                    dialog.set_checked(attribute, checked);
                }
                SecurityCommand::SetDoNotTrack(checked) => {
                    dialog.set_do_not_track(checked);
                }
                SecurityCommand::ClearCookies => {
                    dialog.clear_cookies(profile, host);
                }
                SecurityCommand::ClearCache => {
                    dialog.clear_cache(profile, host);
                }
                SecurityCommand::ClearAllData => {
                    dialog.clear_all_data(profile, host);
                }
                SecurityCommand::Apply => {
                    let applied = dialog.apply(surface.take(), profile, host);
                    return DialogOutcome::Confirmed(applied);
                }
                SecurityCommand::Close => return DialogOutcome::Cancelled,
            }
        }
    }
}

fn report_failure<P: UserPrompt + ?Sized>(prompt: &mut P, scope: &str, reason: &str) -> bool {
    warn!("clearing {} failed: {}", scope, reason);
    prompt.warn(
        "Clear Failed",
        &format!("Could not clear {}: {}", scope, reason),
    );
    false
}
