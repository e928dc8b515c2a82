//! Preferences dialog: edits the home page.

use log::debug;

use crate::dialogs::DialogHost;
use crate::types::dialog::DialogOutcome;

pub const PREFERENCES_TITLE: &str = "Preferences";
pub const HOME_PAGE_LABEL: &str = "Home Page URL:";
pub const HOME_PAGE_PLACEHOLDER: &str = "Enter URL (e.g., https://www.example.com)";

/// What the preferences form shows when it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesForm {
    pub title: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub home_page: String,
}

impl PreferencesForm {
    pub fn new(current_home_page: &str) -> Self {
        Self {
            title: PREFERENCES_TITLE,
            label: HOME_PAGE_LABEL,
            placeholder: HOME_PAGE_PLACEHOLDER,
            home_page: current_home_page.to_string(),
        }
    }
}

/// Opens the preferences dialog and returns the trimmed home page on confirm.
///
/// Validation and scheme normalization are left to the caller.
pub fn exec<H: DialogHost + ?Sized>(current_home_page: &str, host: &mut H) -> DialogOutcome<String> {
    let form = PreferencesForm::new(current_home_page);
    match host.run_preferences(&form) {
        DialogOutcome::Confirmed(text) => DialogOutcome::Confirmed(text.trim().to_string()),
        DialogOutcome::Cancelled => {
            debug!("preferences dialog cancelled");
            DialogOutcome::Cancelled
        }
    }
}
