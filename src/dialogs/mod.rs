//! Modal dialogs and the prompt seam they talk to the user through.
//!
//! A dialog is run synchronously: `exec` blocks the caller until the host
//! resolves it and returns a [`DialogOutcome`]. Hosts are front-end specific
//! (native message boxes, an HTML overlay, or a script in tests).

pub mod preferences;
pub mod scripted;
pub mod security;

use crate::types::dialog::DialogOutcome;

use self::preferences::PreferencesForm;
use self::security::{SecurityCommand, SecurityDialog};

/// Blocking message boxes.
pub trait UserPrompt {
    /// Yes/no question. `default_yes` is the answer a bare Enter picks.
    fn ask(&mut self, title: &str, message: &str, default_yes: bool) -> bool;
    fn inform(&mut self, title: &str, message: &str);
    fn warn(&mut self, title: &str, message: &str);
}

/// A front-end able to present the shell's dialogs.
pub trait DialogHost: UserPrompt {
    /// Shows the preferences form and returns the edited home page text.
    fn run_preferences(&mut self, form: &PreferencesForm) -> DialogOutcome<String>;
    /// Waits for the next user action inside the security dialog.
    fn next_security_command(&mut self, dialog: &SecurityDialog) -> SecurityCommand;
}
