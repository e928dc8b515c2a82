//! Native message boxes and the overlay dialog host.

use std::collections::VecDeque;
use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::dialogs::preferences::PreferencesForm;
use crate::dialogs::security::{SecurityCommand, SecurityDialog};
use crate::dialogs::{DialogHost, UserPrompt};
use crate::types::dialog::DialogOutcome;

/// Blocking `rfd` message boxes parented to nothing in particular.
///
/// rfd has no default-button option, so `default_yes` only decides what a
/// dismissed box (Escape, window close) counts as.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdPrompt;

impl UserPrompt for RfdPrompt {
    fn ask(&mut self, title: &str, message: &str, default_yes: bool) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_buttons(MessageButtons::YesNo)
            .set_title(title)
            .set_description(message)
            .show();
        match result {
            MessageDialogResult::Yes => true,
            MessageDialogResult::No => false,
            _ => default_yes,
        }
    }

    fn inform(&mut self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_buttons(MessageButtons::Ok)
            .set_title(title)
            .set_description(message)
            .show();
    }

    fn warn(&mut self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_buttons(MessageButtons::Ok)
            .set_title(title)
            .set_description(message)
            .show();
    }
}

/// Asks where to save a download, starting from `suggested`. `None` when the
/// user cancels.
pub fn choose_download_path(suggested: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save File")
        .set_file_name(suggested)
        .save_file()
}

/// Resolves a modal dialog from what the HTML overlay already collected.
///
/// The overlay sends the whole interaction at once (the submitted form, or
/// the security commands queued since the last round trip); an exhausted
/// queue closes the security dialog.
#[derive(Debug, Default)]
pub struct OverlayHost {
    prompt: RfdPrompt,
    preferences: Option<DialogOutcome<String>>,
    security: VecDeque<SecurityCommand>,
}

impl OverlayHost {
    pub fn preferences(outcome: DialogOutcome<String>) -> Self {
        Self { preferences: Some(outcome), ..Self::default() }
    }

    pub fn security(commands: Vec<SecurityCommand>) -> Self {
        Self { security: commands.into(), ..Self::default() }
    }
}

impl UserPrompt for OverlayHost {
    fn ask(&mut self, title: &str, message: &str, default_yes: bool) -> bool {
        self.prompt.ask(title, message, default_yes)
    }

    fn inform(&mut self, title: &str, message: &str) {
        self.prompt.inform(title, message)
    }

    fn warn(&mut self, title: &str, message: &str) {
        self.prompt.warn(title, message)
    }
}

impl DialogHost for OverlayHost {
    fn run_preferences(&mut self, _form: &PreferencesForm) -> DialogOutcome<String> {
        self.preferences.take().unwrap_or(DialogOutcome::Cancelled)
    }

    fn next_security_command(&mut self, _dialog: &SecurityDialog) -> SecurityCommand {
        self.security.pop_front().unwrap_or(SecurityCommand::Close)
    }
}
