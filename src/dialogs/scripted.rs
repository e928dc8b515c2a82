//! A dialog host that replays queued answers.
//!
//! Drives the headless demo and the tests. Every prompt shown is recorded;
//! questions without a queued answer take their default, an exhausted
//! security script closes the dialog, and an exhausted preferences script
//! cancels.

use std::collections::VecDeque;

use crate::dialogs::preferences::PreferencesForm;
use crate::dialogs::security::{SecurityCommand, SecurityDialog};
use crate::dialogs::{DialogHost, UserPrompt};
use crate::types::dialog::DialogOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Ask,
    Inform,
    Warn,
}

/// A message box the host was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub kind: PromptKind,
    pub title: String,
    pub message: String,
    /// The answer given, for questions.
    pub answer: Option<bool>,
}

#[derive(Debug, Default)]
pub struct ScriptedHost {
    answers: VecDeque<bool>,
    preferences: VecDeque<DialogOutcome<String>>,
    security: VecDeque<SecurityCommand>,
    prompts: Vec<PromptRecord>,
    security_views: usize,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, yes: bool) -> Self {
        self.answers.push_back(yes);
        self
    }

    pub fn preferences(mut self, outcome: DialogOutcome<String>) -> Self {
        self.preferences.push_back(outcome);
        self
    }

    pub fn security(mut self, command: SecurityCommand) -> Self {
        self.security.push_back(command);
        self
    }

    pub fn prompts(&self) -> &[PromptRecord] {
        &self.prompts
    }

    pub fn last_prompt(&self) -> Option<&PromptRecord> {
        self.prompts.last()
    }

    /// How many times the security dialog asked for a command.
    pub fn security_views(&self) -> usize {
        self.security_views
    }

    fn record(&mut self, kind: PromptKind, title: &str, message: &str, answer: Option<bool>) {
        self.prompts.push(PromptRecord {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            answer,
        });
    }
}

impl UserPrompt for ScriptedHost {
    fn ask(&mut self, title: &str, message: &str, default_yes: bool) -> bool {
        let answer = self.answers.pop_front().unwrap_or(default_yes);
        self.record(PromptKind::Ask, title, message, Some(answer));
        answer
    }

    fn inform(&mut self, title: &str, message: &str) {
        self.record(PromptKind::Inform, title, message, None);
    }

    fn warn(&mut self, title: &str, message: &str) {
        self.record(PromptKind::Warn, title, message, None);
    }
}

impl DialogHost for ScriptedHost {
    fn run_preferences(&mut self, _form: &PreferencesForm) -> DialogOutcome<String> {
        self.preferences.pop_front().unwrap_or(DialogOutcome::Cancelled)
    }

    fn next_security_command(&mut self, _dialog: &SecurityDialog) -> SecurityCommand {
        self.security_views += 1;
        self.security.pop_front().unwrap_or(SecurityCommand::Close)
    }
}
