// Tabshell shared type definitions
// Each submodule defines types used across the application.

pub mod chrome;
pub mod content;
pub mod dialog;
pub mod errors;
pub mod permission;
pub mod settings;
pub mod tab;
