//! Tabshell: a tabbed web-browser shell around an embedded rendering engine.
//!
//! The library holds the tab session controller, its page policy, the
//! preferences and security dialogs, and an in-process engine for headless
//! use. The `gui` feature adds the wry/tao front-end.

pub mod app;
pub mod dialogs;
pub mod engine;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
