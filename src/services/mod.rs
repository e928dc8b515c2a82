// Tabshell services
// Stateless text policy, toolbar icons and persisted settings.

pub mod display;
pub mod icon_provider;
pub mod settings_engine;
