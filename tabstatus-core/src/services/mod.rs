// File: src/services/mod.rs

pub mod status_service;
pub mod display_name;
pub mod chat_formatter;
pub mod placeholder_service;

pub use status_service::StatusManager;
pub use display_name::DisplayNameComposer;
pub use chat_formatter::ChatFormatter;
pub use placeholder_service::StatusPlaceholders;
