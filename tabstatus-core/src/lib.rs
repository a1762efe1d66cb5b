// src/lib.rs

pub mod config;
pub mod formatting;
pub mod groups;
pub mod repositories;
pub mod store;
pub mod auth;
pub mod presence;
pub mod services;
pub mod tasks;
pub mod utils;
pub mod test_utils;

pub use tabstatus_common::error::Error;
pub use config::ConfigManager;
pub use formatting::FormattingEngine;
pub use groups::GroupRegistry;
pub use services::StatusManager;
pub use store::StatusStore;
