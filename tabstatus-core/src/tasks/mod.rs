// src/tasks/mod.rs

pub mod display_refresh;

pub use display_refresh::{spawn_display_refresh_task, start_display_refresh, DEFAULT_REFRESH_INTERVAL};
