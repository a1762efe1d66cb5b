// src/store/mod.rs

pub mod status_store;

pub use status_store::{StatusStore, WriteOutcome};
