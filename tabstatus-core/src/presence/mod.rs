// src/presence/mod.rs

pub mod roster;

pub use roster::Roster;
pub use tabstatus_common::traits::presence_traits::{PlaceholderExpander, Presence};
