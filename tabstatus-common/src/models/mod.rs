// File: tabstatus-common/src/models/mod.rs
pub mod principal;
pub mod status;
pub mod group;
pub mod config;
pub mod display;

pub use principal::{Participant, PrincipalId};
pub use status::PlayerStatus;
pub use group::GroupDefinition;
pub use config::{GroupEntry, StatusConfig};
pub use display::DisplayName;
