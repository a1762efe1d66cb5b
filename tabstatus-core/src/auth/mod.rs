// src/auth/mod.rs

pub mod capability_provider;

pub use capability_provider::{MemoryCapabilityProvider, WILDCARD};
pub use tabstatus_common::traits::auth_traits::CapabilityProvider;
