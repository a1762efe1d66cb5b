//! Capability names and the small lookup abstraction the formatting and
//! group code check against.

use std::collections::HashSet;
use crate::models::principal::PrincipalId;
use crate::traits::auth_traits::CapabilityProvider;

pub const FORMAT_BOLD: &str = "tabstatus.formatting.bold";
pub const FORMAT_MAGIC: &str = "tabstatus.formatting.magic";
pub const FORMAT_UNDERLINE: &str = "tabstatus.formatting.underline";
pub const FORMAT_STRIKETHROUGH: &str = "tabstatus.formatting.strikethrough";
pub const FORMAT_ITALIC: &str = "tabstatus.formatting.italic";
pub const FORMAT_COLOR: &str = "tabstatus.formatting.color";

/// Set (and remove) one's own status.
pub const SET_OWN: &str = "tabstatus.set";
/// Set or remove anyone's status; also overrides group requirements and group mode.
pub const ADMIN_SET: &str = "tabstatus.admin.set";
pub const ADMIN_RELOAD: &str = "tabstatus.admin.reload";
pub const ADMIN_MAX_LENGTH: &str = "tabstatus.admin.maxlength";
/// Pick any group that has no capability list of its own.
pub const GROUP_SET: &str = "tabstatus.group.set";
/// Placeholders inside the status are expanded for this participant.
pub const PLACEHOLDERS: &str = "tabstatus.placeholders";

/// Read-only view of what one principal may do.
pub trait Capabilities {
    fn has(&self, capability: &str) -> bool;

    fn has_any(&self, capabilities: &[String]) -> bool {
        capabilities.iter().any(|c| self.has(c))
    }
}

/// A fixed set of capabilities, handy for callers that already resolved them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: HashSet<String>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: &str) -> Self {
        self.granted.insert(capability.to_string());
        self
    }

    pub fn grant(&mut self, capability: &str) {
        self.granted.insert(capability.to_string());
    }

    pub fn revoke(&mut self, capability: &str) -> bool {
        self.granted.remove(capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.granted.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

impl Capabilities for CapabilitySet {
    fn has(&self, capability: &str) -> bool {
        self.granted.contains(capability)
    }
}

/// Capabilities of one principal answered live by a provider.
pub struct ScopedCapabilities<'a> {
    provider: &'a dyn CapabilityProvider,
    principal: &'a PrincipalId,
}

impl<'a> ScopedCapabilities<'a> {
    pub fn new(provider: &'a dyn CapabilityProvider, principal: &'a PrincipalId) -> Self {
        Self { provider, principal }
    }
}

impl Capabilities for ScopedCapabilities<'_> {
    fn has(&self, capability: &str) -> bool {
        self.provider.has_capability(self.principal, capability)
    }
}
