//! src/auth/capability_provider.rs

use std::collections::BTreeSet;
use dashmap::DashMap;
use tracing::debug;
use tabstatus_common::models::PrincipalId;
use tabstatus_common::traits::auth_traits::CapabilityProvider;

/// Grant that implies every capability.
pub const WILDCARD: &str = "*";

/// Capability table held in memory, for hosts without their own permission
/// backend (and the console server).
#[derive(Debug, Default)]
pub struct MemoryCapabilityProvider {
    grants: DashMap<PrincipalId, BTreeSet<String>>,
}

impl MemoryCapabilityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, principal: PrincipalId, capability: &str) {
        self.grants
            .entry(principal)
            .or_default()
            .insert(capability.to_string());
        debug!("Granted '{}' to {}", capability, principal);
    }

    pub fn grant_all<I, S>(&self, principal: PrincipalId, capabilities: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for cap in capabilities {
            self.grant(principal, cap.as_ref());
        }
    }

    /// Returns whether the grant existed.
    pub fn revoke(&self, principal: &PrincipalId, capability: &str) -> bool {
        let removed = self
            .grants
            .get_mut(principal)
            .map(|mut caps| caps.remove(capability))
            .unwrap_or(false);
        if removed {
            debug!("Revoked '{}' from {}", capability, principal);
        }
        removed
    }

    pub fn capabilities_of(&self, principal: &PrincipalId) -> Vec<String> {
        self.grants
            .get(principal)
            .map(|caps| caps.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl CapabilityProvider for MemoryCapabilityProvider {
    fn has_capability(&self, principal: &PrincipalId, capability: &str) -> bool {
        self.grants
            .get(principal)
            .map(|caps| caps.contains(capability) || caps.contains(WILDCARD))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstatus_common::capabilities::{ADMIN_SET, FORMAT_COLOR, SET_OWN};

    #[test]
    fn test_grant_and_revoke() {
        let provider = MemoryCapabilityProvider::new();
        let id = PrincipalId::new_random();
        provider.grant_all(id, [SET_OWN, FORMAT_COLOR]);

        assert!(provider.has_capability(&id, SET_OWN));
        assert!(!provider.has_capability(&id, ADMIN_SET));
        assert!(!provider.has_capability(&PrincipalId::new_random(), SET_OWN));

        assert!(provider.revoke(&id, SET_OWN));
        assert!(!provider.revoke(&id, SET_OWN));
        assert_eq!(provider.capabilities_of(&id), vec![FORMAT_COLOR.to_string()]);
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let provider = MemoryCapabilityProvider::new();
        provider.grant(PrincipalId::CONSOLE, WILDCARD);
        assert!(provider.has_capability(&PrincipalId::CONSOLE, ADMIN_SET));
        assert!(provider.has_capability(&PrincipalId::CONSOLE, "group.anything"));
    }
}
