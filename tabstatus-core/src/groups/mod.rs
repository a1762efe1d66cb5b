//! src/groups/mod.rs
//!
//! Named, permission-gated statuses used in group mode.

use std::collections::BTreeMap;
use tracing::{debug, warn};
use tabstatus_common::capabilities::{Capabilities, ADMIN_SET, GROUP_SET};
use tabstatus_common::models::{GroupDefinition, GroupEntry, PrincipalId};

/// Group name → definition. Names match exactly (case-sensitive).
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<String, GroupDefinition>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from the `statusGroups` config table. Entries
    /// without a status are skipped.
    pub fn from_config(table: &BTreeMap<String, GroupEntry>) -> Self {
        let mut registry = Self::new();
        for (name, entry) in table {
            if entry.status.is_empty() {
                warn!("Status group '{}' has no status configured; skipping it.", name);
                continue;
            }
            debug!(
                "Loaded group '{}' with status '{}' and permissions {:?}",
                name, entry.status, entry.permissions
            );
            registry.insert(GroupDefinition::new(
                name.clone(),
                entry.status.clone(),
                entry.permissions.clone(),
            ));
        }
        registry
    }

    pub fn insert(&mut self, group: GroupDefinition) -> Option<GroupDefinition> {
        self.groups.insert(group.name.clone(), group)
    }

    pub fn resolve(&self, name: &str) -> Option<&GroupDefinition> {
        self.groups.get(name)
    }

    /// A group with its own capability list needs any one of them; an open
    /// group needs the generic group capability. The admin override always
    /// passes.
    pub fn authorize<C: Capabilities + ?Sized>(
        &self,
        principal: &PrincipalId,
        group: &GroupDefinition,
        caps: &C,
    ) -> bool {
        if group.is_open() {
            if caps.has(GROUP_SET) {
                debug!("{} has the general group permission for group {}", principal, group.name);
                return true;
            }
        } else if caps.has_any(&group.required_capabilities) {
            debug!("{} has a specific permission for group {}", principal, group.name);
            return true;
        }

        if caps.has(ADMIN_SET) {
            debug!("{} uses the admin override for group {}", principal, group.name);
            return true;
        }

        debug!("{} lacks permission to use group {}", principal, group.name);
        false
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstatus_common::capabilities::CapabilitySet;

    fn registry() -> GroupRegistry {
        let mut table = BTreeMap::new();
        table.insert("vip".to_string(), GroupEntry { status: "&6VIP".into(), permissions: vec![] });
        table.insert(
            "staff".to_string(),
            GroupEntry {
                status: "&cStaff".into(),
                permissions: vec!["group.staff".into(), "group.mod".into()],
            },
        );
        table.insert("broken".to_string(), GroupEntry::default());
        GroupRegistry::from_config(&table)
    }

    #[test]
    fn test_resolve_is_exact() {
        let reg = registry();
        assert_eq!(reg.resolve("vip").map(|g| g.canonical_status.as_str()), Some("&6VIP"));
        assert!(reg.resolve("VIP").is_none());
        assert!(reg.resolve("broken").is_none());
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["staff", "vip"]);
    }

    #[test]
    fn test_open_group_needs_group_capability() {
        let reg = registry();
        let id = PrincipalId::new_random();
        let vip = reg.resolve("vip").unwrap();
        assert!(reg.authorize(&id, vip, &CapabilitySet::new().with(GROUP_SET)));
        assert!(reg.authorize(&id, vip, &CapabilitySet::new().with(ADMIN_SET)));
        assert!(!reg.authorize(&id, vip, &CapabilitySet::new()));
    }

    #[test]
    fn test_restricted_group_needs_any_listed_capability() {
        let reg = registry();
        let id = PrincipalId::new_random();
        let staff = reg.resolve("staff").unwrap();
        assert!(reg.authorize(&id, staff, &CapabilitySet::new().with("group.mod")));
        assert!(reg.authorize(&id, staff, &CapabilitySet::new().with(ADMIN_SET)));
        // the generic capability does not open a restricted group
        assert!(!reg.authorize(&id, staff, &CapabilitySet::new().with(GROUP_SET)));
    }
}
