//! src/presence/roster.rs
//!
//! In-process list of connected participants. Display names applied to
//! them are recorded so they can be printed (console) or inspected (tests).

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};
use tabstatus_common::models::{DisplayName, Participant, PrincipalId};
use tabstatus_common::traits::presence_traits::Presence;

#[derive(Debug, Default)]
pub struct Roster {
    /// Keyed by lowercase name.
    online: DashMap<String, Participant>,
    applied: DashMap<PrincipalId, DisplayName>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant. Returns `false` if that name was already online.
    pub fn join(&self, participant: Participant) -> bool {
        match self.online.entry(participant.name.to_lowercase()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                info!("{} joined.", participant.name);
                slot.insert(participant);
                true
            }
        }
    }

    pub fn leave(&self, name: &str) -> Option<Participant> {
        let (_, participant) = self.online.remove(&name.to_lowercase())?;
        self.applied.remove(&participant.id);
        info!("{} left.", participant.name);
        Some(participant)
    }

    /// Last display name applied to `principal` while online.
    pub fn display_name_of(&self, principal: &PrincipalId) -> Option<DisplayName> {
        self.applied.get(principal).map(|d| d.clone())
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }
}

impl Presence for Roster {
    fn online_participants(&self) -> Vec<Participant> {
        let mut list: Vec<Participant> = self.online.iter().map(|p| p.value().clone()).collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        list
    }

    fn find_online(&self, name: &str) -> Option<Participant> {
        self.online.get(&name.to_lowercase()).map(|p| p.value().clone())
    }

    fn apply_display_name(&self, participant: &Participant, shown: &DisplayName) {
        if !self.online.contains_key(&participant.name.to_lowercase()) {
            debug!("{} is offline; display name not applied.", participant.name);
            return;
        }
        debug!("{} is now shown as '{}'", participant.name, shown.list_label);
        self.applied.insert(participant.id, shown.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_find_leave() {
        let roster = Roster::new();
        assert!(roster.join(Participant::named("Steve")));
        assert!(!roster.join(Participant::named("steve")));
        assert_eq!(roster.find_online("STEVE").map(|p| p.name), Some("Steve".to_string()));

        let steve = Participant::named("Steve");
        roster.apply_display_name(&steve, &DisplayName::bare("Steve"));
        assert!(roster.display_name_of(&steve.id).is_some());

        assert!(roster.leave("steve").is_some());
        assert!(roster.find_online("Steve").is_none());
        assert!(roster.display_name_of(&steve.id).is_none());
        assert!(roster.is_empty());
    }

    #[test]
    fn test_online_participants_sorted_by_name() {
        let roster = Roster::new();
        roster.join(Participant::named("zed"));
        roster.join(Participant::named("Alex"));
        let names: Vec<String> = roster.online_participants().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alex", "zed"]);
    }
}
