use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Error;

/// Stable identifier of anyone who can hold or change a status.
///
/// The canonical string form (used as the key of the persisted status
/// document) is the hyphenated UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// The non-interactive console actor.
    pub const CONSOLE: PrincipalId = PrincipalId(Uuid::nil());

    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a stable id from a participant name, so the same name maps to
    /// the same stored status across restarts.
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.to_lowercase().as_bytes()))
    }

    pub fn is_console(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PrincipalId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PrincipalId(Uuid::parse_str(s.trim())?))
    }
}

impl From<Uuid> for PrincipalId {
    fn from(id: Uuid) -> Self {
        PrincipalId(id)
    }
}

/// A connected participant: the id keys the store, the name is what gets
/// shown next to the status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    pub id: PrincipalId,
    pub name: String,
}

impl Participant {
    pub fn new(id: PrincipalId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: PrincipalId::from_name(&name),
            name,
        }
    }

    pub fn console() -> Self {
        Self::new(PrincipalId::CONSOLE, "CONSOLE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_id_string_round_trip() {
        let id = PrincipalId::new_random();
        let parsed: PrincipalId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_from_name_is_stable_and_case_insensitive() {
        assert_eq!(PrincipalId::from_name("Steve"), PrincipalId::from_name("steve"));
        assert_ne!(PrincipalId::from_name("Steve"), PrincipalId::from_name("Alex"));
    }

    #[test]
    fn test_invalid_principal_id_is_rejected() {
        let res = "not-a-uuid".parse::<PrincipalId>();
        assert!(matches!(res, Err(Error::Uuid(_))));
    }

    #[test]
    fn test_console_is_nil() {
        assert!(Participant::console().id.is_console());
        assert!(!Participant::named("Steve").id.is_console());
    }
}
