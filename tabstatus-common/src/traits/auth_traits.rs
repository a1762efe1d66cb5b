use crate::models::principal::PrincipalId;

/// Answers "does this principal hold this capability". Implemented by the
/// host's permission backend; everything in the core asks through this.
pub trait CapabilityProvider: Send + Sync {
    fn has_capability(&self, principal: &PrincipalId, capability: &str) -> bool;
}
