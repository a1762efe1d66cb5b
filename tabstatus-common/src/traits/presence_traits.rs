use crate::models::display::DisplayName;
use crate::models::principal::Participant;

/// The presentation layer: who is connected, and where composed names go.
pub trait Presence: Send + Sync {
    fn online_participants(&self) -> Vec<Participant>;

    /// Case-insensitive lookup of a connected participant.
    fn find_online(&self, name: &str) -> Option<Participant>;

    fn apply_display_name(&self, participant: &Participant, display: &DisplayName);
}

/// Resolves `%...%` tokens that survive rendering (e.g. rank prefixes).
pub trait PlaceholderExpander: Send + Sync {
    fn expand(&self, participant: &Participant, text: &str) -> String;
}
