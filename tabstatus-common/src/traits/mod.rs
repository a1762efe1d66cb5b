pub mod auth_traits;
pub mod repository_traits;
pub mod presence_traits;

pub use auth_traits::CapabilityProvider;
pub use repository_traits::StatusRepository;
pub use presence_traits::{PlaceholderExpander, Presence};
