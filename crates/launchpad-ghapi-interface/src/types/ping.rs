use serde::{Deserialize, Serialize};

/// GitHub Ping event.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct GhPingEvent {
    /// Zen text.
    pub zen: String,
    /// Hook ID.
    pub hook_id: u64,
}
