//! Supported webhook event types.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Event name with no handler.
#[derive(Debug, Error)]
#[error("Unsupported event: {0}")]
pub struct UnsupportedEvent(String);

/// Webhook event the server knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Installation,
    InstallationRepositories,
    Ping,
    PullRequest,
}

const EVENT_NAMES: [(EventType, &str); 4] = [
    (EventType::Installation, "installation"),
    (EventType::InstallationRepositories, "installation_repositories"),
    (EventType::Ping, "ping"),
    (EventType::PullRequest, "pull_request"),
];

impl EventType {
    /// Name as sent in `X-GitHub-Event`.
    pub fn to_str(self) -> &'static str {
        EVENT_NAMES
            .iter()
            .find_map(|(event, name)| (*event == self).then_some(*name))
            .unwrap_or_default()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for EventType {
    type Err = UnsupportedEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EVENT_NAMES
            .iter()
            .find_map(|(event, name)| (*name == s).then_some(*event))
            .ok_or_else(|| UnsupportedEvent(s.to_owned()))
    }
}
