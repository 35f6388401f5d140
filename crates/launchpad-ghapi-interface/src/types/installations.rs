use serde::{Deserialize, Serialize};

use super::{GhRepositoryShort, GhUser};

/// GitHub App installation.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhInstallation {
    /// ID.
    pub id: u64,
    /// Account the App is installed on.
    pub account: GhUser,
}

/// GitHub Installation action.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GhInstallationAction {
    Created,
    Deleted,
    #[default]
    #[serde(other)]
    Other,
}

/// GitHub Installation event.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct GhInstallationEvent {
    /// Action.
    pub action: GhInstallationAction,
    /// Installation.
    pub installation: GhInstallation,
}

/// GitHub Installation repositories action.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GhInstallationRepositoriesAction {
    Added,
    Removed,
    #[default]
    #[serde(other)]
    Other,
}

/// GitHub Installation repositories event.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct GhInstallationRepositoriesEvent {
    /// Action.
    pub action: GhInstallationRepositoriesAction,
    /// Installation.
    pub installation: GhInstallation,
    /// Added repositories.
    #[serde(default)]
    pub repositories_added: Vec<GhRepositoryShort>,
}
