use serde::{Deserialize, Serialize};

use super::{GhRepository, GhUser};

/// GitHub Pull request action.
///
/// Only actions affecting deployability are named.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GhPullRequestAction {
    Opened,
    Reopened,
    ReadyForReview,
    Synchronize,
    Edited,
    Closed,
    ConvertedToDraft,
    #[default]
    #[serde(other)]
    Other,
}

/// GitHub Pull request state.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GhPullRequestState {
    #[default]
    Open,
    Closed,
}

/// GitHub Branch.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhBranch {
    /// Reference.
    #[serde(rename = "ref")]
    pub reference: String,
    /// SHA.
    pub sha: String,
}

/// GitHub Pull request.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhPullRequest {
    /// ID.
    pub id: u64,
    /// Number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Web URL.
    pub html_url: String,
    /// State.
    pub state: GhPullRequestState,
    /// Draft.
    #[serde(default)]
    pub draft: bool,
    /// Author.
    pub user: GhUser,
    /// Head branch.
    pub head: GhBranch,
    /// Base branch.
    pub base: GhBranch,
}

/// Installation reference carried by App webhooks.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhInstallationRef {
    pub id: u64,
}

/// GitHub Pull request event.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhPullRequestEvent {
    /// Action.
    pub action: GhPullRequestAction,
    /// Number.
    pub number: u64,
    /// Pull request.
    pub pull_request: GhPullRequest,
    /// Repository.
    pub repository: GhRepository,
    /// Installation.
    pub installation: Option<GhInstallationRef>,
}
