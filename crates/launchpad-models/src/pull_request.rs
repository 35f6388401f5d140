use std::fmt::Display;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use crate::{PullRequestDescriptor, RepositoryPath};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestAuthor {
    pub handle: String,
    pub url: String,
}

/// Ledger entry for a pull request eligible for deployment.
///
/// A record exists only while the pull request is open, not a draft, and
/// targets a deployable branch of its component. `enqueued` is set while a
/// non-terminal deployment references it.
#[derive(Debug, Clone, SmartDefault, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// Code host pull request id.
    pub id: u64,
    pub component_id: u64,
    pub number: u64,
    pub title: String,
    pub head_commit: String,
    pub target_branch: String,
    pub url: String,
    pub author: PullRequestAuthor,
    pub repo: RepositoryPath,
    pub enqueued: bool,
    #[default(OffsetDateTime::now_utc())]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::now_utc())]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PullRequestRecord {
    pub fn descriptor(&self) -> PullRequestDescriptor {
        PullRequestDescriptor::new(self.repo.clone(), self.number)
    }
}

/// Deployability verdict.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    Ready,
    NotReady,
    /// The code host could not be queried.
    FetchError,
}

impl PullRequestState {
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::NotReady => "NOT_READY",
            Self::FetchError => "FETCH_ERROR",
        }
    }

    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

impl Display for PullRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A ledger record with its freshly computed verdict. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(flatten)]
    pub record: PullRequestRecord,
    pub state: PullRequestState,
}
