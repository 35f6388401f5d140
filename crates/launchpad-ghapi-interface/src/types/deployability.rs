use serde::{Deserialize, Serialize};

/// Mergeability computed by GitHub.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GhMergeableState {
    Mergeable,
    Conflicting,
    #[default]
    Unknown,
}

/// Check run conclusion.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GhCheckConclusion {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Skipped,
    Stale,
    StartupFailure,
    Success,
    TimedOut,
}

/// Required status checks of the base branch.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhBranchProtection {
    pub requires_status_checks: bool,
    pub required_contexts: Vec<String>,
}

/// Check run on the last commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GhCheckRunSummary {
    pub name: String,
    /// `None` while running.
    pub conclusion: Option<GhCheckConclusion>,
}

/// Everything needed to judge a pull request.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhDeployabilityReport {
    pub closed: bool,
    pub is_draft: bool,
    pub mergeable: GhMergeableState,
    pub branch_protection: Option<GhBranchProtection>,
    pub check_runs: Vec<GhCheckRunSummary>,
}
