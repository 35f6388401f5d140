mod common;
mod deployability;
mod installations;
mod ping;
mod pulls;

pub use common::{GhRepository, GhRepositoryShort, GhUser};
pub use deployability::{
    GhBranchProtection, GhCheckConclusion, GhCheckRunSummary, GhDeployabilityReport,
    GhMergeableState,
};
pub use installations::{
    GhInstallation, GhInstallationAction, GhInstallationEvent, GhInstallationRepositoriesAction,
    GhInstallationRepositoriesEvent,
};
pub use ping::GhPingEvent;
pub use pulls::{
    GhBranch, GhInstallationRef, GhPullRequest, GhPullRequestAction, GhPullRequestEvent,
    GhPullRequestState,
};
