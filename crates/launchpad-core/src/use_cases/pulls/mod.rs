pub(crate) mod disqualify_pull_request;
pub(crate) mod judge_pull_request;
pub(crate) mod judge_pull_requests;
pub(crate) mod process_pull_request_event;
pub(crate) mod register_or_update_pull_request;

pub use disqualify_pull_request::DisqualifyPullRequestInterface;
pub use judge_pull_request::{determine_deployability, JudgePullRequestInterface};
pub use judge_pull_requests::JudgePullRequestsInterface;
pub use process_pull_request_event::ProcessPullRequestEventInterface;
pub use register_or_update_pull_request::RegisterOrUpdatePullRequestInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    disqualify_pull_request::MockDisqualifyPullRequestInterface,
    judge_pull_request::MockJudgePullRequestInterface,
    judge_pull_requests::MockJudgePullRequestsInterface,
    process_pull_request_event::MockProcessPullRequestEventInterface,
    register_or_update_pull_request::MockRegisterOrUpdatePullRequestInterface,
};
