//! Ledger and deployment engine.

#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

mod context;
pub mod errors;
pub mod observers;
pub mod use_cases;

pub use context::CoreContext;
pub use errors::{DomainError, Result};
use shaku::module;
use use_cases::{
    components::{
        process_installation_event::{
            ProcessInstallationEvent, ProcessInstallationRepositoriesEvent,
        },
        provision_deployable_components::ProvisionDeployableComponents,
    },
    deployments::{
        enqueue_deployment::EnqueueDeployment, transition_deployment::TransitionDeployment,
    },
    pulls::{
        disqualify_pull_request::DisqualifyPullRequest, judge_pull_request::JudgePullRequest,
        judge_pull_requests::JudgePullRequests,
        process_pull_request_event::ProcessPullRequestEvent,
        register_or_update_pull_request::RegisterOrUpdatePullRequest,
    },
};

module! {
    pub CoreModule {
        components = [
            DisqualifyPullRequest, JudgePullRequest, JudgePullRequests,
            ProcessPullRequestEvent, RegisterOrUpdatePullRequest,
            EnqueueDeployment, TransitionDeployment,
            ProvisionDeployableComponents, ProcessInstallationEvent,
            ProcessInstallationRepositoriesEvent
        ],
        providers = []
    }
}
