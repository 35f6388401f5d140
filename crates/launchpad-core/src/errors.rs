//! Domain errors.

use launchpad_ghapi_interface::ApiError;
use launchpad_ledger_interface::LedgerError;
use launchpad_models::{
    DeploymentAction, DeploymentState, DeploymentTarget, PullRequestDescriptor, PullRequestState,
};
use thiserror::Error;

/// Domain error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown deployable component '{component_id}'")]
    UnknownComponent { component_id: u64 },

    #[error("Unknown pull request '{pull_request_id}' for component '{component_id}'")]
    UnknownPullRequest {
        component_id: u64,
        pull_request_id: u64,
    },

    #[error("Unknown deployment '{deployment_id}' for component '{component_id}'")]
    UnknownDeployment {
        component_id: u64,
        deployment_id: String,
    },

    /// Another deployment holds the pull request or the component.
    #[error("Conflict: {source}")]
    Conflict { source: LedgerError },

    #[error("Could not judge pull request {descriptor}: {source}")]
    Judgment {
        descriptor: PullRequestDescriptor,
        source: ApiError,
    },

    #[error("Judging pull request {descriptor} timed out")]
    JudgmentTimeout { descriptor: PullRequestDescriptor },

    #[error("Pull request {descriptor} is not deployable ({state})")]
    NotReady {
        descriptor: PullRequestDescriptor,
        state: PullRequestState,
    },

    #[error("Pull request {descriptor} targets '{branch}', which is not the {target} branch")]
    WrongTargetBranch {
        descriptor: PullRequestDescriptor,
        branch: String,
        target: DeploymentTarget,
    },

    #[error("Cannot {action} deployment '{deployment_id}' while {state}")]
    InvalidTransition {
        deployment_id: String,
        state: DeploymentState,
        action: DeploymentAction,
    },

    /// The deployment changed between read and write.
    #[error("Transaction conflict: {source}")]
    TransactionConflict { source: LedgerError },

    #[error("Ledger error: {source}")]
    LedgerError { source: LedgerError },

    #[error("API error: {source}")]
    ApiError { source: ApiError },
}

impl From<LedgerError> for DomainError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::UnknownComponent(component_id) => Self::UnknownComponent { component_id },
            LedgerError::UnknownPullRequest(component_id, pull_request_id) => {
                Self::UnknownPullRequest {
                    component_id,
                    pull_request_id,
                }
            }
            LedgerError::UnknownDeployment(component_id, deployment_id) => {
                Self::UnknownDeployment {
                    component_id,
                    deployment_id,
                }
            }
            e @ (LedgerError::ComponentAlreadyExists(_)
            | LedgerError::PullRequestAlreadyEnqueued(_, _)
            | LedgerError::ComponentBusy { .. }) => Self::Conflict { source: e },
            e @ LedgerError::DeploymentStateConflict { .. } => {
                Self::TransactionConflict { source: e }
            }
            e => Self::LedgerError { source: e },
        }
    }
}

impl From<ApiError> for DomainError {
    fn from(e: ApiError) -> Self {
        Self::ApiError { source: e }
    }
}

/// Result alias for `DomainError`.
pub type Result<T, E = DomainError> = core::result::Result<T, E>;
