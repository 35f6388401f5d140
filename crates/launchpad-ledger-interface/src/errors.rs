use launchpad_models::{DeploymentState, DeploymentTarget};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Unknown deployable component '{0}'")]
    UnknownComponent(u64),

    #[error("Deployable component '{0}' already exists")]
    ComponentAlreadyExists(u64),

    #[error("Unknown pull request '{1}' for component '{0}'")]
    UnknownPullRequest(u64, u64),

    #[error("Unknown deployment '{1}' for component '{0}'")]
    UnknownDeployment(u64, String),

    #[error("Pull request '{1}' of component '{0}' is already enqueued")]
    PullRequestAlreadyEnqueued(u64, u64),

    #[error(
        "Component '{component_id}' already has an active {target} deployment '{deployment_id}'"
    )]
    ComponentBusy {
        component_id: u64,
        target: DeploymentTarget,
        deployment_id: String,
    },

    #[error("Deployment '{deployment_id}' is {current}, expected {expected}")]
    DeploymentStateConflict {
        deployment_id: String,
        expected: DeploymentState,
        current: DeploymentState,
    },

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

pub type Result<T, E = LedgerError> = core::result::Result<T, E>;
