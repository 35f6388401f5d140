//! Ledger models.

mod component;
mod deployment;
mod deployment_state;
mod deployment_target;
mod ledger_path;
mod pull_request;
mod pull_request_descriptor;
mod repository_path;

pub use component::{DeployApi, DeployEndpoint, DeployableComponent};
pub use deployment::{Deployment, DeploymentOwner};
pub use deployment_state::{DeploymentAction, DeploymentState, DeploymentStateError};
pub use deployment_target::{DeploymentTarget, DeploymentTargetError};
pub use ledger_path::LedgerPath;
pub use pull_request::{PullRequest, PullRequestAuthor, PullRequestRecord, PullRequestState};
pub use pull_request_descriptor::{PullRequestDescriptor, PullRequestDescriptorError};
pub use repository_path::{RepositoryPath, RepositoryPathError};
