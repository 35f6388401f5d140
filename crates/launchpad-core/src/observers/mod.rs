//! Live aggregated views over several components.

mod deployments;
mod fanout;
mod pull_requests;

pub use deployments::DeploymentObserver;
pub use fanout::ObservedView;
pub use pull_requests::PullRequestObserver;
