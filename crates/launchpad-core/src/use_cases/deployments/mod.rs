pub(crate) mod enqueue_deployment;
pub(crate) mod transition_deployment;

pub use enqueue_deployment::EnqueueDeploymentInterface;
pub use transition_deployment::TransitionDeploymentInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    enqueue_deployment::MockEnqueueDeploymentInterface,
    transition_deployment::MockTransitionDeploymentInterface,
};
