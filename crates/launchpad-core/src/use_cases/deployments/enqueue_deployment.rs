use async_trait::async_trait;
use launchpad_models::{Deployment, DeploymentOwner, DeploymentTarget};
use shaku::{Component, HasComponent, Interface};
use tracing::info;

use crate::{use_cases::pulls::JudgePullRequestInterface, CoreContext, DomainError, Result};

/// Request a deployment of a ledger pull request.
///
/// The pull request is judged again right before the deployment is created;
/// the ledger then refuses the creation if another active deployment holds it.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait EnqueueDeploymentInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component_id: u64,
        pull_request_id: u64,
        target: DeploymentTarget,
        owner: DeploymentOwner,
    ) -> Result<Deployment>;
}

#[derive(Component)]
#[shaku(interface = EnqueueDeploymentInterface)]
pub(crate) struct EnqueueDeployment;

#[async_trait]
impl EnqueueDeploymentInterface for EnqueueDeployment {
    #[tracing::instrument(skip(self, ctx, owner), fields(owner = %owner.name))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component_id: u64,
        pull_request_id: u64,
        target: DeploymentTarget,
        owner: DeploymentOwner,
    ) -> Result<Deployment> {
        let component = ctx.ledger.components_get_expect(component_id).await?;
        let record = ctx
            .ledger
            .pull_requests_get_expect(component_id, pull_request_id)
            .await?;

        if record.target_branch != component.branch_for(target) {
            return Err(DomainError::WrongTargetBranch {
                descriptor: record.descriptor(),
                branch: record.target_branch,
                target,
            });
        }

        let judge_pull_request: &dyn JudgePullRequestInterface = ctx.core_module.resolve_ref();
        let state = judge_pull_request.run(ctx, &record.descriptor()).await?;
        if !state.is_ready() {
            return Err(DomainError::NotReady {
                descriptor: record.descriptor(),
                state,
            });
        }

        let deployment = ctx
            .ledger
            .deployments_create(
                Deployment::enqueue(&record, owner, target),
                ctx.config.deployments.exclusive_per_component,
            )
            .await?;

        info!(
            deployment_id = %deployment.id,
            display_name = %deployment.display_name,
            "Deployment enqueued"
        );

        Ok(deployment)
    }
}
