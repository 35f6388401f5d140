use async_trait::async_trait;
use launchpad_models::{Deployment, DeploymentAction};
use shaku::{Component, Interface};
use tracing::info;

use crate::{CoreContext, DomainError, Result};

/// Apply a lifecycle action to a deployment.
///
/// The state read here is checked again by the ledger inside the write
/// transaction, so a concurrent transition surfaces as a transaction conflict.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait TransitionDeploymentInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component_id: u64,
        deployment_id: &str,
        action: DeploymentAction,
    ) -> Result<Deployment>;
}

#[derive(Component)]
#[shaku(interface = TransitionDeploymentInterface)]
pub(crate) struct TransitionDeployment;

#[async_trait]
impl TransitionDeploymentInterface for TransitionDeployment {
    #[tracing::instrument(skip(self, ctx), fields(action = %action))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component_id: u64,
        deployment_id: &str,
        action: DeploymentAction,
    ) -> Result<Deployment> {
        let current = ctx
            .ledger
            .deployments_get_expect(component_id, deployment_id)
            .await?;

        let next = action
            .next_state(current.state)
            .ok_or_else(|| DomainError::InvalidTransition {
                deployment_id: current.id.clone(),
                state: current.state,
                action,
            })?;

        let deployment = ctx
            .ledger
            .deployments_transition(component_id, deployment_id, current.state, next)
            .await?;

        info!(from = %current.state, to = %deployment.state, "Deployment transitioned");
        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ledger_interface::LedgerStore;
    use launchpad_models::{DeploymentOwner, DeploymentState, DeploymentTarget};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::tests::CoreContextTest;

    async fn arrange(ctx: &CoreContextTest) -> Deployment {
        ctx.with_component().await;
        let record = ctx.with_pull_request(107, "staging").await;
        ctx.ledger
            .deployments_create(
                Deployment::enqueue(&record, DeploymentOwner::default(), DeploymentTarget::Staging),
                false,
            )
            .await
            .unwrap()
    }

    async fn apply(
        ctx: &CoreContextTest,
        deployment: &Deployment,
        action: DeploymentAction,
    ) -> Result<Deployment> {
        TransitionDeployment
            .run(&ctx.as_context(), 1, &deployment.id, action)
            .await
    }

    #[tokio::test]
    async fn happy_path_then_rollback() {
        let ctx = CoreContextTest::new();
        let deployment = arrange(&ctx).await;

        for (action, state) in [
            (DeploymentAction::Start, DeploymentState::Deploying),
            (DeploymentAction::Complete, DeploymentState::NeedsQa),
            (DeploymentAction::Accept, DeploymentState::Shipped),
            (DeploymentAction::Revert, DeploymentState::RollingBack),
        ] {
            assert_eq!(apply(&ctx, &deployment, action).await.unwrap().state, state);
            assert!(
                ctx.ledger
                    .pull_requests_get_expect(1, 107)
                    .await
                    .unwrap()
                    .enqueued
            );
        }

        assert_eq!(
            apply(&ctx, &deployment, DeploymentAction::FinishRollback)
                .await
                .unwrap()
                .state,
            DeploymentState::Reverted
        );
        assert!(
            !ctx.ledger
                .pull_requests_get_expect(1, 107)
                .await
                .unwrap()
                .enqueued
        );
    }

    #[tokio::test]
    async fn invalid_transition_leaves_record_unchanged() {
        let ctx = CoreContextTest::new();
        let deployment = arrange(&ctx).await;

        assert!(matches!(
            apply(&ctx, &deployment, DeploymentAction::Accept).await,
            Err(DomainError::InvalidTransition {
                state: DeploymentState::Enqueued,
                action: DeploymentAction::Accept,
                ..
            })
        ));
        assert_eq!(
            ctx.ledger
                .deployments_get_expect(1, &deployment.id)
                .await
                .unwrap(),
            deployment
        );
    }

    #[tokio::test]
    async fn cancel_releases_pull_request() {
        let ctx = CoreContextTest::new();
        let deployment = arrange(&ctx).await;

        assert!(matches!(
            apply(&ctx, &deployment, DeploymentAction::Cancel).await,
            Err(DomainError::InvalidTransition { .. })
        ));

        apply(&ctx, &deployment, DeploymentAction::Start)
            .await
            .unwrap();
        assert_eq!(
            apply(&ctx, &deployment, DeploymentAction::Cancel)
                .await
                .unwrap()
                .state,
            DeploymentState::Failed
        );
        assert!(
            !ctx.ledger
                .pull_requests_get_expect(1, 107)
                .await
                .unwrap()
                .enqueued
        );
    }

    #[tokio::test]
    async fn reject_from_qa() {
        let ctx = CoreContextTest::new();
        let deployment = arrange(&ctx).await;

        apply(&ctx, &deployment, DeploymentAction::Start)
            .await
            .unwrap();
        apply(&ctx, &deployment, DeploymentAction::Complete)
            .await
            .unwrap();

        assert_eq!(
            apply(&ctx, &deployment, DeploymentAction::Reject)
                .await
                .unwrap()
                .state,
            DeploymentState::Rejected
        );
        assert!(matches!(
            apply(&ctx, &deployment, DeploymentAction::Revert).await,
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn concurrent_transitions_conflict() {
        let ctx = CoreContextTest::new();
        let deployment = arrange(&ctx).await;
        apply(&ctx, &deployment, DeploymentAction::Start)
            .await
            .unwrap();

        // Simulates a writer racing between the read and the write.
        ctx.ledger
            .deployments_transition(
                1,
                &deployment.id,
                DeploymentState::Deploying,
                DeploymentState::NeedsQa,
            )
            .await
            .unwrap();
        assert!(matches!(
            ctx.ledger
                .deployments_transition(
                    1,
                    &deployment.id,
                    DeploymentState::Deploying,
                    DeploymentState::Failed,
                )
                .await
                .map_err(DomainError::from),
            Err(DomainError::TransactionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_deployment() {
        let ctx = CoreContextTest::new();
        ctx.with_component().await;

        assert!(matches!(
            TransitionDeployment
                .run(&ctx.as_context(), 1, "nope", DeploymentAction::Start)
                .await,
            Err(DomainError::UnknownDeployment { .. })
        ));
    }
}
