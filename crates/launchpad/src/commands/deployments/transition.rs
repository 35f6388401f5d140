use async_trait::async_trait;
use clap::Parser;
use launchpad_core::use_cases::deployments::TransitionDeploymentInterface;
use launchpad_models::DeploymentAction;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Apply an action to a deployment
/// (start, complete, fail, cancel, accept, reject, revert, finish-rollback)
#[derive(Parser)]
pub(crate) struct DeploymentTransitionCommand {
    /// Component ID (repository ID)
    component_id: u64,

    /// Deployment ID
    deployment_id: String,

    /// Action
    action: DeploymentAction,
}

#[async_trait]
impl Command for DeploymentTransitionCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let transition: &dyn TransitionDeploymentInterface = ctx.core_module.resolve_ref();
        let deployment = transition
            .run(
                &ctx.as_core_context(),
                self.component_id,
                &self.deployment_id,
                self.action,
            )
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Deployment {} is now {}.",
            deployment.id,
            deployment.state
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ledger_interface::LedgerStore;
    use launchpad_models::{Deployment, DeploymentOwner, DeploymentState, DeploymentTarget};
    use pretty_assertions::assert_eq;

    use crate::testutils::{test_command, test_command_error, CommandContextTest};

    async fn enqueued(ctx: &CommandContextTest) -> Deployment {
        ctx.with_component().await;
        let record = ctx.with_pull_request(101, "staging").await;
        ctx.ledger
            .deployments_create(
                Deployment::enqueue(&record, DeploymentOwner::default(), DeploymentTarget::Staging),
                false,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn run() {
        let ctx = CommandContextTest::new();
        let deployment = enqueued(&ctx).await;
        let ledger = ctx.ledger.clone();

        assert_eq!(
            test_command(ctx, &["deployments", "transition", "1", &deployment.id, "start"]).await,
            format!("Deployment {} is now DEPLOYING.\n", deployment.id)
        );
        assert_eq!(
            ledger
                .deployments_get_expect(1, &deployment.id)
                .await
                .unwrap()
                .state,
            DeploymentState::Deploying
        );
    }

    #[tokio::test]
    async fn run_invalid() {
        let ctx = CommandContextTest::new();
        let deployment = enqueued(&ctx).await;

        let error = test_command_error(
            ctx,
            &["deployments", "transition", "1", &deployment.id, "accept"],
        )
        .await;
        assert!(error.contains("accept"), "{error}");
    }
}
