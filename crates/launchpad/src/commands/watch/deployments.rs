use async_trait::async_trait;
use clap::Parser;
use launchpad_core::observers::DeploymentObserver;
use launchpad_models::{DeploymentState, DeploymentTarget};

use super::observed_components;
use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Follow the active (or finished) deployments of a target
#[derive(Parser)]
pub(crate) struct WatchDeploymentsCommand {
    /// Target (production or staging)
    target: DeploymentTarget,

    /// Follow finished deployments instead of active ones
    #[arg(long)]
    history: bool,

    /// Only observe these components (all by default)
    #[arg(long = "component-id")]
    component_ids: Vec<u64>,

    /// Stop after this many views
    #[arg(long)]
    updates: Option<usize>,
}

#[async_trait]
impl Command for WatchDeploymentsCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let components = observed_components(&ctx, &self.component_ids).await?;
        let states = if self.history {
            DeploymentState::HISTORY
        } else {
            DeploymentState::ACTIVE
        };

        let mut observer = DeploymentObserver::new();
        observer
            .observe(&ctx.as_core_context(), &components, self.target, &states)
            .await?;

        let mut count = 0;
        while observer.changed().await {
            let view = observer.view();
            let mut writer = ctx.writer.write().await;

            writeln!(
                writer,
                "== {} deployments (fully loaded: {})",
                self.target, view.is_fully_loaded
            )?;
            for deployment in view.items() {
                writeln!(
                    writer,
                    "- [{}] {}: {}",
                    deployment.id, deployment.display_name, deployment.state
                )?;
            }

            count += 1;
            if self.updates.is_some_and(|max| count >= max) {
                break;
            }
        }

        observer.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ledger_interface::LedgerStore;
    use launchpad_models::{Deployment, DeploymentOwner, DeploymentTarget};
    use pretty_assertions::assert_eq;

    use crate::testutils::{test_command, CommandContextTest};

    #[tokio::test]
    async fn run() {
        let ctx = CommandContextTest::new();
        ctx.with_component().await;
        let record = ctx.with_pull_request(101, "staging").await;
        let deployment = ctx
            .ledger
            .deployments_create(
                Deployment::enqueue(&record, DeploymentOwner::default(), DeploymentTarget::Staging),
                false,
            )
            .await
            .unwrap();

        assert_eq!(
            test_command(ctx, &["watch", "deployments", "staging", "--updates", "1"]).await,
            format!(
                "== STAGING deployments (fully loaded: true)\n- [{}] rocket #1: ENQUEUED\n",
                deployment.id
            )
        );
    }
}
