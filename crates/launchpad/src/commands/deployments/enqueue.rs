use async_trait::async_trait;
use clap::Parser;
use launchpad_core::use_cases::deployments::EnqueueDeploymentInterface;
use launchpad_models::{DeploymentOwner, DeploymentTarget};
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Enqueue a deployment of a ready pull request
#[derive(Parser)]
pub(crate) struct DeploymentEnqueueCommand {
    /// Component ID (repository ID)
    component_id: u64,

    /// Pull request ID
    pull_request_id: u64,

    /// Target (production or staging)
    target: DeploymentTarget,

    /// Requesting user ID
    #[arg(long, default_value = "cli")]
    owner_id: String,

    /// Requesting user name
    #[arg(long, default_value = "")]
    owner_name: String,

    /// Requesting user email
    #[arg(long, default_value = "")]
    owner_email: String,
}

#[async_trait]
impl Command for DeploymentEnqueueCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let owner = DeploymentOwner {
            id: self.owner_id,
            name: self.owner_name,
            email: self.owner_email,
        };

        let enqueue: &dyn EnqueueDeploymentInterface = ctx.core_module.resolve_ref();
        let deployment = enqueue
            .run(
                &ctx.as_core_context(),
                self.component_id,
                self.pull_request_id,
                self.target,
                owner,
            )
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Deployment {} of {} enqueued on {}.",
            deployment.id,
            deployment.display_name,
            deployment.target
        )?;

        Ok(())
    }
}
