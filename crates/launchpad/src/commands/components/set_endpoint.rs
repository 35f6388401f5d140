use async_trait::async_trait;
use clap::Parser;
use launchpad_models::DeploymentTarget;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Set the deploy endpoint of a deployable component for a target
#[derive(Parser)]
pub(crate) struct ComponentSetEndpointCommand {
    /// Component ID (repository ID)
    component_id: u64,

    /// Target (production or staging)
    target: DeploymentTarget,

    /// Deploy submission URL
    submit_deploy: String,
}

#[async_trait]
impl Command for ComponentSetEndpointCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let component = ctx
            .ledger
            .components_set_deploy_endpoint(self.component_id, self.target, &self.submit_deploy)
            .await?;

        writeln!(
            ctx.writer.write().await,
            "{} deploy endpoint of {} set to '{}'.",
            self.target,
            component.full_name,
            component.deploy_api.endpoint(self.target).submit_deploy
        )?;

        Ok(())
    }
}
