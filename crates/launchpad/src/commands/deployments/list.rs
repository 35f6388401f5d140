use async_trait::async_trait;
use clap::Parser;
use launchpad_ledger_interface::DeploymentFilter;
use launchpad_models::{DeploymentState, DeploymentTarget};

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// List the deployments of a component
#[derive(Parser)]
pub(crate) struct DeploymentListCommand {
    /// Component ID (repository ID)
    component_id: u64,

    /// Only show deployments for this target
    #[arg(long)]
    target: Option<DeploymentTarget>,

    /// Only show in-flight deployments
    #[arg(long, conflicts_with = "history")]
    active: bool,

    /// Only show finished deployments
    #[arg(long)]
    history: bool,
}

#[async_trait]
impl Command for DeploymentListCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let states = if self.active {
            DeploymentState::ACTIVE.to_vec()
        } else if self.history {
            DeploymentState::HISTORY.to_vec()
        } else {
            vec![]
        };

        let deployments = ctx
            .ledger
            .deployments_list(
                self.component_id,
                &DeploymentFilter {
                    target: self.target,
                    states,
                },
            )
            .await?;

        if deployments.is_empty() {
            writeln!(ctx.writer.write().await, "No deployment found.")?;
        } else {
            for deployment in deployments {
                writeln!(
                    ctx.writer.write().await,
                    "- [{}] {} on {}: {}",
                    deployment.id,
                    deployment.display_name,
                    deployment.target,
                    deployment.state
                )?;
            }
        }

        Ok(())
    }
}
