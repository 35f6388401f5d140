use async_trait::async_trait;
use clap::Parser;
use launchpad_core::use_cases::components::ProvisionDeployableComponentsInterface;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Provision deployable components from an installation's repositories
#[derive(Parser)]
pub(crate) struct ComponentSyncCommand {
    /// Installation ID
    installation_id: u64,

    /// Only provision these repository IDs
    #[arg(long = "repository-id")]
    repository_ids: Vec<u64>,
}

#[async_trait]
impl Command for ComponentSyncCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let repository_ids = if self.repository_ids.is_empty() {
            None
        } else {
            Some(self.repository_ids)
        };

        let provision: &dyn ProvisionDeployableComponentsInterface =
            ctx.core_module.resolve_ref();
        let paths = provision
            .run(
                &ctx.as_core_context(),
                self.installation_id,
                repository_ids,
            )
            .await?;

        if paths.is_empty() {
            writeln!(ctx.writer.write().await, "No new deployable component.")?;
        } else {
            for path in paths {
                writeln!(ctx.writer.write().await, "Provisioned {}", path)?;
            }
        }

        Ok(())
    }
}
