use async_trait::async_trait;
use clap::Parser;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Set the production and staging branches of a deployable component
#[derive(Parser)]
pub(crate) struct ComponentSetBranchesCommand {
    /// Component ID (repository ID)
    component_id: u64,

    /// Production branch
    production_branch: String,

    /// Staging branch
    staging_branch: String,
}

#[async_trait]
impl Command for ComponentSetBranchesCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let component = ctx
            .ledger
            .components_set_branches(
                self.component_id,
                &self.production_branch,
                &self.staging_branch,
            )
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Branches of {} set to production '{}' and staging '{}'.",
            component.full_name,
            component.production_branch,
            component.staging_branch
        )?;

        Ok(())
    }
}
