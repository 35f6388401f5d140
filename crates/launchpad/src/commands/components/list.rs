use async_trait::async_trait;
use clap::Parser;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// List deployable components
#[derive(Parser)]
pub(crate) struct ComponentListCommand;

#[async_trait]
impl Command for ComponentListCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let components = ctx.ledger.components_all().await?;
        if components.is_empty() {
            writeln!(ctx.writer.write().await, "No deployable component known.")?;
        } else {
            for component in components {
                writeln!(
                    ctx.writer.write().await,
                    "- [{}] {} (production: {}, staging: {})",
                    component.id,
                    component.full_name,
                    component.production_branch,
                    component.staging_branch
                )?;
            }
        }

        Ok(())
    }
}
