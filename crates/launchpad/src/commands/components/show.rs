use async_trait::async_trait;
use clap::Parser;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Show deployable component info
#[derive(Parser)]
pub(crate) struct ComponentShowCommand {
    /// Component ID (repository ID)
    component_id: u64,
}

#[async_trait]
impl Command for ComponentShowCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let component = ctx.ledger.components_get_expect(self.component_id).await?;

        writeln!(
            ctx.writer.write().await,
            "Accessing deployable component {}",
            component.full_name
        )?;
        writeln!(ctx.writer.write().await, "{:#?}", component)?;

        Ok(())
    }
}
