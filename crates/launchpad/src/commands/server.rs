use async_trait::async_trait;
use clap::Parser;
use launchpad_server::server::{run_server, AppContext};

use super::{Command, CommandContext};
use crate::Result;

/// Serve webhooks, judgments and metrics
#[derive(Parser)]
pub(crate) struct ServerCommand {
    /// Listen on this port instead of LAUNCHPAD_SERVER_BIND_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[async_trait]
impl Command for ServerCommand {
    async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        if let Some(port) = self.port {
            ctx.config.server.bind_port = port;
        }

        // Actix workers are not `Send`, the server has to live on the local set.
        tokio::task::spawn_local(async move {
            let context = AppContext::new_with_adapters(
                ctx.config,
                ctx.core_module,
                ctx.ledger,
                ctx.api_service,
            );

            run_server(context).await
        })
        .await??;

        Ok(())
    }
}
