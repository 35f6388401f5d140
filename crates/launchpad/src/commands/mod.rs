//! Commands.

use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use clap::Subcommand;
use launchpad_config::Config;
use launchpad_core::{CoreContext, CoreModule};
use launchpad_ghapi_interface::ApiService;
use launchpad_ledger_interface::LedgerStore;
use tokio::sync::RwLock;

use self::{
    components::ComponentCommand, deployments::DeploymentCommand,
    pull_requests::PullRequestCommand, server::ServerCommand, watch::WatchCommand,
};
use crate::Result;

mod components;
mod deployments;
mod pull_requests;
mod server;
mod watch;

pub(crate) struct CommandContext {
    pub config: Config,
    pub ledger: Box<dyn LedgerStore>,
    pub api_service: Box<dyn ApiService>,
    pub core_module: CoreModule,
    pub writer: Arc<RwLock<dyn Write + Send + Sync>>,
}

impl CommandContext {
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            api_service: self.api_service.as_ref(),
            ledger: self.ledger.as_ref(),
        }
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: CommandContext) -> Result<()>;
}

/// Command
#[derive(Subcommand)]
pub(crate) enum SubCommand {
    Server(ServerCommand),
    Components(ComponentCommand),
    PullRequests(PullRequestCommand),
    Deployments(DeploymentCommand),
    Watch(WatchCommand),
}

#[async_trait]
impl Command for SubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::Server(sub) => sub.execute(ctx).await,
            Self::Components(sub) => sub.execute(ctx).await,
            Self::PullRequests(sub) => sub.execute(ctx).await,
            Self::Deployments(sub) => sub.execute(ctx).await,
            Self::Watch(sub) => sub.execute(ctx).await,
        }
    }
}
