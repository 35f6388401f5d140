//! Deployable component commands.

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use super::{Command, CommandContext};
use crate::Result;

mod list;
mod set_branches;
mod set_endpoint;
mod show;
mod sync;

use self::{
    list::ComponentListCommand, set_branches::ComponentSetBranchesCommand,
    set_endpoint::ComponentSetEndpointCommand, show::ComponentShowCommand,
    sync::ComponentSyncCommand,
};

/// Manage deployable components
#[derive(Parser)]
pub(crate) struct ComponentCommand {
    #[clap(subcommand)]
    inner: ComponentSubCommand,
}

#[async_trait]
impl Command for ComponentCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        self.inner.execute(ctx).await
    }
}

#[derive(Subcommand)]
enum ComponentSubCommand {
    List(ComponentListCommand),
    Show(ComponentShowCommand),
    Sync(ComponentSyncCommand),
    SetBranches(ComponentSetBranchesCommand),
    SetEndpoint(ComponentSetEndpointCommand),
}

#[async_trait]
impl Command for ComponentSubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::List(sub) => sub.execute(ctx).await,
            Self::Show(sub) => sub.execute(ctx).await,
            Self::Sync(sub) => sub.execute(ctx).await,
            Self::SetBranches(sub) => sub.execute(ctx).await,
            Self::SetEndpoint(sub) => sub.execute(ctx).await,
        }
    }
}
