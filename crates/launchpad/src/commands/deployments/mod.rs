//! Deployment commands.

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use super::{Command, CommandContext};
use crate::Result;

mod enqueue;
mod list;
mod transition;

use self::{
    enqueue::DeploymentEnqueueCommand, list::DeploymentListCommand,
    transition::DeploymentTransitionCommand,
};

/// Manage deployments
#[derive(Parser)]
pub(crate) struct DeploymentCommand {
    #[clap(subcommand)]
    inner: DeploymentSubCommand,
}

#[async_trait]
impl Command for DeploymentCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        self.inner.execute(ctx).await
    }
}

#[derive(Subcommand)]
enum DeploymentSubCommand {
    List(DeploymentListCommand),
    Enqueue(DeploymentEnqueueCommand),
    Transition(DeploymentTransitionCommand),
}

#[async_trait]
impl Command for DeploymentSubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::List(sub) => sub.execute(ctx).await,
            Self::Enqueue(sub) => sub.execute(ctx).await,
            Self::Transition(sub) => sub.execute(ctx).await,
        }
    }
}
