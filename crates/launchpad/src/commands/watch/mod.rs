//! Live views.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use launchpad_models::DeployableComponent;

use super::{Command, CommandContext};
use crate::Result;

mod deployments;
mod pull_requests;

use self::{deployments::WatchDeploymentsCommand, pull_requests::WatchPullRequestsCommand};

/// Follow live views of the ledger
#[derive(Parser)]
pub(crate) struct WatchCommand {
    #[clap(subcommand)]
    inner: WatchSubCommand,
}

#[async_trait]
impl Command for WatchCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        self.inner.execute(ctx).await
    }
}

#[derive(Subcommand)]
enum WatchSubCommand {
    PullRequests(WatchPullRequestsCommand),
    Deployments(WatchDeploymentsCommand),
}

#[async_trait]
impl Command for WatchSubCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::PullRequests(sub) => sub.execute(ctx).await,
            Self::Deployments(sub) => sub.execute(ctx).await,
        }
    }
}

/// Every component when no ID is given.
async fn observed_components(
    ctx: &CommandContext,
    component_ids: &[u64],
) -> Result<Vec<DeployableComponent>> {
    if component_ids.is_empty() {
        return Ok(ctx.ledger.components_all().await?);
    }

    let mut components = Vec::with_capacity(component_ids.len());
    for id in component_ids {
        components.push(ctx.ledger.components_get_expect(*id).await?);
    }

    Ok(components)
}
