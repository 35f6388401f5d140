use async_trait::async_trait;
use clap::Parser;
use launchpad_core::observers::PullRequestObserver;
use launchpad_models::DeploymentTarget;

use super::observed_components;
use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Follow the pull requests waiting for a deployment on a target
#[derive(Parser)]
pub(crate) struct WatchPullRequestsCommand {
    /// Target (production or staging)
    target: DeploymentTarget,

    /// Only observe these components (all by default)
    #[arg(long = "component-id")]
    component_ids: Vec<u64>,

    /// Stop after this many views
    #[arg(long)]
    updates: Option<usize>,
}

#[async_trait]
impl Command for WatchPullRequestsCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let components = observed_components(&ctx, &self.component_ids).await?;
        let core_ctx = ctx.as_core_context();

        let mut observer = PullRequestObserver::new();
        observer.observe(&core_ctx, &components, self.target).await?;

        let mut count = 0;
        while observer.changed(&core_ctx).await {
            let view = observer.view();
            let mut writer = ctx.writer.write().await;

            writeln!(
                writer,
                "== {} pull requests (fully loaded: {})",
                self.target, view.is_fully_loaded
            )?;
            for pull in view.items() {
                writeln!(
                    writer,
                    "- [{}] {} #{} {} ({})",
                    pull.record.id,
                    pull.record.repo,
                    pull.record.number,
                    pull.record.title,
                    pull.state
                )?;
            }

            count += 1;
            if self.updates.is_some_and(|max| count >= max) {
                break;
            }
        }

        observer.cancel();
        Ok(())
    }
}
