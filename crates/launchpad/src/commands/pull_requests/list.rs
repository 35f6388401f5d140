use async_trait::async_trait;
use clap::Parser;
use launchpad_core::use_cases::pulls::JudgePullRequestsInterface;
use launchpad_ledger_interface::PullRequestFilter;
use launchpad_models::DeploymentTarget;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// List and judge the pull requests of a component targeting an environment
#[derive(Parser)]
pub(crate) struct PullRequestListCommand {
    /// Component ID (repository ID)
    component_id: u64,

    /// Target (production or staging)
    target: DeploymentTarget,
}

#[async_trait]
impl Command for PullRequestListCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let component = ctx.ledger.components_get_expect(self.component_id).await?;
        let records = ctx
            .ledger
            .pull_requests_list(
                component.id,
                &PullRequestFilter {
                    target_branch: Some(component.branch_for(self.target).into()),
                    enqueued: None,
                },
            )
            .await?;

        if records.is_empty() {
            writeln!(
                ctx.writer.write().await,
                "No pull request targeting '{}'.",
                component.branch_for(self.target)
            )?;
            return Ok(());
        }

        let judge_pull_requests: &dyn JudgePullRequestsInterface = ctx.core_module.resolve_ref();
        let pulls = judge_pull_requests
            .run(&ctx.as_core_context(), records)
            .await;

        for pull in pulls {
            writeln!(
                ctx.writer.write().await,
                "- [{}] #{} {} ({}){}",
                pull.record.id,
                pull.record.number,
                pull.record.title,
                pull.state,
                if pull.record.enqueued { " [enqueued]" } else { "" }
            )?;
        }

        Ok(())
    }
}
