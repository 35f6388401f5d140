use async_trait::async_trait;
use clap::Parser;
use launchpad_core::use_cases::pulls::JudgePullRequestInterface;
use launchpad_models::PullRequestDescriptor;
use shaku::HasComponent;

use crate::{
    commands::{Command, CommandContext},
    Result,
};

/// Query the live deployability of a pull request
#[derive(Parser)]
pub(crate) struct PullRequestJudgeCommand {
    /// Pull request path (e.g. `MyOrganization/my-project/12`)
    descriptor: PullRequestDescriptor,
}

#[async_trait]
impl Command for PullRequestJudgeCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let judge: &dyn JudgePullRequestInterface = ctx.core_module.resolve_ref();
        let state = judge
            .run(&ctx.as_core_context(), &self.descriptor)
            .await?;

        writeln!(ctx.writer.write().await, "{}: {}", self.descriptor, state)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ghapi_interface::types::{GhDeployabilityReport, GhMergeableState};
    use pretty_assertions::assert_eq;

    use crate::testutils::{test_command, CommandContextTest};

    #[tokio::test]
    async fn run() {
        let mut ctx = CommandContextTest::new();
        ctx.api_service
            .expect_pull_request_deployability()
            .withf(|owner, name, number| owner == "acme" && name == "rocket" && number == &12)
            .returning(|_, _, _| {
                Ok(GhDeployabilityReport {
                    mergeable: GhMergeableState::Conflicting,
                    ..Default::default()
                })
            });

        assert_eq!(
            test_command(ctx, &["pull-requests", "judge", "acme/rocket/12"]).await,
            "acme/rocket (#12): NOT_READY\n"
        );
    }
}
