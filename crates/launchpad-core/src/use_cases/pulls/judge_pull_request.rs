use std::time::Duration;

use async_trait::async_trait;
use launchpad_ghapi_interface::types::{
    GhCheckConclusion, GhDeployabilityReport, GhMergeableState,
};
use launchpad_models::{PullRequestDescriptor, PullRequestState};
use shaku::{Component, Interface};

use crate::{CoreContext, DomainError, Result};

/// Query the code host for the live deployability of one pull request.
///
/// Nothing is cached: every call hits the code host.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait JudgePullRequestInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        descriptor: &PullRequestDescriptor,
    ) -> Result<PullRequestState>;
}

#[derive(Component)]
#[shaku(interface = JudgePullRequestInterface)]
pub(crate) struct JudgePullRequest;

#[async_trait]
impl JudgePullRequestInterface for JudgePullRequest {
    #[tracing::instrument(skip(self, ctx), fields(descriptor = %descriptor), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        descriptor: &PullRequestDescriptor,
    ) -> Result<PullRequestState> {
        let report = tokio::time::timeout(
            Duration::from_millis(ctx.config.api.judge_timeout),
            ctx.api_service.pull_request_deployability(
                &descriptor.repo.owner,
                &descriptor.repo.name,
                descriptor.number,
            ),
        )
        .await
        .map_err(|_| DomainError::JudgmentTimeout {
            descriptor: descriptor.clone(),
        })?
        .map_err(|e| DomainError::Judgment {
            descriptor: descriptor.clone(),
            source: e,
        })?;

        Ok(determine_deployability(&report))
    }
}

/// Verdict for a code host report.
///
/// Closed or draft pull requests are never deployable. Otherwise the pull
/// request must be mergeable and every required check must have succeeded
/// on the last commit.
pub fn determine_deployability(report: &GhDeployabilityReport) -> PullRequestState {
    if report.closed || report.is_draft {
        return PullRequestState::NotReady;
    }

    if report.mergeable != GhMergeableState::Mergeable {
        return PullRequestState::NotReady;
    }

    let required_contexts = match &report.branch_protection {
        Some(protection) if protection.requires_status_checks => &protection.required_contexts,
        _ => return PullRequestState::Ready,
    };

    let all_checks_passed = required_contexts.iter().all(|context| {
        let mut runs = report
            .check_runs
            .iter()
            .filter(|run| &run.name == context)
            .peekable();

        // A required check which never ran is not a success.
        runs.peek().is_some()
            && runs.all(|run| run.conclusion == Some(GhCheckConclusion::Success))
    });

    if all_checks_passed {
        PullRequestState::Ready
    } else {
        PullRequestState::NotReady
    }
}
