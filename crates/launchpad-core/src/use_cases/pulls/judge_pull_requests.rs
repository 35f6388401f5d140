use async_trait::async_trait;
use futures::future::join_all;
use launchpad_models::{PullRequest, PullRequestRecord, PullRequestState};
use shaku::{Component, HasComponent, Interface};
use tracing::warn;

use super::JudgePullRequestInterface;
use crate::{CoreContext, DomainError};

/// Judge a batch of pull requests concurrently.
///
/// Each pull request settles on its own: a failure becomes `FETCH_ERROR`
/// for that pull request only.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait JudgePullRequestsInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        records: Vec<PullRequestRecord>,
    ) -> Vec<PullRequest>;
}

#[derive(Component)]
#[shaku(interface = JudgePullRequestsInterface)]
pub(crate) struct JudgePullRequests;

#[async_trait]
impl JudgePullRequestsInterface for JudgePullRequests {
    #[tracing::instrument(skip_all, fields(count = records.len()))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        records: Vec<PullRequestRecord>,
    ) -> Vec<PullRequest> {
        let judge_pull_request: &dyn JudgePullRequestInterface = ctx.core_module.resolve_ref();

        let verdicts = join_all(records.iter().map(|record| async move {
            let descriptor = record.descriptor();
            judge_pull_request.run(ctx, &descriptor).await
        }))
        .await;

        records
            .into_iter()
            .zip(verdicts)
            .map(|(record, verdict)| {
                let state = verdict.unwrap_or_else(|e| absorb_failure(&record, e));
                PullRequest { record, state }
            })
            .collect()
    }
}

fn absorb_failure(record: &PullRequestRecord, error: DomainError) -> PullRequestState {
    warn!(
        component_id = record.component_id,
        pull_request_id = record.id,
        error = %error,
        "Could not judge pull request"
    );

    PullRequestState::FetchError
}
