use async_trait::async_trait;
use launchpad_ghapi_interface::types::GhPullRequest;
use launchpad_ledger_interface::UpsertOutcome;
use launchpad_models::{DeployableComponent, PullRequestAuthor, PullRequestRecord};
use shaku::{Component, Interface};

use crate::{CoreContext, Result};

/// Idempotent registration keyed by the code host pull request id.
///
/// A known record only gets its head commit, target branch and title
/// refreshed; its `enqueued` flag is left alone.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait RegisterOrUpdatePullRequestInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component: &DeployableComponent,
        upstream_pr: &GhPullRequest,
    ) -> Result<UpsertOutcome>;
}

#[derive(Component)]
#[shaku(interface = RegisterOrUpdatePullRequestInterface)]
pub(crate) struct RegisterOrUpdatePullRequest;

#[async_trait]
impl RegisterOrUpdatePullRequestInterface for RegisterOrUpdatePullRequest {
    #[tracing::instrument(
        skip_all,
        fields(
            component_id = component.id,
            pr_number = upstream_pr.number,
            target_branch = %upstream_pr.base.reference
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component: &DeployableComponent,
        upstream_pr: &GhPullRequest,
    ) -> Result<UpsertOutcome> {
        let outcome = ctx
            .ledger
            .pull_requests_upsert(PullRequestRecord {
                id: upstream_pr.id,
                component_id: component.id,
                number: upstream_pr.number,
                title: upstream_pr.title.clone(),
                head_commit: upstream_pr.head.sha.clone(),
                target_branch: upstream_pr.base.reference.clone(),
                url: upstream_pr.html_url.clone(),
                author: PullRequestAuthor {
                    handle: upstream_pr.user.login.clone(),
                    url: upstream_pr.user.html_url.clone(),
                },
                repo: component.repository_path(),
                enqueued: false,
                ..Default::default()
            })
            .await?;

        Ok(outcome)
    }
}
