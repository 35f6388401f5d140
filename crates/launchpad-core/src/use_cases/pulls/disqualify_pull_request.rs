use async_trait::async_trait;
use shaku::{Component, Interface};
use tracing::info;

use crate::{CoreContext, Result};

/// Remove a pull request from the ledger.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait DisqualifyPullRequestInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<bool>;
}

#[derive(Component)]
#[shaku(interface = DisqualifyPullRequestInterface)]
pub(crate) struct DisqualifyPullRequest;

#[async_trait]
impl DisqualifyPullRequestInterface for DisqualifyPullRequest {
    #[tracing::instrument(skip(self, ctx), ret)]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<bool> {
        let removed = ctx
            .ledger
            .pull_requests_delete(component_id, pull_request_id)
            .await?;

        if !removed {
            info!(
                component_id,
                pull_request_id, "Pull request was not in the ledger"
            );
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ledger_interface::LedgerStore;

    use super::*;
    use crate::context::tests::CoreContextTest;

    #[tokio::test]
    async fn remove_known_then_unknown() {
        let ctx = CoreContextTest::new();
        ctx.with_component().await;
        ctx.with_pull_request(101, "staging").await;

        assert!(DisqualifyPullRequest
            .run(&ctx.as_context(), 1, 101)
            .await
            .unwrap());
        assert!(!DisqualifyPullRequest
            .run(&ctx.as_context(), 1, 101)
            .await
            .unwrap());
        assert_eq!(ctx.ledger.pull_requests_get(1, 101).await.unwrap(), None);
    }
}
