use launchpad_ledger_interface::PullRequestFilter;
use launchpad_models::{DeployableComponent, DeploymentTarget, PullRequest, PullRequestRecord};
use shaku::HasComponent;

use super::{fanout::Fanout, ObservedView};
use crate::{use_cases::pulls::JudgePullRequestsInterface, CoreContext, Result};

type ObservedKey = (Vec<(u64, String)>, DeploymentTarget);

/// Live list of the pull requests waiting for a deployment on a target,
/// judged again on every snapshot.
pub struct PullRequestObserver {
    fanout: Fanout<ObservedKey, PullRequestRecord, PullRequest>,
}

impl PullRequestObserver {
    pub fn new() -> Self {
        Self {
            fanout: Fanout::new(),
        }
    }

    /// Observe the pull requests targeting the `target` branch of each component.
    ///
    /// The previous view is cleared before the new subscriptions are opened.
    #[tracing::instrument(
        skip_all,
        fields(target = %target, components = components.len())
    )]
    pub async fn observe(
        &mut self,
        ctx: &CoreContext<'_>,
        components: &[DeployableComponent],
        target: DeploymentTarget,
    ) -> Result<()> {
        let key = (
            components
                .iter()
                .map(|c| (c.id, c.branch_for(target).to_string()))
                .collect(),
            target,
        );
        if !self
            .fanout
            .reset(key, components.iter().map(|c| c.id).collect())
        {
            return Ok(());
        }

        for component in components {
            let filter = PullRequestFilter {
                target_branch: Some(component.branch_for(target).into()),
                enqueued: Some(false),
            };

            match ctx.ledger.subscribe_pull_requests(component.id, filter).await {
                Ok(subscription) => self.fanout.attach(component.id, subscription),
                Err(e) => {
                    self.fanout.clear();
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Wait for the next snapshot and judge it.
    ///
    /// Returns `false` when nothing is observed anymore.
    pub async fn changed(&mut self, ctx: &CoreContext<'_>) -> bool {
        let Some((component_id, records)) = self.fanout.next_snapshot().await else {
            return false;
        };

        let judge_pull_requests: &dyn JudgePullRequestsInterface = ctx.core_module.resolve_ref();
        let judged = judge_pull_requests.run(ctx, records).await;
        self.fanout.store(component_id, judged);
        true
    }

    pub fn view(&self) -> ObservedView<PullRequest> {
        self.fanout.view()
    }

    /// Drop every subscription.
    pub fn cancel(&mut self) {
        self.fanout.clear();
    }
}

impl Default for PullRequestObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ghapi_interface::types::{GhDeployabilityReport, GhMergeableState};
    use launchpad_ledger_interface::LedgerStore;
    use launchpad_models::{Deployment, DeploymentOwner, PullRequestState};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::tests::CoreContextTest;

    fn arrange_context() -> CoreContextTest {
        let mut ctx = CoreContextTest::new();
        ctx.api_service
            .expect_pull_request_deployability()
            .returning(|_, _, number| {
                Ok(GhDeployabilityReport {
                    mergeable: if number == 3 {
                        GhMergeableState::Conflicting
                    } else {
                        GhMergeableState::Mergeable
                    },
                    ..Default::default()
                })
            });
        ctx
    }

    fn visible(view: &ObservedView<PullRequest>) -> Vec<(u64, PullRequestState)> {
        view.items().map(|pr| (pr.record.id, pr.state)).collect()
    }

    #[tokio::test]
    async fn judged_snapshot() {
        let ctx = arrange_context();
        let component = ctx.with_component().await;
        ctx.with_pull_request(101, "staging").await;
        ctx.with_pull_request(103, "staging").await;
        let context = ctx.as_context();

        let mut observer = PullRequestObserver::new();
        assert!(!observer.view().is_fully_loaded);

        observer
            .observe(&context, &[component], DeploymentTarget::Staging)
            .await
            .unwrap();
        assert!(observer.changed(&context).await);

        let view = observer.view();
        assert!(view.is_fully_loaded);
        assert_eq!(
            visible(&view),
            vec![
                (101, PullRequestState::Ready),
                (103, PullRequestState::NotReady)
            ]
        );
    }

    #[tokio::test]
    async fn environment_switch_clears_view() {
        let ctx = arrange_context();
        let component = ctx.with_component().await;
        ctx.with_pull_request(101, "staging").await;
        ctx.with_pull_request(102, "main").await;
        let context = ctx.as_context();

        let mut observer = PullRequestObserver::new();
        observer
            .observe(&context, &[component.clone()], DeploymentTarget::Staging)
            .await
            .unwrap();
        observer.changed(&context).await;
        assert_eq!(visible(&observer.view()), vec![(101, PullRequestState::Ready)]);

        observer
            .observe(&context, &[component], DeploymentTarget::Production)
            .await
            .unwrap();
        let view = observer.view();
        assert!(view.snapshot.is_empty());
        assert!(!view.is_fully_loaded);

        observer.changed(&context).await;
        assert_eq!(visible(&observer.view()), vec![(102, PullRequestState::Ready)]);
    }

    #[tokio::test]
    async fn fully_loaded_once_every_component_delivered() {
        let ctx = arrange_context();
        let rocket = ctx.with_component().await;
        let satellite = ctx
            .ledger
            .components_create(DeployableComponent {
                id: 2,
                owner: "acme".into(),
                name: "satellite".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let context = ctx.as_context();

        let mut observer = PullRequestObserver::new();
        observer
            .observe(&context, &[rocket, satellite], DeploymentTarget::Staging)
            .await
            .unwrap();

        observer.changed(&context).await;
        assert!(!observer.view().is_fully_loaded);
        observer.changed(&context).await;
        assert!(observer.view().is_fully_loaded);
        assert_eq!(observer.view().snapshot.len(), 2);
    }

    #[tokio::test]
    async fn live_updates() {
        let ctx = arrange_context();
        let component = ctx.with_component().await;
        let record = ctx.with_pull_request(101, "staging").await;
        let context = ctx.as_context();

        let mut observer = PullRequestObserver::new();
        observer
            .observe(&context, &[component], DeploymentTarget::Staging)
            .await
            .unwrap();
        observer.changed(&context).await;

        ctx.with_pull_request(104, "staging").await;
        observer.changed(&context).await;
        assert_eq!(
            visible(&observer.view()),
            vec![
                (101, PullRequestState::Ready),
                (104, PullRequestState::Ready)
            ]
        );

        // Enqueued pull requests leave the list.
        ctx.ledger
            .deployments_create(
                Deployment::enqueue(&record, DeploymentOwner::default(), DeploymentTarget::Staging),
                false,
            )
            .await
            .unwrap();
        observer.changed(&context).await;
        assert_eq!(visible(&observer.view()), vec![(104, PullRequestState::Ready)]);
    }

    #[tokio::test]
    async fn cancel_stops_everything() {
        let ctx = arrange_context();
        let component = ctx.with_component().await;
        let context = ctx.as_context();

        let mut observer = PullRequestObserver::new();
        observer
            .observe(&context, &[component], DeploymentTarget::Staging)
            .await
            .unwrap();
        observer.cancel();

        assert!(!observer.changed(&context).await);
        assert!(observer.view().snapshot.is_empty());
    }
}
