use async_trait::async_trait;
use launchpad_ghapi_interface::types::{
    GhPullRequestAction, GhPullRequestEvent, GhPullRequestState,
};
use launchpad_models::{DeployableComponent, LedgerPath};
use shaku::{Component, HasComponent, Interface};
use tracing::info;

use super::{DisqualifyPullRequestInterface, RegisterOrUpdatePullRequestInterface};
use crate::{CoreContext, Result};

/// Keep the ledger in line with a pull request webhook event.
///
/// Returns the touched ledger path, or `None` when the event is ignored.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessPullRequestEventInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhPullRequestEvent,
    ) -> Result<Option<LedgerPath>>;
}

#[derive(Component)]
#[shaku(interface = ProcessPullRequestEventInterface)]
pub(crate) struct ProcessPullRequestEvent;

#[async_trait]
impl ProcessPullRequestEventInterface for ProcessPullRequestEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            action = ?event.action,
            pr_number = event.number,
            repository_path = %event.repository.full_name,
            base = %event.pull_request.base.reference,
            draft = event.pull_request.draft
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhPullRequestEvent,
    ) -> Result<Option<LedgerPath>> {
        let component = ctx
            .ledger
            .components_get_expect(event.repository.id)
            .await?;

        let eligible = is_eligible(&component, &event);
        let path = LedgerPath::PullRequest {
            component_id: component.id,
            pull_request_id: event.pull_request.id,
        };

        match event.action {
            GhPullRequestAction::Opened
            | GhPullRequestAction::Reopened
            | GhPullRequestAction::ReadyForReview
            | GhPullRequestAction::Synchronize
            | GhPullRequestAction::Edited
                if eligible =>
            {
                let register_or_update: &dyn RegisterOrUpdatePullRequestInterface =
                    ctx.core_module.resolve_ref();
                register_or_update
                    .run(ctx, &component, &event.pull_request)
                    .await?;

                Ok(Some(path))
            }
            GhPullRequestAction::Opened
            | GhPullRequestAction::Reopened
            | GhPullRequestAction::ReadyForReview
            | GhPullRequestAction::Synchronize => {
                info!("Pull request is a draft or does not target a deployable branch, skipping");
                Ok(None)
            }
            GhPullRequestAction::Edited
            | GhPullRequestAction::Closed
            | GhPullRequestAction::ConvertedToDraft => {
                let disqualify: &dyn DisqualifyPullRequestInterface =
                    ctx.core_module.resolve_ref();
                disqualify
                    .run(ctx, component.id, event.pull_request.id)
                    .await?;

                Ok(Some(path))
            }
            GhPullRequestAction::Other => Ok(None),
        }
    }
}

fn is_eligible(component: &DeployableComponent, event: &GhPullRequestEvent) -> bool {
    event.pull_request.state == GhPullRequestState::Open
        && !event.pull_request.draft
        && component.is_deployable_branch(&event.pull_request.base.reference)
}

#[cfg(test)]
mod tests {
    use launchpad_ghapi_interface::types::{GhBranch, GhPullRequest, GhRepository, GhUser};
    use launchpad_ledger_interface::{LedgerStore, UpsertOutcome};
    use launchpad_models::PullRequestRecord;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        context::tests::CoreContextTest,
        use_cases::pulls::{
            MockDisqualifyPullRequestInterface, MockRegisterOrUpdatePullRequestInterface,
        },
        CoreModule, DomainError,
    };

    fn event(action: GhPullRequestAction, base: &str, draft: bool) -> GhPullRequestEvent {
        GhPullRequestEvent {
            action,
            number: 7,
            pull_request: GhPullRequest {
                id: 107,
                number: 7,
                title: "Add boosters".into(),
                draft,
                head: GhBranch {
                    reference: "feature".into(),
                    sha: "abc".into(),
                },
                base: GhBranch {
                    reference: base.into(),
                    sha: "def".into(),
                },
                ..Default::default()
            },
            repository: GhRepository {
                id: 1,
                name: "rocket".into(),
                full_name: "acme/rocket".into(),
                owner: GhUser {
                    login: "acme".into(),
                    ..Default::default()
                },
                ..Default::default()
            },
            installation: None,
        }
    }

    fn expected_path() -> Option<LedgerPath> {
        Some(LedgerPath::PullRequest {
            component_id: 1,
            pull_request_id: 107,
        })
    }

    #[tokio::test]
    async fn eligible_actions_register() {
        for action in [
            GhPullRequestAction::Opened,
            GhPullRequestAction::Reopened,
            GhPullRequestAction::ReadyForReview,
            GhPullRequestAction::Synchronize,
            GhPullRequestAction::Edited,
        ] {
            let mut ctx = CoreContextTest::new();
            ctx.with_component().await;

            let mut register_or_update = MockRegisterOrUpdatePullRequestInterface::new();
            register_or_update
                .expect_run()
                .once()
                .withf(|_, component, upstream_pr| component.id == 1 && upstream_pr.id == 107)
                .return_once(|_, _, _| Ok(UpsertOutcome::Created(PullRequestRecord::default())));

            ctx.core_module = CoreModule::builder()
                .with_component_override::<dyn RegisterOrUpdatePullRequestInterface>(Box::new(
                    register_or_update,
                ))
                .build();

            assert_eq!(
                ProcessPullRequestEvent
                    .run(&ctx.as_context(), event(action, "staging", false))
                    .await
                    .unwrap(),
                expected_path()
            );
        }
    }

    #[tokio::test]
    async fn ineligible_openings_are_skipped() {
        let ctx = CoreContextTest::new();
        ctx.with_component().await;

        for (base, draft) in [("staging", true), ("feature/other", false)] {
            assert_eq!(
                ProcessPullRequestEvent
                    .run(
                        &ctx.as_context(),
                        event(GhPullRequestAction::Opened, base, draft)
                    )
                    .await
                    .unwrap(),
                None
            );
        }

        assert!(ctx
            .ledger
            .pull_requests_list(1, &Default::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn disqualifying_actions() {
        for (action, base) in [
            (GhPullRequestAction::Edited, "feature/other"),
            (GhPullRequestAction::Closed, "staging"),
            (GhPullRequestAction::ConvertedToDraft, "staging"),
        ] {
            let mut ctx = CoreContextTest::new();
            ctx.with_component().await;

            let mut disqualify = MockDisqualifyPullRequestInterface::new();
            disqualify
                .expect_run()
                .once()
                .withf(|_, component_id, pull_request_id| {
                    component_id == &1 && pull_request_id == &107
                })
                .return_once(|_, _, _| Ok(true));

            ctx.core_module = CoreModule::builder()
                .with_component_override::<dyn DisqualifyPullRequestInterface>(Box::new(
                    disqualify,
                ))
                .build();

            assert_eq!(
                ProcessPullRequestEvent
                    .run(&ctx.as_context(), event(action, base, false))
                    .await
                    .unwrap(),
                expected_path()
            );
        }
    }

    #[tokio::test]
    async fn redelivered_opening_keeps_one_record() {
        let ctx = CoreContextTest::new();
        ctx.with_component().await;

        for _ in 0..2 {
            ProcessPullRequestEvent
                .run(
                    &ctx.as_context(),
                    event(GhPullRequestAction::Opened, "staging", false),
                )
                .await
                .unwrap();
        }

        let records = ctx
            .ledger
            .pull_requests_list(1, &Default::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 107);
    }

    #[tokio::test]
    async fn closing_removes_the_record() {
        let ctx = CoreContextTest::new();
        ctx.with_component().await;

        ProcessPullRequestEvent
            .run(
                &ctx.as_context(),
                event(GhPullRequestAction::Opened, "main", false),
            )
            .await
            .unwrap();
        ProcessPullRequestEvent
            .run(
                &ctx.as_context(),
                event(GhPullRequestAction::Closed, "main", false),
            )
            .await
            .unwrap();

        assert_eq!(ctx.ledger.pull_requests_get(1, 107).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_component() {
        let ctx = CoreContextTest::new();

        assert!(matches!(
            ProcessPullRequestEvent
                .run(
                    &ctx.as_context(),
                    event(GhPullRequestAction::Opened, "staging", false),
                )
                .await,
            Err(DomainError::UnknownComponent { component_id: 1 })
        ));
    }

    #[tokio::test]
    async fn other_actions_are_ignored() {
        let ctx = CoreContextTest::new();
        ctx.with_component().await;

        assert_eq!(
            ProcessPullRequestEvent
                .run(
                    &ctx.as_context(),
                    event(GhPullRequestAction::Other, "staging", false),
                )
                .await
                .unwrap(),
            None
        );
    }
}
