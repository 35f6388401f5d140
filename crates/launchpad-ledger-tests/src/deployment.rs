use launchpad_ledger_interface::{DeploymentFilter, LedgerError, LedgerStore, PullRequestFilter};
use launchpad_models::{
    DeployableComponent, Deployment, DeploymentOwner, DeploymentState, DeploymentTarget,
    PullRequestRecord, RepositoryPath,
};
use pretty_assertions::assert_eq;

use crate::testcase::{ledger_test_case, TestResult};

async fn arrange(db: &dyn LedgerStore) -> Result<PullRequestRecord, LedgerError> {
    db.components_create(DeployableComponent {
        id: 1,
        ..Default::default()
    })
    .await?;

    for (id, number) in [(100, 1), (200, 2)] {
        db.pull_requests_upsert(PullRequestRecord {
            id,
            component_id: 1,
            number,
            repo: RepositoryPath::new("acme", "rocket"),
            target_branch: "staging".into(),
            ..Default::default()
        })
        .await?;
    }

    db.pull_requests_get_expect(1, 100).await
}

fn deployment(record: &PullRequestRecord) -> Deployment {
    Deployment::enqueue(
        record,
        DeploymentOwner {
            id: "u1".into(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
        },
        DeploymentTarget::Staging,
    )
}

async fn assert_enqueued(db: &dyn LedgerStore, pull_request_id: u64, value: bool) -> TestResult {
    assert_eq!(
        db.pull_requests_get_expect(1, pull_request_id)
            .await?
            .enqueued,
        value
    );
    Ok(())
}

#[tokio::test]
async fn create_flags_pull_request() {
    ledger_test_case("deployment_create", |db| async move {
        let record = arrange(db.as_ref()).await?;

        let created = db.deployments_create(deployment(&record), false).await?;
        assert_eq!(created.state, DeploymentState::Enqueued);
        assert_eq!(db.deployments_get_expect(1, &created.id).await?, created);
        assert_enqueued(db.as_ref(), 100, true).await?;

        assert!(matches!(
            db.deployments_create(deployment(&record), false).await,
            Err(LedgerError::PullRequestAlreadyEnqueued(1, 100))
        ));
        assert_eq!(
            db.deployments_list(1, &DeploymentFilter::default())
                .await?
                .len(),
            1
        );

        // Enqueued records are hidden from the eligible listing.
        let eligible = db
            .pull_requests_list(
                1,
                &PullRequestFilter {
                    enqueued: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 200);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn create_unknown_pull_request() {
    ledger_test_case("deployment_create_unknown", |db| async move {
        arrange(db.as_ref()).await?;

        let ghost = PullRequestRecord {
            id: 999,
            component_id: 1,
            ..Default::default()
        };
        assert!(matches!(
            db.deployments_create(deployment(&ghost), false).await,
            Err(LedgerError::UnknownPullRequest(1, 999))
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn concurrent_creates_only_one_wins() {
    ledger_test_case("deployment_create_race", |db| async move {
        let record = arrange(db.as_ref()).await?;

        let (a, b) = tokio::join!(
            db.deployments_create(deployment(&record), false),
            db.deployments_create(deployment(&record), false)
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(LedgerError::PullRequestAlreadyEnqueued(1, 100)))));
        assert_eq!(
            db.deployments_list(1, &DeploymentFilter::default())
                .await?
                .len(),
            1
        );

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn exclusive_per_component() {
    ledger_test_case("deployment_create_exclusive", |db| async move {
        let record = arrange(db.as_ref()).await?;
        let other = db.pull_requests_get_expect(1, 200).await?;

        db.deployments_create(deployment(&record), true).await?;
        assert!(matches!(
            db.deployments_create(deployment(&other), true).await,
            Err(LedgerError::ComponentBusy { component_id: 1, .. })
        ));
        db.deployments_create(deployment(&other), false).await?;

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn transition_compare_and_set() {
    ledger_test_case("deployment_transition", |db| async move {
        let record = arrange(db.as_ref()).await?;
        let created = db.deployments_create(deployment(&record), false).await?;

        let moved = db
            .deployments_transition(
                1,
                &created.id,
                DeploymentState::Enqueued,
                DeploymentState::Deploying,
            )
            .await?;
        assert_eq!(moved.state, DeploymentState::Deploying);
        assert!(moved.updated_at >= created.updated_at);

        assert!(matches!(
            db.deployments_transition(
                1,
                &created.id,
                DeploymentState::Enqueued,
                DeploymentState::Deploying,
            )
            .await,
            Err(LedgerError::DeploymentStateConflict {
                current: DeploymentState::Deploying,
                ..
            })
        ));
        assert_eq!(
            db.deployments_get_expect(1, &created.id).await?.state,
            DeploymentState::Deploying
        );
        assert_enqueued(db.as_ref(), 100, true).await?;

        assert!(matches!(
            db.deployments_transition(
                1,
                "missing",
                DeploymentState::Enqueued,
                DeploymentState::Deploying,
            )
            .await,
            Err(LedgerError::UnknownDeployment(1, _))
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn terminal_transition_releases_pull_request() {
    ledger_test_case("deployment_transition_terminal", |db| async move {
        let record = arrange(db.as_ref()).await?;
        let created = db.deployments_create(deployment(&record), false).await?;

        for (from, to) in [
            (DeploymentState::Enqueued, DeploymentState::Deploying),
            (DeploymentState::Deploying, DeploymentState::NeedsQa),
            (DeploymentState::NeedsQa, DeploymentState::Shipped),
            (DeploymentState::Shipped, DeploymentState::RollingBack),
        ] {
            db.deployments_transition(1, &created.id, from, to).await?;
            assert_enqueued(db.as_ref(), 100, true).await?;
        }

        db.deployments_transition(
            1,
            &created.id,
            DeploymentState::RollingBack,
            DeploymentState::Reverted,
        )
        .await?;
        assert_enqueued(db.as_ref(), 100, false).await?;

        // History stays, and the pull request can be deployed again.
        db.deployments_create(deployment(&record), false).await?;
        let history = db
            .deployments_list(
                1,
                &DeploymentFilter {
                    target: Some(DeploymentTarget::Staging),
                    states: DeploymentState::HISTORY.to_vec(),
                },
            )
            .await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state, DeploymentState::Reverted);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn reregistered_pull_request_keeps_flag() {
    ledger_test_case("deployment_reregister", |db| async move {
        let record = arrange(db.as_ref()).await?;
        let created = db.deployments_create(deployment(&record), false).await?;

        // Disqualified then registered again while the deployment is in flight.
        db.pull_requests_delete(1, 100).await?;
        db.pull_requests_upsert(PullRequestRecord {
            enqueued: false,
            ..record.clone()
        })
        .await?;
        assert_enqueued(db.as_ref(), 100, true).await?;

        // Terminal transition without a ledger record is still accepted.
        db.pull_requests_delete(1, 100).await?;
        db.deployments_transition(
            1,
            &created.id,
            DeploymentState::Enqueued,
            DeploymentState::Deploying,
        )
        .await?;
        let failed = db
            .deployments_transition(
                1,
                &created.id,
                DeploymentState::Deploying,
                DeploymentState::Failed,
            )
            .await?;
        assert_eq!(failed.state, DeploymentState::Failed);
        assert_eq!(db.pull_requests_get(1, 100).await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn reregister_racing_terminal_transition() {
    ledger_test_case("deployment_reregister_race", |db| async move {
        let record = arrange(db.as_ref()).await?;

        for _ in 0..5 {
            let created = db.deployments_create(deployment(&record), false).await?;
            db.deployments_transition(
                1,
                &created.id,
                DeploymentState::Enqueued,
                DeploymentState::Deploying,
            )
            .await?;
            db.pull_requests_delete(1, 100).await?;

            let (upserted, failed) = tokio::join!(
                db.pull_requests_upsert(PullRequestRecord {
                    enqueued: false,
                    ..record.clone()
                }),
                db.deployments_transition(
                    1,
                    &created.id,
                    DeploymentState::Deploying,
                    DeploymentState::Failed,
                )
            );
            upserted?;
            assert_eq!(failed?.state, DeploymentState::Failed);

            // Whichever side commits first, nothing is left in flight.
            assert_enqueued(db.as_ref(), 100, false).await?;
        }

        Ok(())
    })
    .await;
}
