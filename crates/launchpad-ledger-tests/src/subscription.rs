use std::time::Duration;

use launchpad_ledger_interface::{DeploymentFilter, PullRequestFilter, Subscription};
use launchpad_models::{
    DeployableComponent, Deployment, DeploymentOwner, DeploymentState, DeploymentTarget,
    PullRequestRecord,
};
use pretty_assertions::assert_eq;

use crate::testcase::ledger_test_case;

const WAIT: Duration = Duration::from_secs(5);

async fn next<T: Send + 'static>(sub: &mut Subscription<T>) -> Vec<T> {
    tokio::time::timeout(WAIT, sub.next())
        .await
        .expect("snapshot in time")
        .expect("open subscription")
}

fn record(id: u64, target_branch: &str) -> PullRequestRecord {
    PullRequestRecord {
        id,
        component_id: 1,
        number: id,
        target_branch: target_branch.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn pull_request_snapshots() {
    ledger_test_case("subscription_pull_requests", |db| async move {
        db.components_create(DeployableComponent {
            id: 1,
            ..Default::default()
        })
        .await?;
        db.pull_requests_upsert(record(1, "staging")).await?;

        let mut sub = db
            .subscribe_pull_requests(
                1,
                PullRequestFilter {
                    target_branch: Some("staging".into()),
                    enqueued: Some(false),
                },
            )
            .await?;
        assert_eq!(next(&mut sub).await.len(), 1);

        db.pull_requests_upsert(record(2, "staging")).await?;
        let ids: Vec<_> = next(&mut sub).await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);

        db.pull_requests_delete(1, 1).await?;
        let ids: Vec<_> = next(&mut sub).await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);

        sub.cancel();
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn deployment_snapshots() {
    ledger_test_case("subscription_deployments", |db| async move {
        db.components_create(DeployableComponent {
            id: 1,
            ..Default::default()
        })
        .await?;
        let record = db
            .pull_requests_upsert(record(1, "staging"))
            .await?
            .into_record();

        let mut sub = db
            .subscribe_deployments(
                1,
                DeploymentFilter {
                    target: Some(DeploymentTarget::Staging),
                    states: DeploymentState::ACTIVE.to_vec(),
                },
            )
            .await?;
        assert!(next(&mut sub).await.is_empty());

        let created = db
            .deployments_create(
                Deployment::enqueue(
                    &record,
                    DeploymentOwner::default(),
                    DeploymentTarget::Staging,
                ),
                false,
            )
            .await?;
        assert_eq!(next(&mut sub).await, vec![created.clone()]);

        db.deployments_transition(
            1,
            &created.id,
            DeploymentState::Enqueued,
            DeploymentState::Deploying,
        )
        .await?;
        db.deployments_transition(
            1,
            &created.id,
            DeploymentState::Deploying,
            DeploymentState::Failed,
        )
        .await?;

        // Snapshots may coalesce; the feed settles on an empty active list.
        let mut snapshot = next(&mut sub).await;
        while !snapshot.is_empty() {
            snapshot = next(&mut sub).await;
        }

        Ok(())
    })
    .await;
}
