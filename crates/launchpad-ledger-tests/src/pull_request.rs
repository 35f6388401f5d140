use launchpad_ledger_interface::{LedgerError, PullRequestFilter, UpsertOutcome};
use launchpad_models::{DeployableComponent, PullRequestRecord};
use pretty_assertions::assert_eq;

use crate::testcase::ledger_test_case;

fn record(id: u64, number: u64) -> PullRequestRecord {
    PullRequestRecord {
        id,
        component_id: 1,
        number,
        title: format!("PR {number}"),
        head_commit: "abcdef".into(),
        target_branch: "staging".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn upsert_requires_component() {
    ledger_test_case("pull_request_upsert_unknown", |db| async move {
        assert!(matches!(
            db.pull_requests_upsert(record(100, 1)).await,
            Err(LedgerError::UnknownComponent(1))
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn upsert_is_idempotent() {
    ledger_test_case("pull_request_upsert_idempotent", |db| async move {
        db.components_create(DeployableComponent {
            id: 1,
            ..Default::default()
        })
        .await?;

        let first = db.pull_requests_upsert(record(100, 1)).await?;
        assert!(matches!(first, UpsertOutcome::Created(_)));
        assert!(!first.record().enqueued);

        let second = db.pull_requests_upsert(record(100, 1)).await?;
        assert!(matches!(second, UpsertOutcome::Updated(_)));
        assert_eq!(second.record().created_at, first.record().created_at);

        let all = db
            .pull_requests_list(1, &PullRequestFilter::default())
            .await?;
        assert_eq!(all.len(), 1);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn upsert_patches_and_keeps_flag() {
    ledger_test_case("pull_request_upsert_patch", |db| async move {
        db.components_create(DeployableComponent {
            id: 1,
            ..Default::default()
        })
        .await?;
        db.pull_requests_upsert(record(100, 1)).await?;

        // Only head, target branch and title are patched.
        let updated = db
            .pull_requests_upsert(PullRequestRecord {
                title: "Renamed".into(),
                head_commit: "123456".into(),
                target_branch: "main".into(),
                url: "ignored".into(),
                enqueued: true,
                ..record(100, 1)
            })
            .await?
            .into_record();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.head_commit, "123456");
        assert_eq!(updated.target_branch, "main");
        assert_eq!(updated.url, "");
        assert!(!updated.enqueued);
        assert_eq!(db.pull_requests_get_expect(1, 100).await?, updated);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn list_and_delete() {
    ledger_test_case("pull_request_list_delete", |db| async move {
        db.components_create(DeployableComponent {
            id: 1,
            ..Default::default()
        })
        .await?;
        db.pull_requests_upsert(record(200, 2)).await?;
        db.pull_requests_upsert(PullRequestRecord {
            target_branch: "main".into(),
            ..record(100, 1)
        })
        .await?;

        let numbers: Vec<_> = db
            .pull_requests_list(1, &PullRequestFilter::default())
            .await?
            .into_iter()
            .map(|r| r.number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);

        let staging = db
            .pull_requests_list(
                1,
                &PullRequestFilter {
                    target_branch: Some("staging".into()),
                    enqueued: Some(false),
                },
            )
            .await?;
        assert_eq!(staging.len(), 1);
        assert_eq!(staging[0].id, 200);

        assert!(db.pull_requests_delete(1, 200).await?);
        assert!(!db.pull_requests_delete(1, 200).await?);
        assert_eq!(db.pull_requests_get(1, 200).await?, None);
        assert!(matches!(
            db.pull_requests_get_expect(1, 200).await,
            Err(LedgerError::UnknownPullRequest(1, 200))
        ));

        Ok(())
    })
    .await;
}
