use launchpad_ledger_interface::LedgerError;
use launchpad_models::{DeployableComponent, DeploymentTarget};
use pretty_assertions::assert_eq;

use crate::testcase::ledger_test_case;

#[tokio::test]
async fn create() {
    ledger_test_case("component_create", |db| async move {
        let component = db
            .components_create(DeployableComponent {
                id: 1,
                owner: "acme".into(),
                name: "rocket".into(),
                ..Default::default()
            })
            .await?;

        assert_eq!(db.components_get_expect(1).await?, component);
        assert!(matches!(
            db.components_create(component.clone()).await,
            Err(LedgerError::ComponentAlreadyExists(1))
        ));
        assert_eq!(db.components_all().await?, vec![component]);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn get_unknown() {
    ledger_test_case("component_get_unknown", |db| async move {
        assert_eq!(db.components_get(1).await?, None);
        assert!(matches!(
            db.components_get_expect(1).await,
            Err(LedgerError::UnknownComponent(1))
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn configure() {
    ledger_test_case("component_configure", |db| async move {
        assert!(matches!(
            db.components_set_branches(1, "main", "develop").await,
            Err(LedgerError::UnknownComponent(1))
        ));

        db.components_create(DeployableComponent {
            id: 1,
            ..Default::default()
        })
        .await?;

        let component = db.components_set_branches(1, "master", "develop").await?;
        assert_eq!(component.production_branch, "master");
        assert_eq!(component.staging_branch, "develop");

        let component = db
            .components_set_deploy_endpoint(
                1,
                DeploymentTarget::Staging,
                "https://deploy.example.com/staging",
            )
            .await?;
        assert_eq!(
            component.deploy_api.staging.submit_deploy,
            "https://deploy.example.com/staging"
        );
        assert_eq!(db.components_get_expect(1).await?, component);

        Ok(())
    })
    .await;
}
