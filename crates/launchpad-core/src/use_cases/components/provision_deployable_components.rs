use async_trait::async_trait;
use futures::future::join_all;
use launchpad_ghapi_interface::types::GhRepository;
use launchpad_models::{DeployableComponent, LedgerPath};
use shaku::{Component, Interface};
use tracing::{info, warn};

use crate::{CoreContext, Result};

/// Create a deployable component for each repository of an installation.
///
/// Repositories settle independently. Existing components are left untouched.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProvisionDeployableComponentsInterface: Interface {
    /// Only repositories listed in `repository_ids` are provisioned, when given.
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        installation_id: u64,
        repository_ids: Option<Vec<u64>>,
    ) -> Result<Vec<LedgerPath>>;
}

#[derive(Component)]
#[shaku(interface = ProvisionDeployableComponentsInterface)]
pub(crate) struct ProvisionDeployableComponents;

#[async_trait]
impl ProvisionDeployableComponentsInterface for ProvisionDeployableComponents {
    #[tracing::instrument(skip(self, ctx))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        installation_id: u64,
        repository_ids: Option<Vec<u64>>,
    ) -> Result<Vec<LedgerPath>> {
        let repositories = ctx
            .api_service
            .installation_repositories_list(installation_id)
            .await?
            .into_iter()
            .filter(|r| {
                repository_ids
                    .as_ref()
                    .map(|ids| ids.contains(&r.id))
                    .unwrap_or(true)
            });

        let outcomes = join_all(
            repositories.map(|repository| provision_repository(ctx, installation_id, repository)),
        )
        .await;

        Ok(outcomes.into_iter().flatten().collect())
    }
}

async fn provision_repository(
    ctx: &CoreContext<'_>,
    installation_id: u64,
    repository: GhRepository,
) -> Option<LedgerPath> {
    if repository.archived || repository.is_template {
        info!(repository = %repository.full_name, "Skipping archived or template repository");
        return None;
    }

    match ctx.ledger.components_get(repository.id).await {
        Ok(Some(_)) => return None,
        Ok(None) => (),
        Err(e) => {
            warn!(repository = %repository.full_name, error = %e, "Could not look up component");
            return None;
        }
    }

    let component = DeployableComponent {
        id: repository.id,
        name: repository.name,
        owner: repository.owner.login,
        full_name: repository.full_name,
        installation_id,
        production_branch: repository.default_branch,
        staging_branch: ctx.config.deployments.default_staging_branch.clone(),
        ..Default::default()
    };

    match ctx.ledger.components_create(component).await {
        Ok(component) => {
            info!(
                component_id = component.id,
                repository = %component.full_name,
                "Component provisioned"
            );
            Some(LedgerPath::Component {
                component_id: component.id,
            })
        }
        Err(e) => {
            warn!(component_id = repository.id, error = %e, "Could not provision component");
            None
        }
    }
}
