use async_trait::async_trait;
use launchpad_ghapi_interface::types::{
    GhInstallationAction, GhInstallationEvent, GhInstallationRepositoriesAction,
    GhInstallationRepositoriesEvent,
};
use launchpad_models::LedgerPath;
use shaku::{Component, HasComponent, Interface};

use super::ProvisionDeployableComponentsInterface;
use crate::{CoreContext, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessInstallationEventInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhInstallationEvent,
    ) -> Result<Vec<LedgerPath>>;
}

#[derive(Component)]
#[shaku(interface = ProcessInstallationEventInterface)]
pub(crate) struct ProcessInstallationEvent;

#[async_trait]
impl ProcessInstallationEventInterface for ProcessInstallationEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            action = ?event.action,
            installation_id = event.installation.id,
            account = %event.installation.account.login
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhInstallationEvent,
    ) -> Result<Vec<LedgerPath>> {
        match event.action {
            GhInstallationAction::Created => {
                let provision: &dyn ProvisionDeployableComponentsInterface =
                    ctx.core_module.resolve_ref();
                provision.run(ctx, event.installation.id, None).await
            }
            // Components are never removed automatically.
            GhInstallationAction::Deleted | GhInstallationAction::Other => Ok(vec![]),
        }
    }
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ProcessInstallationRepositoriesEventInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhInstallationRepositoriesEvent,
    ) -> Result<Vec<LedgerPath>>;
}

#[derive(Component)]
#[shaku(interface = ProcessInstallationRepositoriesEventInterface)]
pub(crate) struct ProcessInstallationRepositoriesEvent;

#[async_trait]
impl ProcessInstallationRepositoriesEventInterface for ProcessInstallationRepositoriesEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            action = ?event.action,
            installation_id = event.installation.id,
            added = event.repositories_added.len()
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        event: GhInstallationRepositoriesEvent,
    ) -> Result<Vec<LedgerPath>> {
        match event.action {
            GhInstallationRepositoriesAction::Added => {
                let provision: &dyn ProvisionDeployableComponentsInterface =
                    ctx.core_module.resolve_ref();
                let repository_ids = event.repositories_added.iter().map(|r| r.id).collect();
                provision
                    .run(ctx, event.installation.id, Some(repository_ids))
                    .await
            }
            GhInstallationRepositoriesAction::Removed | GhInstallationRepositoriesAction::Other => {
                Ok(vec![])
            }
        }
    }
}
