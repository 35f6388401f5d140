//! Installation webhook handlers.

use actix_web::HttpResponse;
use launchpad_core::use_cases::components::{
    ProcessInstallationEventInterface, ProcessInstallationRepositoriesEventInterface,
};
use launchpad_ghapi_interface::types::{GhInstallationEvent, GhInstallationRepositoriesEvent};
use shaku::HasComponent;

use super::parse_event_type;
use crate::{event_type::EventType, server::AppContext, Result};

pub(crate) fn parse_installation_event(body: &str) -> Result<GhInstallationEvent> {
    parse_event_type(EventType::Installation, body)
}

pub(crate) fn parse_installation_repositories_event(
    body: &str,
) -> Result<GhInstallationRepositoriesEvent> {
    parse_event_type(EventType::InstallationRepositories, body)
}

#[tracing::instrument(skip_all, fields(
    action = ?event.action,
    installation_id = event.installation.id,
    account = event.installation.account.login,
))]
pub(crate) async fn installation_event(
    ctx: &AppContext,
    event: GhInstallationEvent,
) -> Result<HttpResponse> {
    let ctx = ctx.as_core_context();
    let process_installation_event: &dyn ProcessInstallationEventInterface =
        ctx.core_module.resolve_ref();
    let paths = process_installation_event.run(&ctx, event).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "paths": paths })))
}

#[tracing::instrument(skip_all, fields(
    action = ?event.action,
    installation_id = event.installation.id,
    added = event.repositories_added.len(),
))]
pub(crate) async fn installation_repositories_event(
    ctx: &AppContext,
    event: GhInstallationRepositoriesEvent,
) -> Result<HttpResponse> {
    let ctx = ctx.as_core_context();
    let process_installation_repositories_event: &dyn ProcessInstallationRepositoriesEventInterface =
        ctx.core_module.resolve_ref();
    let paths = process_installation_repositories_event
        .run(&ctx, event)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "paths": paths })))
}
