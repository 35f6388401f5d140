//! Pull webhook handlers.

use actix_web::HttpResponse;
use launchpad_core::{use_cases::pulls::ProcessPullRequestEventInterface, DomainError};
use launchpad_ghapi_interface::types::GhPullRequestEvent;
use shaku::HasComponent;
use tracing::info;

use super::parse_event_type;
use crate::{event_type::EventType, server::AppContext, Result};

pub(crate) fn parse_pull_request_event(body: &str) -> Result<GhPullRequestEvent> {
    parse_event_type(EventType::PullRequest, body)
}

#[tracing::instrument(skip_all, fields(
    action = ?event.action,
    repo_owner = event.repository.owner.login,
    repo_name = event.repository.name,
    pr_number = event.pull_request.number,
))]
pub(crate) async fn pull_request_event(
    ctx: &AppContext,
    event: GhPullRequestEvent,
) -> Result<HttpResponse> {
    let ctx = ctx.as_core_context();
    let process_pull_request_event: &dyn ProcessPullRequestEventInterface =
        ctx.core_module.resolve_ref();

    match process_pull_request_event.run(&ctx, event).await {
        Ok(path) => Ok(HttpResponse::Ok().json(serde_json::json!({ "path": path }))),
        Err(DomainError::UnknownComponent { component_id }) => {
            info!(
                component_id,
                message = "Repository is not a deployable component, skipping"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({ "path": null })))
        }
        Err(e) => Err(e.into()),
    }
}
