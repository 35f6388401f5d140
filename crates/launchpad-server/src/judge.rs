//! Deployability query endpoint.

use actix_web::{web, HttpResponse};
use launchpad_core::use_cases::pulls::JudgePullRequestInterface;
use launchpad_models::{PullRequestDescriptor, PullRequestState};
use serde::Serialize;
use shaku::HasComponent;

use crate::{server::AppContext, Result};

#[derive(Debug, Serialize)]
struct JudgeResponse {
    deployable: bool,
    state: PullRequestState,
}

#[tracing::instrument(skip_all, fields(descriptor = %descriptor.0))]
pub(crate) async fn judge_route(
    ctx: web::Data<AppContext>,
    descriptor: web::Json<PullRequestDescriptor>,
) -> Result<HttpResponse> {
    let ctx = ctx.as_core_context();
    let judge: &dyn JudgePullRequestInterface = ctx.core_module.resolve_ref();
    let state = judge.run(&ctx, &descriptor).await?;

    Ok(HttpResponse::Ok().json(JudgeResponse {
        deployable: state.is_ready(),
        state,
    }))
}

pub(crate) async fn judge_options_route() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
