//! Webhook handlers.

mod installations;
mod ping;
mod pulls;


use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use tracing::info;

use self::{
    installations::{parse_installation_event, parse_installation_repositories_event},
    ping::parse_ping_event,
    pulls::parse_pull_request_event,
};
use crate::{
    constants::{GITHUB_DELIVERY_HEADER, GITHUB_EVENT_HEADER},
    event_type::EventType,
    metrics::WEBHOOK_EVENTS,
    server::AppContext,
    utils::collect_body,
    Result, ServerError,
};

async fn parse_event(
    ctx: &AppContext,
    event_type: EventType,
    body: &str,
) -> Result<HttpResponse> {
    match event_type {
        EventType::Installation => {
            installations::installation_event(ctx, parse_installation_event(body)?).await
        }
        EventType::InstallationRepositories => {
            installations::installation_repositories_event(
                ctx,
                parse_installation_repositories_event(body)?,
            )
            .await
        }
        EventType::Ping => Ok(ping::ping_event(parse_ping_event(body)?)),
        EventType::PullRequest => {
            pulls::pull_request_event(ctx, parse_pull_request_event(body)?).await
        }
    }
}

fn parse_event_type<'de, T>(event_type: EventType, body: &'de str) -> Result<T>
where
    T: Deserialize<'de>,
{
    serde_json::from_str(body).map_err(|e| ServerError::EventParseError {
        event_type,
        source: e,
    })
}

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|x| x.to_str().ok())
}

#[tracing::instrument(skip_all, fields(event_type, delivery_id))]
pub(crate) async fn event_handler(
    req: HttpRequest,
    payload: web::Payload,
    ctx: web::Data<AppContext>,
) -> ActixResult<HttpResponse> {
    let span = tracing::Span::current();
    if let Some(delivery_id) = header_value(&req, GITHUB_DELIVERY_HEADER) {
        span.record("delivery_id", delivery_id);
    }

    let Some(event_name) = header_value(&req, GITHUB_EVENT_HEADER) else {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"error": "Missing event type."})));
    };
    span.record("event_type", event_name);

    let Ok(event_type) = event_name.parse::<EventType>() else {
        info!(event_type = event_name, message = "Ignoring unsupported event");
        return Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Ignored event."})));
    };

    WEBHOOK_EVENTS.with_label_values(&[event_type.to_str()]).inc();

    let body = collect_body(payload).await?;
    if let Ok(body) = std::str::from_utf8(&body) {
        parse_event(&ctx, event_type, body).await.map_err(Into::into)
    } else {
        Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Bad payload for event '{}'.", event_type)
        })))
    }
}

/// Configure webhook handlers.
pub fn configure_webhook_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(event_handler)));
}
