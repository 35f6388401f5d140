//! Ping webhook handlers.

use actix_web::HttpResponse;
use launchpad_ghapi_interface::types::GhPingEvent;
use tracing::info;

use super::parse_event_type;
use crate::{errors::Result, event_type::EventType};

pub(crate) fn parse_ping_event(body: &str) -> Result<GhPingEvent> {
    parse_event_type(EventType::Ping, body)
}

pub(crate) fn ping_event(event: GhPingEvent) -> HttpResponse {
    info!(
        hook_id = event.hook_id,
        zen = event.zen,
        message = "Ping event"
    );

    HttpResponse::Ok().json(serde_json::json!({"message": "Ping."}))
}
