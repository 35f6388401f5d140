//! Server middlewares.

#![allow(clippy::type_complexity)]

use std::{pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Bytes,
    Error, HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use launchpad_config::Config;
use launchpad_crypto::WebhookSignature;
use tracing::warn;

use crate::{constants::GITHUB_SIGNATURE_HEADER, utils::collect_body, ServerError};

#[derive(Clone)]
enum SignatureCheck {
    Disabled,
    Secret(Arc<str>),
}

impl SignatureCheck {
    fn from_config(config: &Config) -> Self {
        if config.server.disable_webhook_signature {
            warn!("Webhook signature verification is disabled, every payload will be trusted.");
            Self::Disabled
        } else if config.server.webhook_secret.is_empty() {
            warn!(
                "LAUNCHPAD_SERVER_WEBHOOK_SECRET is empty, webhook signature verification is disabled."
            );
            Self::Disabled
        } else {
            Self::Secret(config.server.webhook_secret.as_str().into())
        }
    }
}

/// Rejects webhook deliveries whose `X-Hub-Signature-256` does not match the shared secret.
pub struct VerifySignature {
    check: SignatureCheck,
}

impl VerifySignature {
    /// Build from the server configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            check: SignatureCheck::from_config(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for VerifySignature
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = VerifySignatureMiddleware<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(VerifySignatureMiddleware {
            check: self.check.clone(),
            service: Rc::new(service),
        })
    }
}

/// Service produced by [`VerifySignature`].
pub struct VerifySignatureMiddleware<S> {
    check: SignatureCheck,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for VerifySignatureMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let secret = match &self.check {
            SignatureCheck::Secret(secret) if req.method() == Method::POST => secret.clone(),
            _ => return Box::pin(self.service.call(req)),
        };
        let service = self.service.clone();

        Box::pin(async move {
            let body = verified_body(&mut req, &secret).await?;
            req.set_payload(replay_payload(body));

            service.call(req).await
        })
    }
}

async fn verified_body(req: &mut ServiceRequest, secret: &str) -> Result<Bytes, Error> {
    let signature = req
        .headers()
        .get(GITHUB_SIGNATURE_HEADER)
        .ok_or(ServerError::MissingWebhookSignature)?
        .to_str()
        .ok()
        .and_then(|header| WebhookSignature::from_header(header).ok())
        .ok_or(ServerError::InvalidWebhookSignature)?;

    let body = collect_body(req.take_payload()).await?;
    if matches!(signature.verify(&body, secret), Ok(true)) {
        Ok(body)
    } else {
        Err(ServerError::InvalidWebhookSignature.into())
    }
}

fn replay_payload(body: Bytes) -> Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(body);
    payload.into()
}
