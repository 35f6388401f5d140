use actix_web::web::Data;
use launchpad_config::Config;
use launchpad_core::CoreModule;
use launchpad_crypto::WebhookSignature;
use launchpad_ghapi_interface::MockApiService;
use launchpad_ledger_interface::LedgerStore;
use launchpad_ledger_memory::MemoryLedger;
use launchpad_models::DeployableComponent;

use crate::server::AppContext;

pub(crate) const WEBHOOK_SECRET: &str = "iAmAsEcReTkEy";

/// Context backed by a memory ledger holding `acme/rocket` (id 1).
pub(crate) async fn test_context(api_service: MockApiService) -> Data<AppContext> {
    let mut config = Config::from_env_no_version();
    config.server.webhook_secret = WEBHOOK_SECRET.into();
    config.server.disable_webhook_signature = false;

    let ledger = MemoryLedger::new();
    ledger
        .components_create(DeployableComponent {
            id: 1,
            owner: "acme".into(),
            name: "rocket".into(),
            full_name: "acme/rocket".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    Data::new(AppContext::new_with_adapters(
        config,
        CoreModule::builder().build(),
        Box::new(ledger),
        Box::new(api_service),
    ))
}

pub(crate) fn sign(body: &str) -> String {
    WebhookSignature::sign(body.as_bytes(), WEBHOOK_SECRET).unwrap()
}
