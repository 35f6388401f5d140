//! Server module.

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error,
    http::Method,
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use launchpad_config::{ApiDriver, Config, LedgerDriver};
use launchpad_core::{CoreContext, CoreModule};
use launchpad_ghapi_interface::ApiService;
use launchpad_ghapi_null::NullApiService;
use launchpad_ledger_interface::LedgerStore;
use launchpad_ledger_memory::MemoryLedger;
use launchpad_ledger_pg::{establish_pool_connection, run_migrations, PostgresLedger};
use sentry_actix::Sentry;
use tracing::info;

use crate::{
    ghapi::MetricsApiService,
    health::health_check_route,
    judge::{judge_options_route, judge_route},
    metrics::build_metrics_handler,
    middlewares::VerifySignature,
    webhook::configure_webhook_handlers,
    Result, ServerError,
};

/// App context.
pub struct AppContext {
    /// Config.
    pub config: Config,
    /// Core module.
    pub core_module: CoreModule,
    /// Ledger store.
    pub ledger: Box<dyn LedgerStore>,
    /// API adapter.
    pub api_service: Box<dyn ApiService>,
}

impl AppContext {
    /// Create new app context, building drivers from configuration.
    pub async fn new(config: Config, core_module: CoreModule) -> Result<Self> {
        let ledger = build_ledger(&config).await?;
        let api_service = build_api_service(&config);

        Ok(Self::new_with_adapters(
            config,
            core_module,
            ledger,
            api_service,
        ))
    }

    /// Create new app context using adapters.
    pub fn new_with_adapters(
        config: Config,
        core_module: CoreModule,
        ledger: Box<dyn LedgerStore>,
        api_service: Box<dyn ApiService>,
    ) -> Self {
        Self {
            config,
            core_module,
            ledger,
            api_service,
        }
    }

    /// Convert the context for the core module.
    pub fn as_core_context(&self) -> CoreContext {
        CoreContext {
            config: &self.config,
            core_module: &self.core_module,
            api_service: self.api_service.as_ref(),
            ledger: self.ledger.as_ref(),
        }
    }
}

/// Build the ledger store selected by configuration.
pub async fn build_ledger(config: &Config) -> Result<Box<dyn LedgerStore>> {
    match config.ledger.driver {
        LedgerDriver::Memory => {
            info!("Using MemoryLedger ledger driver");
            Ok(Box::new(MemoryLedger::new()))
        }
        LedgerDriver::Postgres => {
            info!("Using PostgresLedger ledger driver");
            let pool = establish_pool_connection(config)
                .await
                .map_err(|e| ServerError::LedgerError { source: e })?;
            run_migrations(&pool)
                .await
                .map_err(|e| ServerError::LedgerError { source: e })?;

            Ok(Box::new(PostgresLedger::new(pool)))
        }
    }
}

/// Build the code host API selected by configuration.
pub fn build_api_service(config: &Config) -> Box<dyn ApiService> {
    match config.api.driver {
        ApiDriver::GitHub => {
            info!("Using MetricsApiService API driver");
            Box::new(MetricsApiService::new(config.clone()))
        }
        ApiDriver::Null => {
            info!("Using NullApiService API driver");
            Box::new(NullApiService::new())
        }
    }
}

/// Build Actix app.
pub fn build_actix_app(
    context: Data<AppContext>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let prometheus = build_metrics_handler();

    App::new()
        .app_data(context.clone())
        .wrap(prometheus)
        .wrap(Sentry::new())
        .wrap(Logger::default())
        .service(
            web::scope("/webhooks")
                .wrap(VerifySignature::new(&context.config))
                .configure(configure_webhook_handlers),
        )
        .service(
            web::resource("/judge")
                .wrap(Cors::permissive())
                .route(web::post().to(judge_route))
                .route(web::method(Method::OPTIONS).to(judge_options_route)),
        )
        .route("/health", web::get().to(health_check_route))
        .route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({"message": "Welcome on launchpad!" }))
            }),
        )
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            // Display Bad Request response on invalid JSON data
            error::InternalError::from_response(
                "",
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": err.to_string()
                })),
            )
            .into()
        }))
}

/// Run server.
pub async fn run_server(context: AppContext) -> Result<()> {
    let address = get_bind_address(&context.config);

    info!(
        version = context.config.version,
        address = %address,
        message = "Starting launchpad server",
    );

    run_server_internal(address, context).await
}

fn get_bind_address(config: &Config) -> String {
    format!("{}:{}", config.server.bind_ip, config.server.bind_port)
}

async fn run_server_internal(ip_with_port: String, context: AppContext) -> Result<()> {
    let context = Data::new(context);
    let cloned_context = context.clone();

    let mut server = HttpServer::new(move || build_actix_app(context.clone()));

    if let Some(workers) = cloned_context.config.server.workers_count {
        server = server.workers(workers as usize);
    }

    server
        .bind(ip_with_port)
        .map_err(|e| ServerError::IoError { source: e })?
        .run()
        .await
        .map_err(|e| ServerError::IoError { source: e })
}
