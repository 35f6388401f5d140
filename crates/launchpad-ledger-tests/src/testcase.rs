use futures::Future;
use launchpad_config::Config;
use launchpad_ledger_interface::LedgerStore;
use launchpad_ledger_memory::MemoryLedger;
use launchpad_ledger_pg::{
    create_db_url, establish_pool_connection, get_base_url, setup_test_db, teardown_test_db,
    PostgresLedger,
};
use tracing::info;

pub type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Run the same block against every ledger driver.
///
/// Postgres runs only when `LAUNCHPAD_LEDGER_PG_URL` is set.
pub async fn ledger_test_case<F, Fut>(test_name: &str, block: F)
where
    F: Fn(Box<dyn LedgerStore>) -> Fut,
    Fut: Future<Output = TestResult>,
{
    let mut config = Config::from_env_no_version();
    let full_name = format!("test-launchpad-{test_name}");

    {
        // In memory
        let ledger = Box::new(MemoryLedger::new());
        info!("running memory test {full_name} ...");
        block(ledger).await.unwrap();
    }

    if config.ledger.pg.url.is_empty() {
        info!("skipping postgres test {full_name}: no database configured");
        return;
    }

    {
        // Postgres
        let base_url = get_base_url(&config.ledger.pg.url);
        config.ledger.pg.url = create_db_url(&base_url, &full_name);
        config.ledger.pg.pool_size = 4;
        config.ledger.pg.connection_timeout = 5;

        setup_test_db(&base_url, &full_name).await.unwrap();

        let pool = establish_pool_connection(&config).await.unwrap();
        let ledger = Box::new(PostgresLedger::new(pool.clone()));
        info!("running postgres test {full_name} ...");
        block(ledger).await.unwrap();

        pool.close().await;
        teardown_test_db(&base_url, &full_name).await.unwrap();
    }
}
