use launchpad_config::Config;
use launchpad_ghapi_interface::ApiService;
use launchpad_ledger_interface::LedgerStore;

use crate::CoreModule;

pub struct CoreContext<'a> {
    pub config: &'a Config,
    pub core_module: &'a CoreModule,
    pub api_service: &'a (dyn ApiService + 'a),
    pub ledger: &'a (dyn LedgerStore + 'a),
}

#[cfg(any(test, feature = "testkit"))]
pub(crate) mod tests {
    use launchpad_config::Config;
    use launchpad_ghapi_interface::MockApiService;
    use launchpad_ledger_interface::LedgerStore;
    use launchpad_ledger_memory::MemoryLedger;
    use launchpad_models::{DeployableComponent, PullRequestRecord, RepositoryPath};

    use crate::{CoreContext, CoreModule};

    #[allow(dead_code)]
    pub struct CoreContextTest {
        pub config: Config,
        pub core_module: CoreModule,
        pub api_service: MockApiService,
        pub ledger: MemoryLedger,
    }

    impl CoreContextTest {
        #[allow(dead_code)]
        pub fn new() -> Self {
            Self {
                config: Config::from_env_no_version(),
                core_module: CoreModule::builder().build(),
                api_service: MockApiService::new(),
                ledger: MemoryLedger::new(),
            }
        }

        #[allow(dead_code)]
        pub fn as_context(&self) -> CoreContext {
            CoreContext {
                config: &self.config,
                core_module: &self.core_module,
                api_service: &self.api_service,
                ledger: &self.ledger,
            }
        }

        /// Register `acme/rocket` (id 1, branches `main` and `staging`).
        #[allow(dead_code)]
        pub async fn with_component(&self) -> DeployableComponent {
            self.ledger
                .components_create(DeployableComponent {
                    id: 1,
                    owner: "acme".into(),
                    name: "rocket".into(),
                    full_name: "acme/rocket".into(),
                    ..Default::default()
                })
                .await
                .unwrap()
        }

        #[allow(dead_code)]
        pub async fn with_pull_request(&self, id: u64, target_branch: &str) -> PullRequestRecord {
            self.ledger
                .pull_requests_upsert(PullRequestRecord {
                    id,
                    component_id: 1,
                    number: id - 100,
                    title: format!("Change {id}"),
                    target_branch: target_branch.into(),
                    repo: RepositoryPath::new("acme", "rocket"),
                    ..Default::default()
                })
                .await
                .unwrap()
                .into_record()
        }
    }
}
