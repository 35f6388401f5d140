use std::{io::Write, sync::Arc};

use clap::Parser;
use launchpad_config::Config;
use launchpad_core::CoreModule;
use launchpad_ghapi_interface::MockApiService;
use launchpad_ledger_interface::LedgerStore;
use launchpad_ledger_memory::MemoryLedger;
use launchpad_models::{DeployableComponent, PullRequestRecord, RepositoryPath};
use tokio::sync::RwLock;

use crate::{
    args::{Args, CommandExecutor},
    commands::CommandContext,
    Result,
};

pub(crate) struct CommandContextTest {
    pub config: Config,
    pub core_module: CoreModule,
    pub api_service: MockApiService,
    pub ledger: MemoryLedger,
}

impl CommandContextTest {
    pub fn new() -> Self {
        Self {
            config: Config::from_env_no_version(),
            core_module: CoreModule::builder().build(),
            ledger: MemoryLedger::new(),
            api_service: MockApiService::new(),
        }
    }

    pub fn into_context(self, writer: Arc<RwLock<dyn Write + Send + Sync>>) -> CommandContext {
        CommandContext {
            config: self.config,
            core_module: self.core_module,
            ledger: Box::new(self.ledger),
            api_service: Box::new(self.api_service),
            writer,
        }
    }

    /// Register `acme/rocket` (id 1, branches `main` and `staging`).
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

async fn run_command(ctx: CommandContextTest, command_args: &[&str]) -> (Result<()>, String) {
    let buf = Arc::new(RwLock::new(Vec::new()));

    let result = {
        let command_args = {
            let mut tmp_args = vec!["launchpad"];
            tmp_args.extend(command_args);
            tmp_args
        };

        let args = Args::try_parse_from(command_args);
        match args {
            Ok(args) => {
                CommandExecutor::parse_args_async(args, ctx.into_context(buf.clone())).await
            }
            Err(e) => {
                eprintln!("{}", e);
                panic!("Parse error.")
            }
        }
    };

    let vec = buf.read().await.to_vec();
    (result, std::str::from_utf8(&vec).unwrap().to_string())
}

pub(crate) async fn test_command(ctx: CommandContextTest, command_args: &[&str]) -> String {
    let (result, output) = run_command(ctx, command_args).await;
    result.unwrap();
    output
}

pub(crate) async fn test_command_error(ctx: CommandContextTest, command_args: &[&str]) -> String {
    let (result, _) = run_command(ctx, command_args).await;
    result.unwrap_err().to_string()
}
