use std::sync::Arc;

use clap::Parser;
use launchpad_config::Config;
use launchpad_core::CoreModule;
use launchpad_sentry::with_sentry_configuration;
use launchpad_server::server::{build_api_service, build_ledger};
use tokio::sync::RwLock;

use crate::{
    commands::{Command, CommandContext, SubCommand},
    Result,
};

#[derive(Parser)]
#[command(about = "Deployment ledger for GitHub pull requests", version = crate::build::PKG_VERSION)]
pub struct Args {
    #[command(subcommand)]
    cmd: SubCommand,
}

impl Args {
    /// The command runs the HTTP server.
    pub fn starts_server(&self) -> bool {
        matches!(self.cmd, SubCommand::Server(_))
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    pub fn parse_args(config: Config, args: Args) -> Result<()> {
        let sync = |config: Config, args: Args| async move {
            let ctx = CommandContext {
                ledger: build_ledger(&config).await?,
                api_service: build_api_service(&config),
                core_module: CoreModule::builder().build(),
                writer: Arc::new(RwLock::new(std::io::stdout())),
                config: config.clone(),
            };

            with_sentry_configuration(&config, || async {
                Self::parse_args_async(args, ctx).await
            })
            .await
        };

        actix_rt::System::with_tokio_rt(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap()
        })
        .block_on(sync(config, args))?;

        Ok(())
    }

    pub(crate) async fn parse_args_async(args: Args, ctx: CommandContext) -> Result<()> {
        args.cmd.execute(ctx).await
    }
}
