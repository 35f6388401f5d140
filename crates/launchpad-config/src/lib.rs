//! Config module.

mod drivers;

use std::{env, str::FromStr};

pub use drivers::{ApiDriver, DriverError, LedgerDriver};

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Ledger driver.
    pub driver: LedgerDriver,
    /// Postgres options.
    pub pg: LedgerPgConfig,
}

#[derive(Debug, Clone)]
pub struct LedgerPgConfig {
    /// Database URL.
    pub url: String,
    /// Database pool size.
    pub pool_size: u32,
    /// Database connection timeout (in seconds)
    pub connection_timeout: u32,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API driver.
    pub driver: ApiDriver,
    /// Timeout for one deployability judgment (in milliseconds).
    pub judge_timeout: u64,
    /// GitHub options.
    pub github: ApiGitHubConfig,
}

#[derive(Debug, Clone)]
pub struct ApiGitHubConfig {
    /// GitHub API connect timeout.
    pub connect_timeout: u64,
    /// GitHub API root URL.
    pub root_url: String,
    /// GitHub API personal token.
    pub token: String,
    /// GitHub App ID.
    pub app_id: u64,
    /// GitHub App private key.
    pub app_private_key: String,
}

#[derive(Debug, Clone)]
pub struct DeploymentsConfig {
    /// Only allow one active deployment per component and target.
    pub exclusive_per_component: bool,
    /// Staging branch given to newly provisioned components.
    pub default_staging_branch: String,
}

#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry URL.
    pub url: String,
    /// Traces sample rate (between 0 and 1) for Sentry
    pub traces_sample_rate: f32,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Use bunyan logging.
    pub use_bunyan: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind IP.
    pub bind_ip: String,
    /// Server bind port.
    pub bind_port: u16,
    /// Server workers count.
    pub workers_count: Option<u16>,
    /// Server webhook secret.
    pub webhook_secret: String,
    /// Disable webhook signature verification.
    pub disable_webhook_signature: bool,
}

/// Launchpad configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instance name.
    pub name: String,
    /// Ledger options.
    pub ledger: LedgerConfig,
    /// API options.
    pub api: ApiConfig,
    /// Deployment options.
    pub deployments: DeploymentsConfig,
    /// Logging options.
    pub logging: LoggingConfig,
    /// Sentry options.
    pub sentry: SentryConfig,
    /// Server options.
    pub server: ServerConfig,
    /// App version
    pub version: String,
}

impl Config {
    /// Create configuration from environment.
    pub fn from_env(version: String) -> Config {
        Config {
            name: env_to_str("LAUNCHPAD_NAME", "launchpad"),
            ledger: LedgerConfig {
                driver: LedgerDriver::from_str(&env_to_str("LAUNCHPAD_LEDGER_DRIVER", "memory"))
                    .unwrap_or(LedgerDriver::Memory),
                pg: LedgerPgConfig {
                    url: env_to_str("LAUNCHPAD_LEDGER_PG_URL", ""),
                    pool_size: env_to_u32("LAUNCHPAD_LEDGER_PG_POOL_SIZE", 20),
                    connection_timeout: env_to_u32("LAUNCHPAD_LEDGER_PG_CONNECTION_TIMEOUT", 5),
                },
            },
            api: ApiConfig {
                driver: ApiDriver::from_str(&env_to_str("LAUNCHPAD_API_DRIVER", "github"))
                    .unwrap_or(ApiDriver::GitHub),
                judge_timeout: env_to_u64("LAUNCHPAD_API_JUDGE_TIMEOUT", 10_000),
                github: ApiGitHubConfig {
                    connect_timeout: env_to_u64("LAUNCHPAD_API_GITHUB_CONNECT_TIMEOUT", 5000),
                    root_url: env_to_str(
                        "LAUNCHPAD_API_GITHUB_ROOT_URL",
                        "https://api.github.com",
                    ),
                    token: env_to_str("LAUNCHPAD_API_GITHUB_TOKEN", ""),
                    app_id: env_to_u64("LAUNCHPAD_API_GITHUB_APP_ID", 0),
                    app_private_key: env_to_str("LAUNCHPAD_API_GITHUB_APP_PRIVATE_KEY", ""),
                },
            },
            deployments: DeploymentsConfig {
                exclusive_per_component: env_to_bool(
                    "LAUNCHPAD_DEPLOYMENTS_EXCLUSIVE_PER_COMPONENT",
                    false,
                ),
                default_staging_branch: env_to_str(
                    "LAUNCHPAD_DEPLOYMENTS_DEFAULT_STAGING_BRANCH",
                    "staging",
                ),
            },
            logging: LoggingConfig {
                use_bunyan: env_to_bool("LAUNCHPAD_LOGGING_USE_BUNYAN", false),
            },
            sentry: SentryConfig {
                url: env_to_str("LAUNCHPAD_SENTRY_URL", ""),
                traces_sample_rate: env_to_f32("LAUNCHPAD_SENTRY_TRACES_SAMPLE_RATE", 0.0),
            },
            server: ServerConfig {
                bind_ip: env_to_str("LAUNCHPAD_SERVER_BIND_IP", "127.0.0.1"),
                bind_port: env_to_u16("LAUNCHPAD_SERVER_BIND_PORT", 8008),
                workers_count: env_to_optional_u16("LAUNCHPAD_SERVER_WORKERS_COUNT", None),
                webhook_secret: env_to_str("LAUNCHPAD_SERVER_WEBHOOK_SECRET", ""),
                disable_webhook_signature: env_to_bool(
                    "LAUNCHPAD_SERVER_DISABLE_WEBHOOK_SIGNATURE",
                    false,
                ),
            },
            version,
        }
    }

    pub fn from_env_no_version() -> Self {
        Self::from_env("0.0.0".into())
    }
}

fn env_to_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_optional_u16(name: &str, default: Option<u16>) -> Option<u16> {
    env::var(name)
        .map(|e| e.parse::<u16>().map(Some).unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|e| matches!(&e.to_lowercase()[..], "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_to_str(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_e| default.to_string())
        .replace("\\n", "\n")
}
