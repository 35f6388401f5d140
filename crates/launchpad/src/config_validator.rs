//! Validation utilities.

use std::fmt::Write;

use launchpad_config::{ApiDriver, Config, LedgerDriver};
use launchpad_crypto::JwtUtils;
use thiserror::Error;

#[derive(Debug)]
enum ApiConfigError {
    MissingToken,
    MissingAppId,
    MissingPrivateKey,
    InvalidPrivateKey,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Errors on environment variables:\n{}", errors)]
    EnvVarsError { errors: String },
}

fn validate_env_vars(config: &Config, serving: bool) -> Result<(), ValidationError> {
    #[inline]
    fn _missing(error: &mut String, name: &str) {
        error.push('\n');
        let _ = write!(error, "  - Missing env. var.: {}", name);
    }

    #[inline]
    fn _invalid_key(error: &mut String, name: &str) {
        error.push('\n');
        let _ = write!(error, "  - Invalid private key: {}", name);
    }

    let mut error = String::new();

    if config.name.is_empty() {
        _missing(&mut error, "LAUNCHPAD_NAME");
    }

    // Server settings only matter when serving
    if serving {
        if config.server.bind_ip.is_empty() {
            _missing(&mut error, "LAUNCHPAD_SERVER_BIND_IP");
        }
        if config.server.bind_port == 0 {
            _missing(&mut error, "LAUNCHPAD_SERVER_BIND_PORT");
        }
        if !config.server.disable_webhook_signature && config.server.webhook_secret.is_empty() {
            _missing(&mut error, "LAUNCHPAD_SERVER_WEBHOOK_SECRET");
        }
    }

    // Check PG configuration
    if config.ledger.driver == LedgerDriver::Postgres && config.ledger.pg.url.is_empty() {
        _missing(&mut error, "LAUNCHPAD_LEDGER_PG_URL");
    }

    // Check API credentials: token or private key
    if config.api.driver == ApiDriver::GitHub {
        match validate_api_credentials(config) {
            Err(ApiConfigError::MissingToken) => {
                _missing(&mut error, "LAUNCHPAD_API_GITHUB_TOKEN");
            }
            Err(ApiConfigError::MissingAppId) => {
                _missing(&mut error, "LAUNCHPAD_API_GITHUB_APP_ID");
            }
            Err(ApiConfigError::InvalidPrivateKey) => {
                _invalid_key(&mut error, "LAUNCHPAD_API_GITHUB_APP_PRIVATE_KEY");
            }
            _ => (),
        }
    }

    if error.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::EnvVarsError { errors: error })
    }
}

fn validate_api_credentials(config: &Config) -> Result<(), ApiConfigError> {
    if config.api.github.token.is_empty() {
        match validate_github_app_config(config) {
            // Without a private key, a personal token is expected instead.
            Err(ApiConfigError::MissingPrivateKey) => Err(ApiConfigError::MissingToken),
            res => res,
        }
    } else {
        Ok(())
    }
}

fn validate_github_app_config(config: &Config) -> Result<(), ApiConfigError> {
    if config.api.github.app_private_key.is_empty() {
        Err(ApiConfigError::MissingPrivateKey)
    } else if JwtUtils::parse_encoding_key(&config.api.github.app_private_key).is_err() {
        Err(ApiConfigError::InvalidPrivateKey)
    } else if config.api.github.app_id == 0 {
        Err(ApiConfigError::MissingAppId)
    } else {
        Ok(())
    }
}

/// Validate configuration, including server settings when `serving`.
pub fn validate_configuration(config: &Config, serving: bool) -> Result<(), ValidationError> {
    validate_env_vars(config, serving)
}
