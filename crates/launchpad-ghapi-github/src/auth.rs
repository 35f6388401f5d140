//! Auth.

use std::{collections::HashMap, time::Duration};

use http::{header, HeaderMap};
use launchpad_config::Config;
use launchpad_crypto::JwtUtils;
use launchpad_ghapi_interface::ApiService;
use lazy_static::lazy_static;
use reqwest::ClientBuilder;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::errors::GitHubError;

const INSTALLATION_TOKEN_LIFETIME_IN_SECONDS: u64 = 3600;
const INSTALLATION_TOKEN_RENEW_THRESHOLD: f32 = 0.5;
const APP_TOKEN_LIFETIME_IN_SECONDS: u64 = 60;

#[derive(Clone)]
struct InstallationToken {
    token: String,
    expiration: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    iat: u64,
    exp: u64,
    iss: u64,
}

lazy_static! {
    static ref INSTALLATION_TOKENS: RwLock<HashMap<u64, InstallationToken>> =
        RwLock::new(HashMap::new());
    static ref REPOSITORY_INSTALLATIONS: RwLock<HashMap<String, u64>> =
        RwLock::new(HashMap::new());
}

/// What a request needs access to.
#[derive(Debug, Clone, Copy)]
pub enum TokenScope<'a> {
    Installation(u64),
    Repository { owner: &'a str, name: &'a str },
}

/// Get an authenticated GitHub client builder.
pub async fn get_authenticated_client_builder(
    config: &Config,
    api_service: &dyn ApiService,
    scope: TokenScope<'_>,
) -> Result<ClientBuilder, GitHubError> {
    let builder = get_anonymous_client_builder(config);
    let token = get_authentication_credentials(config, api_service, scope).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| GitHubError::ImplementationError { source: e.into() })?,
    );

    Ok(builder.default_headers(headers))
}

/// Get anonymous GitHub client builder.
pub fn get_anonymous_client_builder(config: &Config) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/vnd.github+json"),
    );

    ClientBuilder::new()
        .connect_timeout(Duration::from_millis(config.api.github.connect_timeout))
        .user_agent(format!("launchpad/{}", config.version))
        .default_headers(headers)
}

/// Build a GitHub URL.
pub fn build_github_url<T: Into<String>>(config: &Config, path: T) -> String {
    format!("{}{}", config.api.github.root_url, path.into())
}

async fn get_authentication_credentials(
    config: &Config,
    api_service: &dyn ApiService,
    scope: TokenScope<'_>,
) -> Result<String, GitHubError> {
    if !config.api.github.token.is_empty() {
        return Ok(config.api.github.token.clone());
    }

    let installation_id = match scope {
        TokenScope::Installation(installation_id) => installation_id,
        TokenScope::Repository { owner, name } => {
            get_or_resolve_installation_id(config, api_service, owner, name).await?
        }
    };

    get_or_create_installation_access_token(config, api_service, installation_id).await
}

async fn get_or_resolve_installation_id(
    config: &Config,
    api_service: &dyn ApiService,
    owner: &str,
    name: &str,
) -> Result<u64, GitHubError> {
    let key = format!("{owner}/{name}");
    if let Some(installation_id) = REPOSITORY_INSTALLATIONS.read().await.get(&key) {
        return Ok(*installation_id);
    }

    let app_token = create_app_token(config)?;
    let installation_id = api_service
        .repository_installation_get(&app_token, owner, name)
        .await
        .map_err(|e| GitHubError::ImplementationError { source: e.into() })?;

    REPOSITORY_INSTALLATIONS
        .write()
        .await
        .insert(key, installation_id);
    Ok(installation_id)
}

async fn get_or_create_installation_access_token(
    config: &Config,
    api_service: &dyn ApiService,
    installation_id: u64,
) -> Result<String, GitHubError> {
    let last_token = INSTALLATION_TOKENS
        .read()
        .await
        .get(&installation_id)
        .cloned();

    let now_timestamp = now_timestamp();
    let renew_margin =
        (INSTALLATION_TOKEN_LIFETIME_IN_SECONDS as f32 * INSTALLATION_TOKEN_RENEW_THRESHOLD) as u64;

    match last_token {
        Some(last) if now_timestamp <= last.expiration.saturating_sub(renew_margin) => {
            Ok(last.token)
        }
        _ => {
            let token =
                create_installation_access_token(config, api_service, installation_id).await?;
            INSTALLATION_TOKENS.write().await.insert(
                installation_id,
                InstallationToken {
                    token: token.clone(),
                    expiration: now_timestamp + INSTALLATION_TOKEN_LIFETIME_IN_SECONDS,
                },
            );

            Ok(token)
        }
    }
}

fn now_timestamp() -> u64 {
    OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}

fn create_app_token(config: &Config) -> Result<String, GitHubError> {
    // https://docs.github.com/en/apps/creating-github-apps/authenticating-with-a-github-app/generating-a-json-web-token-jwt-for-a-github-app
    let now_ts = now_timestamp();
    let claims = JwtClaims {
        iat: now_ts,
        exp: now_ts + APP_TOKEN_LIFETIME_IN_SECONDS,
        iss: config.api.github.app_id,
    };

    JwtUtils::create_jwt(&config.api.github.app_private_key, &claims)
        .map_err(|e| GitHubError::ImplementationError { source: e.into() })
}

#[tracing::instrument(skip(config, api_service))]
async fn create_installation_access_token(
    config: &Config,
    api_service: &dyn ApiService,
    installation_id: u64,
) -> Result<String, GitHubError> {
    let auth_token = create_app_token(config)?;
    api_service
        .installations_create_token(&auth_token, installation_id)
        .await
        .map_err(|e| GitHubError::ImplementationError { source: e.into() })
}
