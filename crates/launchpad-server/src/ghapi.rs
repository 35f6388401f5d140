//! GitHub Api wrappers.

use async_trait::async_trait;
use launchpad_config::Config;
use launchpad_ghapi_github::GithubApiService;
use launchpad_ghapi_interface::{
    types::{GhDeployabilityReport, GhRepository},
    ApiService, Result,
};

use crate::metrics::GITHUB_API_CALLS;

/// Counts every call made through the wrapped API service.
pub struct MetricsApiService<S = GithubApiService> {
    inner: S,
}

impl MetricsApiService {
    /// Wrap a GitHub service built from configuration.
    pub fn new(config: Config) -> Self {
        Self::wrap(GithubApiService::new(config))
    }
}

impl<S: ApiService> MetricsApiService<S> {
    /// Wrap any API service.
    pub fn wrap(inner: S) -> Self {
        Self { inner }
    }

    fn count(call: &str) {
        GITHUB_API_CALLS.with_label_values(&[call]).inc();
    }
}

#[async_trait]
impl<S: ApiService> ApiService for MetricsApiService<S> {
    async fn pull_request_deployability(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<GhDeployabilityReport> {
        Self::count("pull_request_deployability");
        self.inner
            .pull_request_deployability(owner, name, number)
            .await
    }

    async fn installation_repositories_list(
        &self,
        installation_id: u64,
    ) -> Result<Vec<GhRepository>> {
        Self::count("installation_repositories_list");
        self.inner
            .installation_repositories_list(installation_id)
            .await
    }

    async fn repository_installation_get(
        &self,
        auth_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<u64> {
        Self::count("repository_installation_get");
        self.inner
            .repository_installation_get(auth_token, owner, name)
            .await
    }

    async fn installations_create_token(
        &self,
        auth_token: &str,
        installation_id: u64,
    ) -> Result<String> {
        Self::count("installations_create_token");
        self.inner
            .installations_create_token(auth_token, installation_id)
            .await
    }
}
