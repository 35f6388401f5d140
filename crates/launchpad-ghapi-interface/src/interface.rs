use async_trait::async_trait;

use crate::{
    types::{GhDeployabilityReport, GhRepository},
    Result,
};

/// Code host API.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Fetch merge state, branch protection and last commit check runs of a pull request.
    async fn pull_request_deployability(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<GhDeployabilityReport>;
    /// List repositories reachable by an installation.
    async fn installation_repositories_list(&self, installation_id: u64)
        -> Result<Vec<GhRepository>>;
    /// Find the installation covering a repository.
    async fn repository_installation_get(
        &self,
        auth_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<u64>;
    /// Create an installation access token.
    async fn installations_create_token(
        &self,
        auth_token: &str,
        installation_id: u64,
    ) -> Result<String>;
}
