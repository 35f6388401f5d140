//! GitHub API driver.
//!
//! Judging data comes from the GraphQL API, installations from the REST API.

#![warn(clippy::all)]

mod auth;
mod errors;
mod graphql;

use async_trait::async_trait;
pub use errors::GitHubError;
use launchpad_config::Config;
use launchpad_ghapi_interface::{
    types::{GhDeployabilityReport, GhRepository},
    ApiService, Result,
};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    auth::{
        build_github_url, get_anonymous_client_builder, get_authenticated_client_builder,
        TokenScope,
    },
    graphql::{DeployabilityVariables, GraphQlRequest, GraphQlResponse, DEPLOYABILITY_QUERY},
};

const REPOSITORIES_PER_PAGE: usize = 100;

/// GitHub API service implementation.
#[derive(Clone)]
pub struct GithubApiService {
    config: Config,
}

impl GithubApiService {
    /// Creates new GitHub API service.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn get_client(&self, scope: TokenScope<'_>) -> Result<Client, GitHubError> {
        get_authenticated_client_builder(&self.config, self, scope)
            .await?
            .build()
            .map_err(GitHubError::from)
    }

    fn build_url(&self, path: String) -> String {
        build_github_url(&self.config, path)
    }

    async fn fetch_deployability(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<GhDeployabilityReport, GitHubError> {
        let response = self
            .get_client(TokenScope::Repository { owner, name })
            .await?
            .post(&self.build_url("/graphql".into()))
            .json(&GraphQlRequest {
                query: DEPLOYABILITY_QUERY,
                variables: DeployabilityVariables {
                    owner,
                    name,
                    number,
                },
            })
            .send()
            .await?
            .error_for_status()?
            .json::<GraphQlResponse>()
            .await?;

        response.into_report(owner, name, number)
    }

    async fn fetch_installation_repositories(
        &self,
        installation_id: u64,
    ) -> Result<Vec<GhRepository>, GitHubError> {
        #[derive(Deserialize)]
        struct Response {
            repositories: Vec<GhRepository>,
        }

        let client = self
            .get_client(TokenScope::Installation(installation_id))
            .await?;

        let mut repositories = vec![];
        let mut page = 1;
        loop {
            let response = client
                .get(&self.build_url(format!(
                    "/installation/repositories?per_page={REPOSITORIES_PER_PAGE}&page={page}"
                )))
                .send()
                .await?
                .error_for_status()?
                .json::<Response>()
                .await?;

            let count = response.repositories.len();
            repositories.extend(response.repositories);
            if count < REPOSITORIES_PER_PAGE {
                break;
            }

            page += 1;
        }

        Ok(repositories)
    }

    async fn fetch_repository_installation(
        &self,
        auth_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<u64, GitHubError> {
        #[derive(Deserialize)]
        struct Response {
            id: u64,
        }

        let response = get_anonymous_client_builder(&self.config)
            .build()?
            .get(&self.build_url(format!("/repos/{owner}/{name}/installation")))
            .bearer_auth(auth_token)
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?;

        Ok(response.id)
    }

    async fn create_installation_token(
        &self,
        auth_token: &str,
        installation_id: u64,
    ) -> Result<String, GitHubError> {
        #[derive(Deserialize)]
        struct Response {
            token: String,
        }

        let response = get_anonymous_client_builder(&self.config)
            .build()?
            .post(&self.build_url(format!(
                "/app/installations/{installation_id}/access_tokens"
            )))
            .bearer_auth(auth_token)
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?;

        Ok(response.token)
    }
}

#[async_trait]
impl ApiService for GithubApiService {
    #[tracing::instrument(skip(self), ret)]
    async fn pull_request_deployability(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<GhDeployabilityReport> {
        self.fetch_deployability(owner, name, number)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self))]
    async fn installation_repositories_list(
        &self,
        installation_id: u64,
    ) -> Result<Vec<GhRepository>> {
        self.fetch_installation_repositories(installation_id)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self, auth_token), ret)]
    async fn repository_installation_get(
        &self,
        auth_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<u64> {
        self.fetch_repository_installation(auth_token, owner, name)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self, auth_token))]
    async fn installations_create_token(
        &self,
        auth_token: &str,
        installation_id: u64,
    ) -> Result<String> {
        self.create_installation_token(auth_token, installation_id)
            .await
            .map_err(Into::into)
    }
}
