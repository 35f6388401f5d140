//! Null driver for code host API.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use launchpad_ghapi_interface::{
    types::{GhDeployabilityReport, GhRepository},
    ApiService, Result,
};

/// Null API service.
///
/// Every pull request is reported with an unknown merge state, so nothing is ever deployable.
#[derive(Clone, Default)]
pub struct NullApiService {
    _private: (),
}

impl NullApiService {
    /// Build a null API service.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[async_trait]
impl ApiService for NullApiService {
    #[tracing::instrument(skip(self), ret)]
    async fn pull_request_deployability(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<GhDeployabilityReport> {
        Ok(GhDeployabilityReport::default())
    }

    #[tracing::instrument(skip(self), ret)]
    async fn installation_repositories_list(
        &self,
        installation_id: u64,
    ) -> Result<Vec<GhRepository>> {
        Ok(vec![])
    }

    #[tracing::instrument(skip(self, auth_token), ret)]
    async fn repository_installation_get(
        &self,
        auth_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<u64> {
        Ok(0)
    }

    #[tracing::instrument(skip(self, auth_token), ret)]
    async fn installations_create_token(
        &self,
        auth_token: &str,
        installation_id: u64,
    ) -> Result<String> {
        Ok(String::new())
    }
}
