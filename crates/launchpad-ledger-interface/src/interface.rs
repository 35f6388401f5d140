use async_trait::async_trait;
use launchpad_models::{
    DeployableComponent, Deployment, DeploymentState, DeploymentTarget, PullRequestRecord,
};
use tokio::sync::broadcast;

use crate::{
    DeploymentFilter, LedgerChange, LedgerError, PullRequestFilter, Result, Subscription,
};

/// Result of a keyed pull request write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(PullRequestRecord),
    Updated(PullRequestRecord),
}

impl UpsertOutcome {
    pub fn record(&self) -> &PullRequestRecord {
        match self {
            Self::Created(r) | Self::Updated(r) => r,
        }
    }

    pub fn into_record(self) -> PullRequestRecord {
        match self {
            Self::Created(r) | Self::Updated(r) => r,
        }
    }
}

/// Transactional document store holding components and their
/// `pull-requests` and `deployments` sub-collections.
///
/// Every committed mutation is published on the change feed.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn components_create(&self, instance: DeployableComponent)
        -> Result<DeployableComponent>;
    async fn components_update(&self, instance: DeployableComponent)
        -> Result<DeployableComponent>;
    async fn components_get(&self, component_id: u64) -> Result<Option<DeployableComponent>>;
    async fn components_get_expect(&self, component_id: u64) -> Result<DeployableComponent> {
        self.components_get(component_id)
            .await?
            .ok_or(LedgerError::UnknownComponent(component_id))
    }
    async fn components_all(&self) -> Result<Vec<DeployableComponent>>;
    async fn components_set_branches(
        &self,
        component_id: u64,
        production_branch: &str,
        staging_branch: &str,
    ) -> Result<DeployableComponent>;
    async fn components_set_deploy_endpoint(
        &self,
        component_id: u64,
        target: DeploymentTarget,
        submit_deploy: &str,
    ) -> Result<DeployableComponent>;

    /// Create or patch a record keyed by its pull request id, in one transaction.
    ///
    /// A created record is `enqueued` only if a non-terminal deployment already
    /// references it. An update only patches `head_commit`, `target_branch`,
    /// `title` and `updated_at`.
    async fn pull_requests_upsert(&self, instance: PullRequestRecord) -> Result<UpsertOutcome>;
    async fn pull_requests_get(
        &self,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<Option<PullRequestRecord>>;
    async fn pull_requests_get_expect(
        &self,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<PullRequestRecord> {
        self.pull_requests_get(component_id, pull_request_id)
            .await?
            .ok_or(LedgerError::UnknownPullRequest(component_id, pull_request_id))
    }
    async fn pull_requests_list(
        &self,
        component_id: u64,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>>;
    async fn pull_requests_delete(&self, component_id: u64, pull_request_id: u64) -> Result<bool>;

    /// Insert an `ENQUEUED` deployment and flag its pull request, in one transaction.
    async fn deployments_create(
        &self,
        instance: Deployment,
        exclusive_per_component: bool,
    ) -> Result<Deployment>;
    async fn deployments_get(
        &self,
        component_id: u64,
        deployment_id: &str,
    ) -> Result<Option<Deployment>>;
    async fn deployments_get_expect(
        &self,
        component_id: u64,
        deployment_id: &str,
    ) -> Result<Deployment> {
        self.deployments_get(component_id, deployment_id)
            .await?
            .ok_or_else(|| LedgerError::UnknownDeployment(component_id, deployment_id.into()))
    }
    async fn deployments_list(
        &self,
        component_id: u64,
        filter: &DeploymentFilter,
    ) -> Result<Vec<Deployment>>;
    /// Compare-and-set the deployment state.
    ///
    /// Reaching a terminal state clears the pull request `enqueued` flag.
    async fn deployments_transition(
        &self,
        component_id: u64,
        deployment_id: &str,
        expected: DeploymentState,
        next: DeploymentState,
    ) -> Result<Deployment>;

    /// Raw change feed.
    fn changes(&self) -> broadcast::Receiver<LedgerChange>;

    /// Live snapshots of a component's pull requests.
    async fn subscribe_pull_requests(
        &self,
        component_id: u64,
        filter: PullRequestFilter,
    ) -> Result<Subscription<PullRequestRecord>>;

    /// Live snapshots of a component's deployments.
    async fn subscribe_deployments(
        &self,
        component_id: u64,
        filter: DeploymentFilter,
    ) -> Result<Subscription<Deployment>>;

    async fn health_check(&self) -> Result<()>;
}
