use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use launchpad_ledger_interface::{
    ensure_can_enqueue, ensure_transition, should_mark_enqueued, DeploymentFilter, LedgerChange,
    LedgerCollection, LedgerError, LedgerStore, PullRequestFilter, Result, Subscription,
    UpsertOutcome,
};
use launchpad_models::{
    DeployableComponent, Deployment, DeploymentState, DeploymentTarget, PullRequestRecord,
};
use time::OffsetDateTime;
use tokio::sync::broadcast;

const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct LedgerData {
    components: BTreeMap<u64, DeployableComponent>,
    pull_requests: BTreeMap<(u64, u64), PullRequestRecord>,
    deployments: BTreeMap<(u64, String), Deployment>,
}

impl LedgerData {
    fn component_deployments(&self, component_id: u64) -> impl Iterator<Item = &Deployment> {
        self.deployments
            .range((component_id, String::new())..)
            .take_while(move |((c, _), _)| *c == component_id)
            .map(|(_, d)| d)
    }

    fn list_pull_requests(
        &self,
        component_id: u64,
        filter: &PullRequestFilter,
    ) -> Vec<PullRequestRecord> {
        let mut values: Vec<_> = self
            .pull_requests
            .range((component_id, 0)..=(component_id, u64::MAX))
            .map(|(_, r)| r)
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        values.sort_by_key(|r| r.number);
        values
    }

    fn list_deployments(&self, component_id: u64, filter: &DeploymentFilter) -> Vec<Deployment> {
        let mut values: Vec<_> = self
            .component_deployments(component_id)
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        values.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        values
    }
}

/// In-memory ledger. Each transaction runs under a single write lock.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    data: Arc<RwLock<LedgerData>>,
    changes: broadcast::Sender<LedgerChange>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);

        Self {
            data: Arc::new(RwLock::new(LedgerData::default())),
            changes,
        }
    }

    fn notify(&self, component_id: u64, collection: LedgerCollection) {
        // No receiver is not an error.
        let _ = self
            .changes
            .send(LedgerChange::new(component_id, collection));
    }

    fn update_component<F>(&self, component_id: u64, f: F) -> Result<DeployableComponent>
    where
        F: FnOnce(&mut DeployableComponent),
    {
        let component = {
            let mut data = self.data.write().unwrap();
            let component = data
                .components
                .get_mut(&component_id)
                .ok_or(LedgerError::UnknownComponent(component_id))?;

            f(component);
            component.updated_at = OffsetDateTime::now_utc();
            component.clone()
        };

        self.notify(component_id, LedgerCollection::Components);
        Ok(component)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn components_create(
        &self,
        instance: DeployableComponent,
    ) -> Result<DeployableComponent> {
        {
            let mut data = self.data.write().unwrap();
            if data.components.contains_key(&instance.id) {
                return Err(LedgerError::ComponentAlreadyExists(instance.id));
            }

            data.components.insert(instance.id, instance.clone());
        }

        self.notify(instance.id, LedgerCollection::Components);
        Ok(instance)
    }

    async fn components_update(
        &self,
        instance: DeployableComponent,
    ) -> Result<DeployableComponent> {
        self.update_component(instance.id, |c| *c = instance.clone())
    }

    async fn components_get(&self, component_id: u64) -> Result<Option<DeployableComponent>> {
        Ok(self.data.read().unwrap().components.get(&component_id).cloned())
    }

    async fn components_all(&self) -> Result<Vec<DeployableComponent>> {
        Ok(self
            .data
            .read()
            .unwrap()
            .components
            .values()
            .cloned()
            .collect())
    }

    async fn components_set_branches(
        &self,
        component_id: u64,
        production_branch: &str,
        staging_branch: &str,
    ) -> Result<DeployableComponent> {
        self.update_component(component_id, |c| {
            c.production_branch = production_branch.into();
            c.staging_branch = staging_branch.into();
        })
    }

    async fn components_set_deploy_endpoint(
        &self,
        component_id: u64,
        target: DeploymentTarget,
        submit_deploy: &str,
    ) -> Result<DeployableComponent> {
        self.update_component(component_id, |c| {
            c.deploy_api.endpoint_mut(target).submit_deploy = submit_deploy.into();
        })
    }

    async fn pull_requests_upsert(&self, instance: PullRequestRecord) -> Result<UpsertOutcome> {
        let component_id = instance.component_id;
        let outcome = {
            let mut data = self.data.write().unwrap();
            if !data.components.contains_key(&component_id) {
                return Err(LedgerError::UnknownComponent(component_id));
            }

            let enqueued = should_mark_enqueued(instance.id, data.component_deployments(component_id));
            match data.pull_requests.get_mut(&(component_id, instance.id)) {
                Some(existing) => {
                    existing.head_commit = instance.head_commit;
                    existing.target_branch = instance.target_branch;
                    existing.title = instance.title;
                    existing.updated_at = OffsetDateTime::now_utc();
                    UpsertOutcome::Updated(existing.clone())
                }
                None => {
                    let now = OffsetDateTime::now_utc();
                    let record = PullRequestRecord {
                        enqueued,
                        created_at: now,
                        updated_at: now,
                        ..instance
                    };
                    data.pull_requests
                        .insert((component_id, record.id), record.clone());
                    UpsertOutcome::Created(record)
                }
            }
        };

        self.notify(component_id, LedgerCollection::PullRequests);
        Ok(outcome)
    }

    async fn pull_requests_get(
        &self,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<Option<PullRequestRecord>> {
        Ok(self
            .data
            .read()
            .unwrap()
            .pull_requests
            .get(&(component_id, pull_request_id))
            .cloned())
    }

    async fn pull_requests_list(
        &self,
        component_id: u64,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        Ok(self
            .data
            .read()
            .unwrap()
            .list_pull_requests(component_id, filter))
    }

    async fn pull_requests_delete(&self, component_id: u64, pull_request_id: u64) -> Result<bool> {
        let removed = self
            .data
            .write()
            .unwrap()
            .pull_requests
            .remove(&(component_id, pull_request_id))
            .is_some();

        if removed {
            self.notify(component_id, LedgerCollection::PullRequests);
        }

        Ok(removed)
    }

    async fn deployments_create(
        &self,
        instance: Deployment,
        exclusive_per_component: bool,
    ) -> Result<Deployment> {
        let component_id = instance.component_id;
        {
            let mut data = self.data.write().unwrap();
            let record = data
                .pull_requests
                .get(&(component_id, instance.pull_request_id()))
                .ok_or(LedgerError::UnknownPullRequest(
                    component_id,
                    instance.pull_request_id(),
                ))?;

            ensure_can_enqueue(
                record,
                data.component_deployments(component_id),
                &instance,
                exclusive_per_component,
            )?;

            if let Some(record) = data
                .pull_requests
                .get_mut(&(component_id, instance.pull_request_id()))
            {
                record.enqueued = true;
                record.updated_at = OffsetDateTime::now_utc();
            }

            data.deployments
                .insert((component_id, instance.id.clone()), instance.clone());
        }

        self.notify(component_id, LedgerCollection::Deployments);
        self.notify(component_id, LedgerCollection::PullRequests);
        Ok(instance)
    }

    async fn deployments_get(
        &self,
        component_id: u64,
        deployment_id: &str,
    ) -> Result<Option<Deployment>> {
        Ok(self
            .data
            .read()
            .unwrap()
            .deployments
            .get(&(component_id, deployment_id.to_string()))
            .cloned())
    }

    async fn deployments_list(
        &self,
        component_id: u64,
        filter: &DeploymentFilter,
    ) -> Result<Vec<Deployment>> {
        Ok(self
            .data
            .read()
            .unwrap()
            .list_deployments(component_id, filter))
    }

    async fn deployments_transition(
        &self,
        component_id: u64,
        deployment_id: &str,
        expected: DeploymentState,
        next: DeploymentState,
    ) -> Result<Deployment> {
        let (deployment, released) = {
            let mut data = self.data.write().unwrap();
            let deployment = data
                .deployments
                .get_mut(&(component_id, deployment_id.to_string()))
                .ok_or_else(|| LedgerError::UnknownDeployment(component_id, deployment_id.into()))?;

            ensure_transition(deployment, expected)?;
            deployment.state = next;
            deployment.updated_at = OffsetDateTime::now_utc();
            let deployment = deployment.clone();

            let mut released = false;
            if next.is_terminal() {
                if let Some(record) = data
                    .pull_requests
                    .get_mut(&(component_id, deployment.pull_request_id()))
                {
                    record.enqueued = false;
                    record.updated_at = deployment.updated_at;
                    released = true;
                }
            }

            (deployment, released)
        };

        self.notify(component_id, LedgerCollection::Deployments);
        if released {
            self.notify(component_id, LedgerCollection::PullRequests);
        }

        Ok(deployment)
    }

    fn changes(&self) -> broadcast::Receiver<LedgerChange> {
        self.changes.subscribe()
    }

    async fn subscribe_pull_requests(
        &self,
        component_id: u64,
        filter: PullRequestFilter,
    ) -> Result<Subscription<PullRequestRecord>> {
        let data = self.data.clone();
        Ok(Subscription::spawn(
            self.changes(),
            component_id,
            LedgerCollection::PullRequests,
            move || {
                let snapshot = data.read().unwrap().list_pull_requests(component_id, &filter);
                async move { Ok(snapshot) }
            },
        ))
    }

    async fn subscribe_deployments(
        &self,
        component_id: u64,
        filter: DeploymentFilter,
    ) -> Result<Subscription<Deployment>> {
        let data = self.data.clone();
        Ok(Subscription::spawn(
            self.changes(),
            component_id,
            LedgerCollection::Deployments,
            move || {
                let snapshot = data.read().unwrap().list_deployments(component_id, &filter);
                async move { Ok(snapshot) }
            },
        ))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
