use async_trait::async_trait;
use launchpad_ledger_interface::{
    ensure_can_enqueue, ensure_transition, should_mark_enqueued, DeploymentFilter, LedgerChange,
    LedgerCollection, LedgerError, LedgerStore, PullRequestFilter, Result, Subscription,
    UpsertOutcome,
};
use launchpad_models::{
    DeployableComponent, Deployment, DeploymentState, DeploymentTarget, PullRequestRecord,
};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{types::Json, PgConnection, PgPool};
use time::OffsetDateTime;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{listener::forward_notifications, CHANGES_CHANNEL};

const CHANGE_FEED_CAPACITY: usize = 256;

fn wrap(e: sqlx::Error) -> LedgerError {
    LedgerError::ImplementationError { source: e.into() }
}

fn encode<T: Serialize>(value: &T) -> Result<Json<serde_json::Value>> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| LedgerError::ImplementationError { source: e.into() })
}

fn decode<T: DeserializeOwned>(Json(value): Json<serde_json::Value>) -> Result<T> {
    serde_json::from_value(value).map_err(|e| LedgerError::ImplementationError { source: e.into() })
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Json<serde_json::Value>>) -> Result<Vec<T>> {
    rows.into_iter().map(decode).collect()
}

/// PostgreSQL ledger.
///
/// Documents are stored as JSONB. Read-modify-write operations lock the rows
/// they touch, and committed changes are published through `LISTEN/NOTIFY`.
pub struct PostgresLedger {
    pool: PgPool,
    changes: broadcast::Sender<LedgerChange>,
    listener: JoinHandle<()>,
}

impl PostgresLedger {
    /// Must be called within a Tokio runtime.
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        let listener = tokio::spawn(forward_notifications(pool.clone(), changes.clone()));

        Self {
            pool,
            changes,
            listener,
        }
    }

    async fn notify(
        conn: &mut PgConnection,
        component_id: u64,
        collection: LedgerCollection,
    ) -> Result<()> {
        let payload = serde_json::to_string(&LedgerChange::new(component_id, collection))
            .map_err(|e| LedgerError::ImplementationError { source: e.into() })?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGES_CHANNEL)
            .bind(payload)
            .execute(conn)
            .await
            .map_err(wrap)?;

        Ok(())
    }

    async fn fetch_pull_requests(
        pool: &PgPool,
        component_id: u64,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        let rows = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM pull_request
            WHERE component_id = $1
        "#,
        )
        .bind(component_id as i64)
        .fetch_all(pool)
        .await
        .map_err(wrap)?;

        let mut values: Vec<_> = decode_all::<PullRequestRecord>(rows)?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        values.sort_by_key(|r| r.number);
        Ok(values)
    }

    async fn fetch_deployments(
        conn: &mut PgConnection,
        component_id: u64,
    ) -> Result<Vec<Deployment>> {
        let rows = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM deployment
            WHERE component_id = $1
        "#,
        )
        .bind(component_id as i64)
        .fetch_all(conn)
        .await
        .map_err(wrap)?;

        let mut values: Vec<Deployment> = decode_all(rows)?;
        values.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(values)
    }

    async fn list_deployments(
        pool: &PgPool,
        component_id: u64,
        filter: &DeploymentFilter,
    ) -> Result<Vec<Deployment>> {
        let mut conn = pool.acquire().await.map_err(wrap)?;
        Ok(Self::fetch_deployments(&mut conn, component_id)
            .await?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect())
    }

    /// Returns `false` when the component does not exist.
    async fn lock_component(conn: &mut PgConnection, component_id: u64) -> Result<bool> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT id FROM deployable_component WHERE id = $1 FOR UPDATE")
                .bind(component_id as i64)
                .fetch_optional(conn)
                .await
                .map_err(wrap)?
                .is_some(),
        )
    }

    async fn lock_pull_request(
        conn: &mut PgConnection,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<Option<PullRequestRecord>> {
        sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM pull_request
            WHERE component_id = $1
            AND id = $2
            FOR UPDATE
        "#,
        )
        .bind(component_id as i64)
        .bind(pull_request_id as i64)
        .fetch_optional(conn)
        .await
        .map_err(wrap)?
        .map(decode)
        .transpose()
    }

    async fn write_pull_request(conn: &mut PgConnection, record: &PullRequestRecord) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE pull_request
            SET document = $3
            WHERE component_id = $1
            AND id = $2
        "#,
        )
        .bind(record.component_id as i64)
        .bind(record.id as i64)
        .bind(encode(record)?)
        .execute(conn)
        .await
        .map_err(wrap)?;

        Ok(())
    }

    async fn update_component<F>(&self, component_id: u64, f: F) -> Result<DeployableComponent>
    where
        F: FnOnce(&mut DeployableComponent) + Send,
    {
        let mut tx = self.pool.begin().await.map_err(wrap)?;

        let mut component: DeployableComponent = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM deployable_component
            WHERE id = $1
            FOR UPDATE
        "#,
        )
        .bind(component_id as i64)
        .fetch_optional(&mut *tx)
        .await
        .map_err(wrap)?
        .map(decode)
        .transpose()?
        .ok_or(LedgerError::UnknownComponent(component_id))?;

        f(&mut component);
        component.id = component_id;
        component.updated_at = OffsetDateTime::now_utc();

        sqlx::query("UPDATE deployable_component SET document = $2 WHERE id = $1")
            .bind(component_id as i64)
            .bind(encode(&component)?)
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;

        Self::notify(&mut tx, component_id, LedgerCollection::Components).await?;
        tx.commit().await.map_err(wrap)?;

        Ok(component)
    }
}

impl Drop for PostgresLedger {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[async_trait]
impl LedgerStore for PostgresLedger {
    async fn components_create(
        &self,
        instance: DeployableComponent,
    ) -> Result<DeployableComponent> {
        let mut tx = self.pool.begin().await.map_err(wrap)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO deployable_component (id, document)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
        "#,
        )
        .bind(instance.id as i64)
        .bind(encode(&instance)?)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?
        .rows_affected();

        if inserted == 0 {
            return Err(LedgerError::ComponentAlreadyExists(instance.id));
        }

        Self::notify(&mut tx, instance.id, LedgerCollection::Components).await?;
        tx.commit().await.map_err(wrap)?;

        Ok(instance)
    }

    async fn components_update(
        &self,
        instance: DeployableComponent,
    ) -> Result<DeployableComponent> {
        let component_id = instance.id;
        self.update_component(component_id, move |c| *c = instance)
            .await
    }

    async fn components_get(&self, component_id: u64) -> Result<Option<DeployableComponent>> {
        sqlx::query_scalar::<_, Json<serde_json::Value>>(
            "SELECT document FROM deployable_component WHERE id = $1",
        )
        .bind(component_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)?
        .map(decode)
        .transpose()
    }

    async fn components_all(&self) -> Result<Vec<DeployableComponent>> {
        let rows = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            "SELECT document FROM deployable_component ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(wrap)?;

        decode_all(rows)
    }

    async fn components_set_branches(
        &self,
        component_id: u64,
        production_branch: &str,
        staging_branch: &str,
    ) -> Result<DeployableComponent> {
        let production_branch = production_branch.to_string();
        let staging_branch = staging_branch.to_string();

        self.update_component(component_id, move |c| {
            c.production_branch = production_branch;
            c.staging_branch = staging_branch;
        })
        .await
    }

    async fn components_set_deploy_endpoint(
        &self,
        component_id: u64,
        target: DeploymentTarget,
        submit_deploy: &str,
    ) -> Result<DeployableComponent> {
        let submit_deploy = submit_deploy.to_string();

        self.update_component(component_id, move |c| {
            c.deploy_api.endpoint_mut(target).submit_deploy = submit_deploy;
        })
        .await
    }

    async fn pull_requests_upsert(&self, instance: PullRequestRecord) -> Result<UpsertOutcome> {
        let component_id = instance.component_id;
        let mut tx = self.pool.begin().await.map_err(wrap)?;

        // Terminal transitions take the same lock, so the flag below cannot go stale.
        if !Self::lock_component(&mut tx, component_id).await? {
            return Err(LedgerError::UnknownComponent(component_id));
        }

        let now = OffsetDateTime::now_utc();
        let deployments = Self::fetch_deployments(&mut tx, component_id).await?;
        let created = PullRequestRecord {
            enqueued: should_mark_enqueued(instance.id, &deployments),
            created_at: now,
            updated_at: now,
            ..instance.clone()
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO pull_request (component_id, id, document)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
        "#,
        )
        .bind(component_id as i64)
        .bind(instance.id as i64)
        .bind(encode(&created)?)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?
        .rows_affected();

        let outcome = if inserted == 1 {
            UpsertOutcome::Created(created)
        } else {
            let mut existing = Self::lock_pull_request(&mut tx, component_id, instance.id)
                .await?
                .ok_or(LedgerError::UnknownPullRequest(component_id, instance.id))?;

            existing.head_commit = instance.head_commit;
            existing.target_branch = instance.target_branch;
            existing.title = instance.title;
            existing.updated_at = now;
            Self::write_pull_request(&mut tx, &existing).await?;
            UpsertOutcome::Updated(existing)
        };

        Self::notify(&mut tx, component_id, LedgerCollection::PullRequests).await?;
        tx.commit().await.map_err(wrap)?;

        Ok(outcome)
    }

    async fn pull_requests_get(
        &self,
        component_id: u64,
        pull_request_id: u64,
    ) -> Result<Option<PullRequestRecord>> {
        sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM pull_request
            WHERE component_id = $1
            AND id = $2
        "#,
        )
        .bind(component_id as i64)
        .bind(pull_request_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)?
        .map(decode)
        .transpose()
    }

    async fn pull_requests_list(
        &self,
        component_id: u64,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        Self::fetch_pull_requests(&self.pool, component_id, filter).await
    }

    async fn pull_requests_delete(&self, component_id: u64, pull_request_id: u64) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(wrap)?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM pull_request
            WHERE component_id = $1
            AND id = $2
        "#,
        )
        .bind(component_id as i64)
        .bind(pull_request_id as i64)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?
        .rows_affected()
            > 0;

        if deleted {
            Self::notify(&mut tx, component_id, LedgerCollection::PullRequests).await?;
        }
        tx.commit().await.map_err(wrap)?;

        Ok(deleted)
    }

    async fn deployments_create(
        &self,
        instance: Deployment,
        exclusive_per_component: bool,
    ) -> Result<Deployment> {
        let component_id = instance.component_id;
        let pull_request_id = instance.pull_request_id();
        let mut tx = self.pool.begin().await.map_err(wrap)?;

        if exclusive_per_component {
            // Serialize enqueues of the whole component.
            Self::lock_component(&mut tx, component_id).await?;
        }

        let mut record = Self::lock_pull_request(&mut tx, component_id, pull_request_id)
            .await?
            .ok_or(LedgerError::UnknownPullRequest(component_id, pull_request_id))?;
        let deployments = Self::fetch_deployments(&mut tx, component_id).await?;
        ensure_can_enqueue(&record, &deployments, &instance, exclusive_per_component)?;

        sqlx::query(
            r#"
            INSERT INTO deployment (component_id, id, pull_request_id, document)
            VALUES ($1, $2, $3, $4)
        "#,
        )
        .bind(component_id as i64)
        .bind(&instance.id)
        .bind(pull_request_id as i64)
        .bind(encode(&instance)?)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?;

        record.enqueued = true;
        record.updated_at = OffsetDateTime::now_utc();
        Self::write_pull_request(&mut tx, &record).await?;

        Self::notify(&mut tx, component_id, LedgerCollection::Deployments).await?;
        Self::notify(&mut tx, component_id, LedgerCollection::PullRequests).await?;
        tx.commit().await.map_err(wrap)?;

        Ok(instance)
    }

    async fn deployments_get(
        &self,
        component_id: u64,
        deployment_id: &str,
    ) -> Result<Option<Deployment>> {
        sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM deployment
            WHERE component_id = $1
            AND id = $2
        "#,
        )
        .bind(component_id as i64)
        .bind(deployment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)?
        .map(decode)
        .transpose()
    }

    async fn deployments_list(
        &self,
        component_id: u64,
        filter: &DeploymentFilter,
    ) -> Result<Vec<Deployment>> {
        Self::list_deployments(&self.pool, component_id, filter).await
    }

    async fn deployments_transition(
        &self,
        component_id: u64,
        deployment_id: &str,
        expected: DeploymentState,
        next: DeploymentState,
    ) -> Result<Deployment> {
        let mut tx = self.pool.begin().await.map_err(wrap)?;

        // Component before deployment row, the order every writer follows.
        if next.is_terminal() {
            Self::lock_component(&mut tx, component_id).await?;
        }

        let mut deployment: Deployment = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT document
            FROM deployment
            WHERE component_id = $1
            AND id = $2
            FOR UPDATE
        "#,
        )
        .bind(component_id as i64)
        .bind(deployment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(wrap)?
        .map(decode)
        .transpose()?
        .ok_or_else(|| LedgerError::UnknownDeployment(component_id, deployment_id.into()))?;

        ensure_transition(&deployment, expected)?;
        deployment.state = next;
        deployment.updated_at = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            UPDATE deployment
            SET document = $3
            WHERE component_id = $1
            AND id = $2
        "#,
        )
        .bind(component_id as i64)
        .bind(deployment_id)
        .bind(encode(&deployment)?)
        .execute(&mut *tx)
        .await
        .map_err(wrap)?;
        Self::notify(&mut tx, component_id, LedgerCollection::Deployments).await?;

        if next.is_terminal() {
            let record =
                Self::lock_pull_request(&mut tx, component_id, deployment.pull_request_id())
                    .await?;

            if let Some(mut record) = record {
                record.enqueued = false;
                record.updated_at = deployment.updated_at;
                Self::write_pull_request(&mut tx, &record).await?;
                Self::notify(&mut tx, component_id, LedgerCollection::PullRequests).await?;
            }
        }

        tx.commit().await.map_err(wrap)?;

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
        let pool = self.pool.clone();
        Ok(Subscription::spawn(
            self.changes(),
            component_id,
            LedgerCollection::PullRequests,
            move || {
                let pool = pool.clone();
                let filter = filter.clone();
                async move { Self::fetch_pull_requests(&pool, component_id, &filter).await }
            },
        ))
    }

    async fn subscribe_deployments(
        &self,
        component_id: u64,
        filter: DeploymentFilter,
    ) -> Result<Subscription<Deployment>> {
        let pool = self.pool.clone();
        Ok(Subscription::spawn(
            self.changes(),
            component_id,
            LedgerCollection::Deployments,
            move || {
                let pool = pool.clone();
                let filter = filter.clone();
                async move { Self::list_deployments(&pool, component_id, &filter).await }
            },
        ))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1;")
            .execute(&self.pool)
            .await
            .map_err(wrap)?;

        Ok(())
    }
}
