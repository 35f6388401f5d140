use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use crate::{DeploymentState, DeploymentTarget, PullRequestRecord};

const DEPLOYMENT_ID_LENGTH: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOwner {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A requested deployment of a pull request.
#[derive(Debug, Clone, SmartDefault, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub component_id: u64,
    /// Copy of the ledger record taken at enqueue time.
    pub pull_request: PullRequestRecord,
    pub owner: DeploymentOwner,
    pub target: DeploymentTarget,
    pub state: DeploymentState,
    pub display_name: String,
    #[default(OffsetDateTime::now_utc())]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::now_utc())]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Deployment {
    /// Build a new `ENQUEUED` deployment for a pull request.
    pub fn enqueue(
        pull_request: &PullRequestRecord,
        owner: DeploymentOwner,
        target: DeploymentTarget,
    ) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id: Self::generate_id(),
            component_id: pull_request.component_id,
            pull_request: PullRequestRecord {
                enqueued: true,
                ..pull_request.clone()
            },
            owner,
            target,
            state: DeploymentState::Enqueued,
            display_name: format!("{} #{}", pull_request.repo.name, pull_request.number),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pull_request_id(&self) -> u64 {
        self.pull_request.id
    }

    fn generate_id() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(DEPLOYMENT_ID_LENGTH)
            .map(char::from)
            .collect()
    }
}
