use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use time::OffsetDateTime;

use crate::{DeploymentTarget, RepositoryPath};

/// Endpoint a deploy request is submitted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployEndpoint {
    pub submit_deploy: String,
}

/// Per-environment deploy endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployApi {
    pub production: DeployEndpoint,
    pub staging: DeployEndpoint,
}

impl DeployApi {
    pub fn endpoint(&self, target: DeploymentTarget) -> &DeployEndpoint {
        match target {
            DeploymentTarget::Production => &self.production,
            DeploymentTarget::Staging => &self.staging,
        }
    }

    pub fn endpoint_mut(&mut self, target: DeploymentTarget) -> &mut DeployEndpoint {
        match target {
            DeploymentTarget::Production => &mut self.production,
            DeploymentTarget::Staging => &mut self.staging,
        }
    }
}

/// A code repository registered for deployments.
#[derive(Debug, Clone, SmartDefault, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployableComponent {
    /// Code host repository id.
    pub id: u64,
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub installation_id: u64,
    #[default("main".into())]
    pub production_branch: String,
    #[default("staging".into())]
    pub staging_branch: String,
    pub deploy_api: DeployApi,
    #[default(OffsetDateTime::now_utc())]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[default(OffsetDateTime::now_utc())]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl DeployableComponent {
    pub fn repository_path(&self) -> RepositoryPath {
        RepositoryPath::new(&self.owner, &self.name)
    }

    pub fn branch_for(&self, target: DeploymentTarget) -> &str {
        match target {
            DeploymentTarget::Production => &self.production_branch,
            DeploymentTarget::Staging => &self.staging_branch,
        }
    }

    /// Target served by a branch. Production wins when both branches are equal.
    pub fn target_for_branch(&self, branch: &str) -> Option<DeploymentTarget> {
        if branch == self.production_branch {
            Some(DeploymentTarget::Production)
        } else if branch == self.staging_branch {
            Some(DeploymentTarget::Staging)
        } else {
            None
        }
    }

    pub fn is_deployable_branch(&self, branch: &str) -> bool {
        self.target_for_branch(branch).is_some()
    }
}
