use std::fmt::Display;

use serde::Serialize;

/// Location of a document in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum LedgerPath {
    Component {
        component_id: u64,
    },
    PullRequest {
        component_id: u64,
        pull_request_id: u64,
    },
    Deployment {
        component_id: u64,
        deployment_id: String,
    },
}

impl Display for LedgerPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component { component_id } => write!(f, "deployable-components/{component_id}"),
            Self::PullRequest {
                component_id,
                pull_request_id,
            } => write!(
                f,
                "deployable-components/{component_id}/pull-requests/{pull_request_id}"
            ),
            Self::Deployment {
                component_id,
                deployment_id,
            } => write!(
                f,
                "deployable-components/{component_id}/deployments/{deployment_id}"
            ),
        }
    }
}

impl From<LedgerPath> for String {
    fn from(path: LedgerPath) -> Self {
        path.to_string()
    }
}
