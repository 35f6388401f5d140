use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerCollection {
    Components,
    PullRequests,
    Deployments,
}

/// Notification emitted after a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerChange {
    pub component_id: u64,
    pub collection: LedgerCollection,
}

impl LedgerChange {
    pub fn new(component_id: u64, collection: LedgerCollection) -> Self {
        Self {
            component_id,
            collection,
        }
    }
}
