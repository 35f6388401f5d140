mod changes;
mod errors;
mod filters;
mod interface;
mod rules;
mod subscription;

pub use changes::{LedgerChange, LedgerCollection};
pub use errors::{LedgerError, Result};
pub use filters::{DeploymentFilter, PullRequestFilter};
pub use interface::{LedgerStore, UpsertOutcome};
pub use rules::{ensure_can_enqueue, ensure_transition, should_mark_enqueued};
pub use subscription::Subscription;
