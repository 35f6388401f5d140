//! Checks shared by every ledger driver, run inside their transactions.

use launchpad_models::{Deployment, DeploymentState, PullRequestRecord};

use crate::{LedgerError, Result};

/// Whether a freshly (re)created record must carry the `enqueued` flag.
pub fn should_mark_enqueued<'a, I>(pull_request_id: u64, deployments: I) -> bool
where
    I: IntoIterator<Item = &'a Deployment>,
{
    deployments
        .into_iter()
        .any(|d| d.pull_request_id() == pull_request_id && !d.state.is_terminal())
}

/// Reject a new deployment if its pull request is already being deployed,
/// or, in exclusive mode, if its component is busy on the same target.
pub fn ensure_can_enqueue<'a, I>(
    record: &PullRequestRecord,
    deployments: I,
    candidate: &Deployment,
    exclusive_per_component: bool,
) -> Result<()>
where
    I: IntoIterator<Item = &'a Deployment>,
{
    if record.enqueued {
        return Err(LedgerError::PullRequestAlreadyEnqueued(
            record.component_id,
            record.id,
        ));
    }

    for existing in deployments {
        if existing.state.is_terminal() {
            continue;
        }

        if existing.pull_request_id() == record.id {
            return Err(LedgerError::PullRequestAlreadyEnqueued(
                record.component_id,
                record.id,
            ));
        }

        if exclusive_per_component
            && existing.state.is_active()
            && existing.target == candidate.target
        {
            return Err(LedgerError::ComponentBusy {
                component_id: record.component_id,
                target: candidate.target,
                deployment_id: existing.id.clone(),
            });
        }
    }

    Ok(())
}

/// Compare-and-set guard on a deployment state.
pub fn ensure_transition(deployment: &Deployment, expected: DeploymentState) -> Result<()> {
    if deployment.state == expected {
        Ok(())
    } else {
        Err(LedgerError::DeploymentStateConflict {
            deployment_id: deployment.id.clone(),
            expected,
            current: deployment.state,
        })
    }
}
