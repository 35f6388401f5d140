use launchpad_ledger_interface::DeploymentFilter;
use launchpad_models::{DeployableComponent, Deployment, DeploymentState, DeploymentTarget};

use super::{fanout::Fanout, ObservedView};
use crate::{CoreContext, Result};

type ObservedKey = (Vec<u64>, DeploymentTarget, Vec<DeploymentState>);

/// Live list of the deployments of a target, restricted to some states.
pub struct DeploymentObserver {
    fanout: Fanout<ObservedKey, Deployment, Deployment>,
}

impl DeploymentObserver {
    pub fn new() -> Self {
        Self {
            fanout: Fanout::new(),
        }
    }

    /// An empty `states` list observes every state.
    #[tracing::instrument(
        skip_all,
        fields(target = %target, components = components.len(), states = ?states)
    )]
    pub async fn observe(
        &mut self,
        ctx: &CoreContext<'_>,
        components: &[DeployableComponent],
        target: DeploymentTarget,
        states: &[DeploymentState],
    ) -> Result<()> {
        let ids: Vec<u64> = components.iter().map(|c| c.id).collect();
        if !self
            .fanout
            .reset((ids.clone(), target, states.to_vec()), ids)
        {
            return Ok(());
        }

        for component in components {
            let filter = DeploymentFilter {
                target: Some(target),
                states: states.to_vec(),
            };

            match ctx.ledger.subscribe_deployments(component.id, filter).await {
                Ok(subscription) => self.fanout.attach(component.id, subscription),
                Err(e) => {
                    self.fanout.clear();
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Wait for the next snapshot. Returns `false` when nothing is observed anymore.
    pub async fn changed(&mut self) -> bool {
        match self.fanout.next_snapshot().await {
            Some((component_id, deployments)) => {
                self.fanout.store(component_id, deployments);
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> ObservedView<Deployment> {
        self.fanout.view()
    }

    pub fn cancel(&mut self) {
        self.fanout.clear();
    }
}

impl Default for DeploymentObserver {
    fn default() -> Self {
        Self::new()
    }
}
