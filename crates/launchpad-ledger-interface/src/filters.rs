use launchpad_models::{Deployment, DeploymentState, DeploymentTarget, PullRequestRecord};

/// Pull request query. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFilter {
    pub target_branch: Option<String>,
    pub enqueued: Option<bool>,
}

impl PullRequestFilter {
    pub fn matches(&self, record: &PullRequestRecord) -> bool {
        self.target_branch
            .as_ref()
            .map_or(true, |b| &record.target_branch == b)
            && self.enqueued.map_or(true, |e| record.enqueued == e)
    }
}

/// Deployment query. An empty state list matches every state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentFilter {
    pub target: Option<DeploymentTarget>,
    pub states: Vec<DeploymentState>,
}

impl DeploymentFilter {
    pub fn matches(&self, deployment: &Deployment) -> bool {
        self.target.map_or(true, |t| deployment.target == t)
            && (self.states.is_empty() || self.states.contains(&deployment.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_filter() {
        let record = PullRequestRecord {
            target_branch: "staging".into(),
            ..Default::default()
        };

        assert!(PullRequestFilter::default().matches(&record));
        assert!(PullRequestFilter {
            target_branch: Some("staging".into()),
            enqueued: Some(false),
        }
        .matches(&record));
        assert!(!PullRequestFilter {
            target_branch: Some("main".into()),
            enqueued: None,
        }
        .matches(&record));
    }

    #[test]
    fn deployment_filter() {
        let deployment = Deployment {
            target: DeploymentTarget::Staging,
            state: DeploymentState::NeedsQa,
            ..Default::default()
        };

        assert!(DeploymentFilter {
            target: Some(DeploymentTarget::Staging),
            states: DeploymentState::ACTIVE.to_vec(),
        }
        .matches(&deployment));
        assert!(!DeploymentFilter {
            target: Some(DeploymentTarget::Production),
            states: vec![],
        }
        .matches(&deployment));
        assert!(!DeploymentFilter {
            target: None,
            states: DeploymentState::HISTORY.to_vec(),
        }
        .matches(&deployment));
    }
}
