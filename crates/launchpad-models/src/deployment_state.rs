use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentStateError {
    #[error("Unknown deployment state: {}", state)]
    UnknownDeploymentState { state: String },
    #[error("Unknown deployment action: {}", action)]
    UnknownDeploymentAction { action: String },
}

/// Deployment lifecycle state.
///
/// ```text
/// ENQUEUED -> DEPLOYING -> NEEDS_QA -> SHIPPED -> ROLLING_BACK -> REVERTED
///                      \-> FAILED    \-> REJECTED
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Hash, Copy, Clone, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    #[default]
    Enqueued,
    Deploying,
    NeedsQa,
    Shipped,
    Failed,
    Rejected,
    RollingBack,
    Reverted,
}

impl DeploymentState {
    /// States shown as in-flight.
    pub const ACTIVE: [DeploymentState; 4] = [
        Self::Enqueued,
        Self::Deploying,
        Self::NeedsQa,
        Self::RollingBack,
    ];

    /// States shown as history.
    pub const HISTORY: [DeploymentState; 4] =
        [Self::Shipped, Self::Failed, Self::Rejected, Self::Reverted];

    pub fn to_str(self) -> &'static str {
        self.into()
    }

    /// No action is defined from a terminal state.
    pub fn is_terminal(self) -> bool {
        match self {
            Self::Failed | Self::Rejected | Self::Reverted => true,
            Self::Enqueued | Self::Deploying | Self::NeedsQa | Self::Shipped | Self::RollingBack => {
                false
            }
        }
    }

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    /// Actions accepted from this state.
    pub fn available_actions(self) -> &'static [DeploymentAction] {
        match self {
            Self::Enqueued => &[DeploymentAction::Start],
            Self::Deploying => &[
                DeploymentAction::Complete,
                DeploymentAction::Fail,
                DeploymentAction::Cancel,
            ],
            Self::NeedsQa => &[DeploymentAction::Accept, DeploymentAction::Reject],
            Self::Shipped => &[DeploymentAction::Revert],
            Self::RollingBack => &[DeploymentAction::FinishRollback],
            Self::Failed | Self::Rejected | Self::Reverted => &[],
        }
    }
}

impl Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for DeploymentState {
    type Err = DeploymentStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_uppercase()[..] {
            "ENQUEUED" => Ok(Self::Enqueued),
            "DEPLOYING" => Ok(Self::Deploying),
            "NEEDS_QA" => Ok(Self::NeedsQa),
            "SHIPPED" => Ok(Self::Shipped),
            "FAILED" => Ok(Self::Failed),
            "REJECTED" => Ok(Self::Rejected),
            "ROLLING_BACK" => Ok(Self::RollingBack),
            "REVERTED" => Ok(Self::Reverted),
            _ => Err(DeploymentStateError::UnknownDeploymentState { state: s.into() }),
        }
    }
}

impl From<DeploymentState> for &'static str {
    fn from(state: DeploymentState) -> Self {
        match state {
            DeploymentState::Enqueued => "ENQUEUED",
            DeploymentState::Deploying => "DEPLOYING",
            DeploymentState::NeedsQa => "NEEDS_QA",
            DeploymentState::Shipped => "SHIPPED",
            DeploymentState::Failed => "FAILED",
            DeploymentState::Rejected => "REJECTED",
            DeploymentState::RollingBack => "ROLLING_BACK",
            DeploymentState::Reverted => "REVERTED",
        }
    }
}

/// Action applied to an existing deployment.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentAction {
    /// Deploy mechanics picked the deployment up.
    Start,
    /// Deploy succeeded, waiting for QA.
    Complete,
    /// Deploy mechanics failed.
    Fail,
    /// Operator stopped an in-flight deploy.
    Cancel,
    Accept,
    Reject,
    Revert,
    /// Rollback is done.
    FinishRollback,
}

impl DeploymentAction {
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Fail => "fail",
            Self::Cancel => "cancel",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Revert => "revert",
            Self::FinishRollback => "finish_rollback",
        }
    }

    /// State reached when applying this action from `from`, if the action is legal.
    pub fn next_state(self, from: DeploymentState) -> Option<DeploymentState> {
        use DeploymentState::*;

        match (from, self) {
            (Enqueued, Self::Start) => Some(Deploying),
            (Deploying, Self::Complete) => Some(NeedsQa),
            (Deploying, Self::Fail) => Some(Failed),
            // Cancellation keeps the record as history.
            (Deploying, Self::Cancel) => Some(Failed),
            (NeedsQa, Self::Accept) => Some(Shipped),
            (NeedsQa, Self::Reject) => Some(Rejected),
            (Shipped, Self::Revert) => Some(RollingBack),
            (RollingBack, Self::FinishRollback) => Some(Reverted),
            _ => None,
        }
    }
}

impl Display for DeploymentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for DeploymentAction {
    type Err = DeploymentStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_lowercase().replace('-', "_")[..] {
            "start" => Ok(Self::Start),
            "complete" => Ok(Self::Complete),
            "fail" => Ok(Self::Fail),
            "cancel" => Ok(Self::Cancel),
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "revert" => Ok(Self::Revert),
            "finish_rollback" => Ok(Self::FinishRollback),
            _ => Err(DeploymentStateError::UnknownDeploymentAction { action: s.into() }),
        }
    }
}
