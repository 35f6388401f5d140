use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentTargetError {
    #[error("Unknown deployment target: {}", target)]
    UnknownDeploymentTarget { target: String },
}

/// Environment a deployment is aimed at.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Hash, Copy, Clone, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentTarget {
    Production,
    #[default]
    Staging,
}

impl DeploymentTarget {
    pub fn to_str(self) -> &'static str {
        self.into()
    }
}

impl Display for DeploymentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for DeploymentTarget {
    type Err = DeploymentTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for DeploymentTarget {
    type Error = DeploymentTargetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match &value.to_uppercase()[..] {
            "PRODUCTION" => Ok(Self::Production),
            "STAGING" => Ok(Self::Staging),
            _ => Err(DeploymentTargetError::UnknownDeploymentTarget {
                target: value.to_string(),
            }),
        }
    }
}

impl From<DeploymentTarget> for &'static str {
    fn from(target: DeploymentTarget) -> Self {
        match target {
            DeploymentTarget::Production => "PRODUCTION",
            DeploymentTarget::Staging => "STAGING",
        }
    }
}
