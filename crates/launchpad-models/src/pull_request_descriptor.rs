use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RepositoryPath;

#[derive(Debug, Error)]
pub enum PullRequestDescriptorError {
    #[error("Invalid pull request descriptor: {}", path)]
    InvalidDescriptor { path: String },
}

/// Identifies a pull request on the code host, as sent to the judge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDescriptor {
    pub number: u64,
    pub repo: RepositoryPath,
}

impl PullRequestDescriptor {
    pub fn new(repo: RepositoryPath, number: u64) -> Self {
        Self { number, repo }
    }
}

impl std::fmt::Display for PullRequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.repo, self.number)
    }
}

impl FromStr for PullRequestDescriptor {
    type Err = PullRequestDescriptorError;

    /// Parse `owner/name/number`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PullRequestDescriptorError::InvalidDescriptor { path: s.into() };

        let (path, number) = s.rsplit_once('/').ok_or_else(invalid)?;
        let repo = RepositoryPath::from_str(path).map_err(|_| invalid())?;
        let number = number.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self::new(repo, number))
    }
}
