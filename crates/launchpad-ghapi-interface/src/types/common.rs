use serde::{Deserialize, Serialize};

/// GitHub User.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhUser {
    /// Username.
    pub login: String,
    /// Profile URL.
    #[serde(default)]
    pub html_url: String,
}

/// GitHub Repository.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhRepository {
    /// ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Full name.
    pub full_name: String,
    /// Owner.
    pub owner: GhUser,
    /// Default branch.
    #[serde(default)]
    pub default_branch: String,
    /// Archived.
    #[serde(default)]
    pub archived: bool,
    /// Template repository.
    #[serde(default)]
    pub is_template: bool,
}

/// GitHub Repository (short format, as sent in installation events).
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GhRepositoryShort {
    /// ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Full name.
    pub full_name: String,
}
