use launchpad_ghapi_interface::ApiError;

#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum GitHubError {
    #[error(transparent)]
    HttpError { source: reqwest::Error },

    #[error("Pull request #{number} not found on repository {repository_path}")]
    UnknownPullRequest {
        repository_path: String,
        number: u64,
    },

    #[error("GraphQL query failed: {message}")]
    GraphQlError { message: String },

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        GitHubError::HttpError { source: e }
    }
}

impl From<GitHubError> for ApiError {
    fn from(e: GitHubError) -> Self {
        match e {
            GitHubError::UnknownPullRequest {
                repository_path,
                number,
            } => ApiError::UnknownPullRequest {
                repository_path,
                number,
            },
            GitHubError::GraphQlError { message } => ApiError::GraphQlError { message },
            e => ApiError::ImplementationError { source: e.into() },
        }
    }
}
