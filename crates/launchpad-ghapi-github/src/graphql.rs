//! Deployability query.

use launchpad_ghapi_interface::types::{
    GhBranchProtection, GhCheckConclusion, GhCheckRunSummary, GhDeployabilityReport,
    GhMergeableState,
};
use serde::{Deserialize, Serialize};

use crate::errors::GitHubError;

pub(crate) const DEPLOYABILITY_QUERY: &str = r#"
query Deployability($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      closed
      isDraft
      mergeable
      baseRef {
        branchProtectionRule {
          requiresStatusChecks
          requiredStatusChecks {
            context
          }
        }
      }
      commits(last: 1) {
        nodes {
          commit {
            statusCheckRollup {
              contexts(first: 100) {
                nodes {
                  __typename
                  ... on CheckRun {
                    name
                    conclusion
                  }
                  ... on StatusContext {
                    context
                    state
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: DeployabilityVariables<'a>,
}

#[derive(Serialize)]
pub(crate) struct DeployabilityVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub number: u64,
}

#[derive(Deserialize)]
pub(crate) struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlMessage>,
}

#[derive(Deserialize)]
struct GraphQlMessage {
    message: String,
}

#[derive(Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_request: Option<PullRequestNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    closed: bool,
    is_draft: bool,
    mergeable: GhMergeableState,
    base_ref: Option<BaseRefNode>,
    commits: Nodes<CommitNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BaseRefNode {
    branch_protection_rule: Option<BranchProtectionRuleNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BranchProtectionRuleNode {
    requires_status_checks: bool,
    #[serde(default)]
    required_status_checks: Option<Vec<RequiredStatusCheckNode>>,
}

#[derive(Deserialize)]
struct RequiredStatusCheckNode {
    context: String,
}

#[derive(Deserialize)]
struct Nodes<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct CommitNode {
    commit: CommitInner,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitInner {
    status_check_rollup: Option<StatusCheckRollupNode>,
}

#[derive(Deserialize)]
struct StatusCheckRollupNode {
    contexts: Nodes<ContextNode>,
}

#[derive(Deserialize)]
#[serde(tag = "__typename")]
enum ContextNode {
    CheckRun {
        name: String,
        conclusion: Option<GhCheckConclusion>,
    },
    StatusContext {
        context: String,
        state: StatusState,
    },
    #[serde(other)]
    Other,
}

/// Commit status state, as set through the statuses API.
#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum StatusState {
    Error,
    Expected,
    Failure,
    Pending,
    Success,
}

impl StatusState {
    fn conclusion(self) -> Option<GhCheckConclusion> {
        match self {
            Self::Success => Some(GhCheckConclusion::Success),
            Self::Error | Self::Failure => Some(GhCheckConclusion::Failure),
            Self::Expected | Self::Pending => None,
        }
    }
}

impl GraphQlResponse {
    /// Extract the deployability report of a pull request.
    pub(crate) fn into_report(
        self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<GhDeployabilityReport, GitHubError> {
        if !self.errors.is_empty() && self.data.is_none() {
            return Err(GitHubError::GraphQlError {
                message: self
                    .errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let pull_request = self
            .data
            .and_then(|d| d.repository)
            .and_then(|r| r.pull_request)
            .ok_or_else(|| GitHubError::UnknownPullRequest {
                repository_path: format!("{owner}/{name}"),
                number,
            })?;

        let branch_protection = pull_request
            .base_ref
            .and_then(|b| b.branch_protection_rule)
            .map(|rule| GhBranchProtection {
                requires_status_checks: rule.requires_status_checks,
                required_contexts: rule
                    .required_status_checks
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| c.context)
                    .collect(),
            });

        let check_runs = pull_request
            .commits
            .nodes
            .into_iter()
            .last()
            .and_then(|c| c.commit.status_check_rollup)
            .map(|rollup| {
                rollup
                    .contexts
                    .nodes
                    .into_iter()
                    .filter_map(|node| match node {
                        ContextNode::CheckRun { name, conclusion } => {
                            Some(GhCheckRunSummary { name, conclusion })
                        }
                        ContextNode::StatusContext { context, state } => {
                            Some(GhCheckRunSummary {
                                name: context,
                                conclusion: state.conclusion(),
                            })
                        }
                        ContextNode::Other => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GhDeployabilityReport {
            closed: pull_request.closed,
            is_draft: pull_request.is_draft,
            mergeable: pull_request.mergeable,
            branch_protection,
            check_runs,
        })
    }
}

#[cfg(test)]
mod tests {
    use launchpad_core::use_cases::pulls::determine_deployability;
    use launchpad_models::PullRequestState;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(body: &str) -> GraphQlResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn report_from_full_response() {
        let response = parse(
            r#"{
                "data": {
                    "repository": {
                        "pullRequest": {
                            "closed": false,
                            "isDraft": false,
                            "mergeable": "MERGEABLE",
                            "baseRef": {
                                "branchProtectionRule": {
                                    "requiresStatusChecks": true,
                                    "requiredStatusChecks": [{"context": "build"}]
                                }
                            },
                            "commits": {
                                "nodes": [{
                                    "commit": {
                                        "statusCheckRollup": {
                                            "contexts": {
                                                "nodes": [
                                                    {"__typename": "CheckRun", "name": "build", "conclusion": "SUCCESS"},
                                                    {"__typename": "CheckRun", "name": "lint", "conclusion": null},
                                                    {"__typename": "StatusContext", "context": "ci/jenkins", "state": "SUCCESS"},
                                                    {"__typename": "StatusContext", "context": "ci/circle", "state": "PENDING"},
                                                    {"__typename": "CheckSuite"}
                                                ]
                                            }
                                        }
                                    }
                                }]
                            }
                        }
                    }
                }
            }"#,
        );

        assert_eq!(
            response.into_report("acme", "rocket", 3).unwrap(),
            GhDeployabilityReport {
                closed: false,
                is_draft: false,
                mergeable: GhMergeableState::Mergeable,
                branch_protection: Some(GhBranchProtection {
                    requires_status_checks: true,
                    required_contexts: vec!["build".into()],
                }),
                check_runs: vec![
                    GhCheckRunSummary {
                        name: "build".into(),
                        conclusion: Some(GhCheckConclusion::Success)
                    },
                    GhCheckRunSummary {
                        name: "lint".into(),
                        conclusion: None
                    },
                    GhCheckRunSummary {
                        name: "ci/jenkins".into(),
                        conclusion: Some(GhCheckConclusion::Success)
                    },
                    GhCheckRunSummary {
                        name: "ci/circle".into(),
                        conclusion: None
                    },
                ],
            }
        );
    }

    #[test]
    fn report_without_protection_nor_checks() {
        let response = parse(
            r#"{
                "data": {
                    "repository": {
                        "pullRequest": {
                            "closed": true,
                            "isDraft": true,
                            "mergeable": "UNKNOWN",
                            "baseRef": null,
                            "commits": {"nodes": [{"commit": {"statusCheckRollup": null}}]}
                        }
                    }
                }
            }"#,
        );

        let report = response.into_report("acme", "rocket", 3).unwrap();
        assert!(report.closed);
        assert!(report.is_draft);
        assert_eq!(report.branch_protection, None);
        assert!(report.check_runs.is_empty());
    }

    #[test]
    fn commit_status_states() {
        let response = parse(
            r#"{
                "data": {
                    "repository": {
                        "pullRequest": {
                            "closed": false,
                            "isDraft": false,
                            "mergeable": "MERGEABLE",
                            "baseRef": null,
                            "commits": {
                                "nodes": [{
                                    "commit": {
                                        "statusCheckRollup": {
                                            "contexts": {
                                                "nodes": [
                                                    {"__typename": "StatusContext", "context": "a", "state": "ERROR"},
                                                    {"__typename": "StatusContext", "context": "b", "state": "FAILURE"},
                                                    {"__typename": "StatusContext", "context": "c", "state": "EXPECTED"}
                                                ]
                                            }
                                        }
                                    }
                                }]
                            }
                        }
                    }
                }
            }"#,
        );

        let conclusions: Vec<_> = response
            .into_report("acme", "rocket", 3)
            .unwrap()
            .check_runs
            .into_iter()
            .map(|run| run.conclusion)
            .collect();
        assert_eq!(
            conclusions,
            vec![
                Some(GhCheckConclusion::Failure),
                Some(GhCheckConclusion::Failure),
                None
            ]
        );
    }

    #[test]
    fn required_commit_status_is_deployable() {
        let response = parse(
            r#"{
                "data": {
                    "repository": {
                        "pullRequest": {
                            "closed": false,
                            "isDraft": false,
                            "mergeable": "MERGEABLE",
                            "baseRef": {
                                "branchProtectionRule": {
                                    "requiresStatusChecks": true,
                                    "requiredStatusChecks": [{"context": "ci/jenkins"}]
                                }
                            },
                            "commits": {
                                "nodes": [{
                                    "commit": {
                                        "statusCheckRollup": {
                                            "contexts": {
                                                "nodes": [
                                                    {"__typename": "StatusContext", "context": "ci/jenkins", "state": "SUCCESS"}
                                                ]
                                            }
                                        }
                                    }
                                }]
                            }
                        }
                    }
                }
            }"#,
        );

        let report = response.into_report("acme", "rocket", 3).unwrap();
        assert_eq!(determine_deployability(&report), PullRequestState::Ready);
    }

    #[test]
    fn missing_pull_request() {
        let response = parse(r#"{"data": {"repository": {"pullRequest": null}}}"#);

        assert!(matches!(
            response.into_report("acme", "rocket", 3),
            Err(GitHubError::UnknownPullRequest { number: 3, .. })
        ));
    }

    #[test]
    fn query_errors() {
        let response = parse(r#"{"data": null, "errors": [{"message": "boom"}]}"#);

        assert!(matches!(
            response.into_report("acme", "rocket", 3),
            Err(GitHubError::GraphQlError { message }) if message == "boom"
        ));
    }
}
