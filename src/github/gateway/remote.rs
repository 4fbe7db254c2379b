//! Octocrab-backed implementation of the repository gateway.

use async_trait::async_trait;
use http::Uri;
use octocrab::{Octocrab, Page};

use crate::github::error::GatewayError;
use crate::github::locator::{BranchName, PersonalAccessToken, RepositoryLocator};
use crate::github::models::{
    ApiBranch, ApiBranchProtection, ApiCodeSearchResults, ApiIdentity, ApiIssue, ApiPermission,
    ApiPullRequest, ApiRepository, Branch, CodeSearchHit, CreateIssueRequest, CreateRefRequest,
    CreatedIssue, Identity, Lookup, NewIssue, PermissionLevel, ProtectionStatus,
    ProtectionUpdate, PullRequestRef, RepositoryInfo, RetargetRequest,
    UpdateDefaultBranchRequest,
};

use super::RepositoryGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{
    extract_github_message, is_plan_limitation, map_http_error, map_octocrab_error,
};

/// Page size used when listing and counting pull requests.
const PULLS_PAGE_SIZE: &str = "100";

/// Octocrab-backed repository gateway.
pub struct OctocrabRepositoryGateway {
    client: Octocrab,
}

impl OctocrabRepositoryGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and repository locator.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unknown`] when the base URI cannot be parsed
    /// or when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, GatewayError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }

    /// Sends a DELETE request and treats any 2xx response as success.
    ///
    /// GitHub's deletion routes answer 204 with an empty body, which the
    /// typed Octocrab helpers cannot deserialise, so this goes through the
    /// raw request layer.
    async fn send_delete(&self, path: &str, operation: &str) -> Result<(), GatewayError> {
        let uri: Uri = path.parse::<Uri>().map_err(|error| GatewayError::Unknown {
            status: None,
            message: format!("{operation} failed: invalid route: {error}"),
        })?;

        let response = self
            .client
            ._delete(uri, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = self
            .client
            .body_to_string(response)
            .await
            .unwrap_or_else(|_| String::new());

        Err(map_http_error(operation, status, extract_github_message(&body)))
    }

    async fn pulls_first_page(
        &self,
        locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<Page<ApiPullRequest>, GatewayError> {
        let query_params = [
            ("state", "open"),
            ("base", base.as_str()),
            ("per_page", PULLS_PAGE_SIZE),
        ];

        self.client
            .get(locator.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabRepositoryGateway {
    async fn repository(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<RepositoryInfo, GatewayError> {
        self.client
            .get::<ApiRepository, _, _>(locator.repo_path(), None::<&()>)
            .await
            .map(ApiRepository::into)
            .map_err(|error| map_octocrab_error("read repository", &error))
    }

    async fn branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<Lookup<Branch>, GatewayError> {
        let result = self
            .client
            .get::<ApiBranch, _, _>(locator.branch_path(name), None::<&()>)
            .await;

        match result {
            Ok(api) => Ok(Lookup::Found(api.into())),
            Err(error) => match map_octocrab_error("read branch", &error) {
                GatewayError::NotFound { .. } => Ok(Lookup::Absent),
                other => Err(other),
            },
        }
    }

    async fn default_branch(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<String, GatewayError> {
        self.client
            .get::<ApiRepository, _, _>(locator.repo_path(), None::<&()>)
            .await
            .map(|api| api.default_branch)
            .map_err(|error| map_octocrab_error("read default branch", &error))
    }

    async fn create_branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
        at_commit: &str,
    ) -> Result<(), GatewayError> {
        let request = CreateRefRequest::for_branch(name, at_commit);
        self.client
            .post::<_, serde_json::Value>(locator.refs_path(), Some(&request))
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("create branch", &error))
    }

    async fn update_default_branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError> {
        let request = UpdateDefaultBranchRequest {
            default_branch: name.as_str(),
        };
        self.client
            .patch::<serde_json::Value, _, _>(locator.repo_path(), Some(&request))
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("update default branch", &error))
    }

    async fn branch_protection(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<ProtectionStatus, GatewayError> {
        let result = self
            .client
            .get::<ApiBranchProtection, _, _>(locator.protection_path(name), None::<&()>)
            .await;

        match result {
            Ok(api) => Ok(ProtectionStatus::Protected(api.into())),
            // A 404 on the protection route for a branch that is known to
            // exist means the branch simply carries no rule; a 403 with an
            // account-upgrade message means the plan disallows protection.
            Err(octocrab::Error::GitHub { ref source, .. })
                if source.status_code == http::StatusCode::NOT_FOUND =>
            {
                Ok(ProtectionStatus::Unprotected)
            }
            Err(octocrab::Error::GitHub { ref source, .. }) if is_plan_limitation(source) => {
                Ok(ProtectionStatus::Unsupported)
            }
            Err(error) => Err(map_octocrab_error("read branch protection", &error)),
        }
    }

    async fn set_branch_protection(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
        update: &ProtectionUpdate,
    ) -> Result<(), GatewayError> {
        self.client
            .put::<serde_json::Value, _, _>(locator.protection_path(name), Some(update))
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("set branch protection", &error))
    }

    async fn delete_branch_protection(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError> {
        self.send_delete(&locator.protection_path(name), "delete branch protection")
            .await
    }

    async fn authenticated_identity(&self) -> Result<Identity, GatewayError> {
        self.client
            .get::<ApiIdentity, _, _>("/user", None::<&()>)
            .await
            .map(ApiIdentity::into)
            .map_err(|error| map_octocrab_error("resolve identity", &error))
    }

    async fn collaborator_permission(
        &self,
        locator: &RepositoryLocator,
        login: &str,
    ) -> Result<PermissionLevel, GatewayError> {
        self.client
            .get::<ApiPermission, _, _>(locator.permission_path(login), None::<&()>)
            .await
            .map(|api| api.permission)
            .map_err(|error| map_octocrab_error("read collaborator permission", &error))
    }

    async fn count_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<u64, GatewayError> {
        let page = self.pulls_first_page(locator, base).await?;

        let all = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("count pulls", &error))?;

        Ok(u64::try_from(all.len()).unwrap_or(u64::MAX))
    }

    async fn open_pull_requests_first_page(
        &self,
        locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<Vec<PullRequestRef>, GatewayError> {
        let page = self.pulls_first_page(locator, base).await?;
        Ok(page.items.into_iter().map(ApiPullRequest::into).collect())
    }

    async fn retarget_pull_request(
        &self,
        locator: &RepositoryLocator,
        number: u64,
        base: &BranchName,
    ) -> Result<(), GatewayError> {
        let request = RetargetRequest {
            base: base.as_str(),
        };
        self.client
            .patch::<serde_json::Value, _, _>(locator.pull_path(number), Some(&request))
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("retarget pull request", &error))
    }

    async fn delete_branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError> {
        self.send_delete(&locator.ref_path(name), "delete branch")
            .await
    }

    async fn search_code(
        &self,
        locator: &RepositoryLocator,
        term: &str,
    ) -> Result<Vec<CodeSearchHit>, GatewayError> {
        let query = format!("{term} repo:{}", locator.slug());
        let query_params = [("q", query.as_str())];

        self.client
            .get::<ApiCodeSearchResults, _, _>("/search/code", Some(&query_params))
            .await
            .map(|results| results.items.into_iter().map(Into::into).collect())
            .map_err(|error| map_octocrab_error("search code", &error))
    }

    async fn create_issue(
        &self,
        locator: &RepositoryLocator,
        issue: &NewIssue,
    ) -> Result<CreatedIssue, GatewayError> {
        let request = CreateIssueRequest {
            title: &issue.title,
            labels: &issue.labels,
            body: &issue.body,
        };

        self.client
            .post::<_, ApiIssue>(locator.issues_path(), Some(&request))
            .await
            .map(ApiIssue::into)
            .map_err(|error| map_octocrab_error("create issue", &error))
    }
}
