//! Gateways for repository-state operations through Octocrab.
//!
//! This module provides the trait-based gateway the migration pipeline is
//! written against. The trait-based design enables mocking in tests while
//! the Octocrab implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod remote;

pub use remote::OctocrabRepositoryGateway;

use async_trait::async_trait;

use crate::github::error::GatewayError;
use crate::github::locator::{BranchName, RepositoryLocator};
use crate::github::models::{
    Branch, CodeSearchHit, CreatedIssue, Identity, Lookup, NewIssue, PermissionLevel,
    ProtectionStatus, ProtectionUpdate, PullRequestRef, RepositoryInfo,
};

/// Remote read/write operations on the repository under migration.
///
/// Reads that can legitimately find nothing return [`Lookup`] or
/// [`ProtectionStatus`] so that absence is an ordinary value, never an
/// error the caller has to catch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Fetch repository metadata, confirming the repository exists.
    async fn repository(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<RepositoryInfo, GatewayError>;

    /// Look up a branch and its tip commit.
    async fn branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<Lookup<Branch>, GatewayError>;

    /// Fetch the repository's current default branch name.
    async fn default_branch(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<String, GatewayError>;

    /// Create a branch pointing at the given commit.
    async fn create_branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
        at_commit: &str,
    ) -> Result<(), GatewayError>;

    /// Change the repository's default branch.
    async fn update_default_branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError>;

    /// Read a branch's protection rule, distinguishing "not protected" and
    /// "plan does not support protection" from genuine failures.
    async fn branch_protection(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<ProtectionStatus, GatewayError>;

    /// Write a protection rule to a branch.
    async fn set_branch_protection(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
        update: &ProtectionUpdate,
    ) -> Result<(), GatewayError>;

    /// Remove a branch's protection rule.
    async fn delete_branch_protection(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError>;

    /// Resolve the authenticated identity running the migration.
    async fn authenticated_identity(&self) -> Result<Identity, GatewayError>;

    /// Query a collaborator's permission level on the repository.
    async fn collaborator_permission(
        &self,
        locator: &RepositoryLocator,
        login: &str,
    ) -> Result<PermissionLevel, GatewayError>;

    /// Count open pull requests whose base branch matches `base`.
    async fn count_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<u64, GatewayError>;

    /// List the first page of open pull requests whose base branch matches
    /// `base`. Callers that need the full set re-request this first page
    /// after mutating, because retargeting changes the query predicate.
    async fn open_pull_requests_first_page(
        &self,
        locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<Vec<PullRequestRef>, GatewayError>;

    /// Change a pull request's base branch.
    async fn retarget_pull_request(
        &self,
        locator: &RepositoryLocator,
        number: u64,
        base: &BranchName,
    ) -> Result<(), GatewayError>;

    /// Delete a branch.
    async fn delete_branch(
        &self,
        locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError>;

    /// Search the repository's code for the given term.
    async fn search_code(
        &self,
        locator: &RepositoryLocator,
        term: &str,
    ) -> Result<Vec<CodeSearchHit>, GatewayError>;

    /// Open an advisory issue.
    async fn create_issue(
        &self,
        locator: &RepositoryLocator,
        issue: &NewIssue,
    ) -> Result<CreatedIssue, GatewayError>;
}
