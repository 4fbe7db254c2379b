//! GitHub repository-state access for branch migration.
//!
//! This module wraps Octocrab behind a [`RepositoryGateway`] trait covering
//! the branch, protection, pull-request, search, and issue operations the
//! migration pipeline needs. Remote failures are mapped into the structured
//! [`GatewayError`] taxonomy so that callers never match on GitHub's error
//! text, and "resource absent" reads are modelled as [`Lookup`] and
//! [`ProtectionStatus`] values rather than exceptional control flow.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use error::GatewayError;
pub use gateway::{OctocrabRepositoryGateway, RepositoryGateway};
pub use locator::{
    BranchName, LocatorError, PersonalAccessToken, RepositoryLocator, RepositoryName,
    RepositoryOwner,
};
pub use models::{
    Branch, BranchProtection, CodeSearchHit, CreatedIssue, DismissalRestrictions, Identity,
    Lookup, NewIssue, PermissionLevel, ProtectionStatus, ProtectionUpdate, PullRequestRef,
    PushRestrictions, RepositoryInfo, RequiredPullRequestReviews, RequiredStatusChecks,
    ReviewsUpdate,
};

#[cfg(test)]
pub use gateway::MockRepositoryGateway;

#[cfg(test)]
mod tests;
