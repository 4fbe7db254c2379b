//! Data models for repository state, branch protection, and issues.
//!
//! Types prefixed with `Api` are internal deserialisation targets matching
//! GitHub's wire shapes; they convert into the public domain types at the
//! gateway boundary. Account, team, and app objects collapse to their bare
//! identifiers during that conversion so the rest of the crate works with
//! plain login/slug lists.

use serde::{Deserialize, Serialize};

use super::locator::BranchName;

/// Outcome of a read that distinguishes "resource absent" from "request
/// failed". Absence is a valid result the caller branches on, never an
/// error to catch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The resource exists.
    Found(T),
    /// The remote confirmed the resource does not exist.
    Absent,
}

impl<T> Lookup<T> {
    /// Returns `true` when the resource was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Repository metadata needed by the migration pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Full `owner/name` slug as reported by the remote.
    pub full_name: String,
    /// The repository's current default branch.
    pub default_branch: String,
}

/// A branch together with its tip commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// SHA of the commit the branch currently points at.
    pub tip_sha: String,
}

/// The authenticated identity running the migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account login.
    pub login: String,
}

/// Collaborator permission level on the target repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Full administrative access.
    Admin,
    /// Maintainer access.
    Maintain,
    /// Push access.
    Write,
    /// Triage access.
    Triage,
    /// Read-only access.
    Read,
    /// No access.
    None,
    /// A level this crate does not recognise.
    #[serde(other)]
    Unrecognised,
}

/// An open pull request whose base branch matched the queried name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Pull request number.
    pub number: u64,
    /// Base branch name at the time of the query.
    pub base: String,
}

/// A code-search hit inside the target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSearchHit {
    /// Repository-relative file path.
    pub path: String,
}

/// Parameters for creating an advisory issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,
    /// Labels to attach.
    pub labels: Vec<String>,
    /// Rendered issue body.
    pub body: String,
}

/// A created advisory issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Issue number.
    pub number: u64,
    /// User-facing URL of the issue.
    pub html_url: Option<String>,
}

// --- Branch protection, read shape ---

/// Branch protection rule as read from the old branch.
///
/// Optional blocks are `None` when the source rule does not carry them;
/// the transform into [`ProtectionUpdate`] preserves that absence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchProtection {
    /// Required status checks, when configured.
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// Whether the rule is enforced for administrators.
    pub enforce_admins: bool,
    /// Pull-request review requirements, when configured.
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    /// Push restrictions, when configured.
    pub restrictions: Option<PushRestrictions>,
    /// Signed-commit requirement; `None` when the platform does not expose
    /// it, which is distinct from `Some(false)`.
    pub required_signatures: Option<bool>,
    /// Linear-history requirement.
    pub required_linear_history: bool,
    /// Whether force pushes are allowed.
    pub allow_force_pushes: bool,
    /// Whether branch deletion is allowed.
    pub allow_deletions: bool,
}

/// Required status checks attached to a protection rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequiredStatusChecks {
    /// Require branches to be up to date before merging.
    pub strict: bool,
    /// Ordered status-check context names, carried through unchanged.
    pub contexts: Vec<String>,
}

/// Pull-request review requirements attached to a protection rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredPullRequestReviews {
    /// Dismissal allow-list; `None` when the source rule has none. The
    /// distinction matters: writing an explicit empty list configures a
    /// different state on the target than omitting the field.
    pub dismissal_restrictions: Option<DismissalRestrictions>,
    /// Dismiss stale reviews when new commits are pushed.
    pub dismiss_stale_reviews: bool,
    /// Require review from code owners.
    pub require_code_owner_reviews: bool,
    /// Minimum approving reviews; `None` when the source leaves it unset.
    pub required_approving_review_count: Option<u8>,
}

/// Users and teams allowed to dismiss reviews, as bare identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DismissalRestrictions {
    /// User logins.
    pub users: Vec<String>,
    /// Team slugs.
    pub teams: Vec<String>,
}

/// Users, teams, and apps allowed to push, as bare identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushRestrictions {
    /// User logins.
    pub users: Vec<String>,
    /// Team slugs.
    pub teams: Vec<String>,
    /// App slugs.
    pub apps: Vec<String>,
}

// --- Branch protection, write shape ---

/// Structured protection-read outcome for a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectionStatus {
    /// The branch carries the given protection rule.
    Protected(BranchProtection),
    /// The branch exists but is not protected.
    Unprotected,
    /// The repository's plan does not support branch protection at all.
    Unsupported,
}

/// Creation payload written to the new branch's protection endpoint.
///
/// The top-level nullable blocks serialise an explicit `null`, which is
/// GitHub's "unset" sentinel for them. `dismissal_restrictions` and
/// `required_signatures` instead omit the key entirely when absent; for
/// those fields an explicit `null` or empty value configures a different
/// state on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionUpdate {
    /// Required status checks, or `null` to disable.
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// `Some(true)` to enforce for administrators, `null` to leave unset.
    pub enforce_admins: Option<bool>,
    /// Review requirements, or `null` to disable.
    pub required_pull_request_reviews: Option<ReviewsUpdate>,
    /// Push restrictions, or `null` to disable.
    pub restrictions: Option<PushRestrictions>,
    /// Linear-history requirement.
    pub required_linear_history: bool,
    /// Force-push allowance.
    pub allow_force_pushes: bool,
    /// Deletion allowance.
    pub allow_deletions: bool,
    /// Signed-commit requirement; omitted when the source did not expose it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_signatures: Option<bool>,
}

/// Review-requirement block of a [`ProtectionUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewsUpdate {
    /// Dismissal allow-list; the key is omitted when the source had none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissal_restrictions: Option<DismissalRestrictions>,
    /// Dismiss stale reviews when new commits are pushed.
    pub dismiss_stale_reviews: bool,
    /// Require review from code owners.
    pub require_code_owner_reviews: bool,
    /// Minimum approving reviews; defaults to 1 when the source leaves it
    /// unset.
    pub required_approving_review_count: u8,
}

// --- API wire shapes ---

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) full_name: String,
    pub(super) default_branch: String,
}

impl From<ApiRepository> for RepositoryInfo {
    fn from(api: ApiRepository) -> Self {
        Self {
            full_name: api.full_name,
            default_branch: api.default_branch,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    pub(super) name: String,
    pub(super) commit: ApiCommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitRef {
    pub(super) sha: String,
}

impl From<ApiBranch> for Branch {
    fn from(api: ApiBranch) -> Self {
        Self {
            name: api.name,
            tip_sha: api.commit.sha,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIdentity {
    pub(super) login: String,
}

impl From<ApiIdentity> for Identity {
    fn from(api: ApiIdentity) -> Self {
        Self { login: api.login }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPermission {
    pub(super) permission: PermissionLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) base: ApiBaseRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBaseRef {
    #[serde(rename = "ref")]
    pub(super) name: String,
}

impl From<ApiPullRequest> for PullRequestRef {
    fn from(api: ApiPullRequest) -> Self {
        Self {
            number: api.number,
            base: api.base.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCodeSearchItem {
    pub(super) path: String,
}

impl From<ApiCodeSearchItem> for CodeSearchHit {
    fn from(api: ApiCodeSearchItem) -> Self {
        Self { path: api.path }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIssue {
    pub(super) number: u64,
    pub(super) html_url: Option<String>,
}

impl From<ApiIssue> for CreatedIssue {
    fn from(api: ApiIssue) -> Self {
        Self {
            number: api.number,
            html_url: api.html_url,
        }
    }
}

/// GitHub wraps several protection booleans as `{"enabled": bool}` objects
/// on read.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiEnabled {
    pub(super) enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRequiredStatusChecks {
    pub(super) strict: bool,
    #[serde(default)]
    pub(super) contexts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiAccount {
    pub(super) login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSlugged {
    pub(super) slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiDismissalRestrictions {
    #[serde(default)]
    pub(super) users: Vec<ApiAccount>,
    #[serde(default)]
    pub(super) teams: Vec<ApiSlugged>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRequiredReviews {
    pub(super) dismissal_restrictions: Option<ApiDismissalRestrictions>,
    #[serde(default)]
    pub(super) dismiss_stale_reviews: bool,
    #[serde(default)]
    pub(super) require_code_owner_reviews: bool,
    pub(super) required_approving_review_count: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRestrictions {
    #[serde(default)]
    pub(super) users: Vec<ApiAccount>,
    #[serde(default)]
    pub(super) teams: Vec<ApiSlugged>,
    #[serde(default)]
    pub(super) apps: Vec<ApiSlugged>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranchProtection {
    pub(super) required_status_checks: Option<ApiRequiredStatusChecks>,
    pub(super) enforce_admins: Option<ApiEnabled>,
    pub(super) required_pull_request_reviews: Option<ApiRequiredReviews>,
    pub(super) restrictions: Option<ApiRestrictions>,
    pub(super) required_signatures: Option<ApiEnabled>,
    pub(super) required_linear_history: Option<ApiEnabled>,
    pub(super) allow_force_pushes: Option<ApiEnabled>,
    pub(super) allow_deletions: Option<ApiEnabled>,
}

fn enabled(flag: Option<ApiEnabled>) -> bool {
    flag.is_some_and(|value| value.enabled)
}

fn logins(accounts: Vec<ApiAccount>) -> Vec<String> {
    accounts.into_iter().map(|account| account.login).collect()
}

fn slugs(items: Vec<ApiSlugged>) -> Vec<String> {
    items.into_iter().map(|item| item.slug).collect()
}

impl From<ApiBranchProtection> for BranchProtection {
    fn from(api: ApiBranchProtection) -> Self {
        Self {
            required_status_checks: api.required_status_checks.map(|checks| {
                RequiredStatusChecks {
                    strict: checks.strict,
                    contexts: checks.contexts,
                }
            }),
            enforce_admins: enabled(api.enforce_admins),
            required_pull_request_reviews: api.required_pull_request_reviews.map(|reviews| {
                RequiredPullRequestReviews {
                    dismissal_restrictions: reviews.dismissal_restrictions.map(|dismissal| {
                        DismissalRestrictions {
                            users: logins(dismissal.users),
                            teams: slugs(dismissal.teams),
                        }
                    }),
                    dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                    require_code_owner_reviews: reviews.require_code_owner_reviews,
                    required_approving_review_count: reviews.required_approving_review_count,
                }
            }),
            restrictions: api.restrictions.map(|restrictions| PushRestrictions {
                users: logins(restrictions.users),
                teams: slugs(restrictions.teams),
                apps: slugs(restrictions.apps),
            }),
            required_signatures: api.required_signatures.map(|flag| flag.enabled),
            required_linear_history: enabled(api.required_linear_history),
            allow_force_pushes: enabled(api.allow_force_pushes),
            allow_deletions: enabled(api.allow_deletions),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCodeSearchResults {
    #[serde(default)]
    pub(super) items: Vec<ApiCodeSearchItem>,
}

/// Request body for creating a git ref.
#[derive(Debug, Clone, Serialize)]
pub(super) struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub(super) reference: String,
    pub(super) sha: &'a str,
}

impl<'a> CreateRefRequest<'a> {
    pub(super) fn for_branch(branch: &BranchName, sha: &'a str) -> Self {
        Self {
            reference: format!("refs/heads/{}", branch.as_str()),
            sha,
        }
    }
}

/// Request body for updating a repository's default branch.
#[derive(Debug, Clone, Serialize)]
pub(super) struct UpdateDefaultBranchRequest<'a> {
    pub(super) default_branch: &'a str,
}

/// Request body for retargeting a pull request.
#[derive(Debug, Clone, Serialize)]
pub(super) struct RetargetRequest<'a> {
    pub(super) base: &'a str,
}

/// Request body for creating an issue.
#[derive(Debug, Clone, Serialize)]
pub(super) struct CreateIssueRequest<'a> {
    pub(super) title: &'a str,
    pub(super) labels: &'a [String],
    pub(super) body: &'a str,
}
