//! In-memory scripted gateway for migration scenario tests.
//!
//! [`ScriptedGateway`] simulates the remote repository state and records
//! every call it receives, so tests can assert both the resulting state
//! (branches, protection, pull-request bases) and the absence of mutating
//! calls under dry-run.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::GatewayError;
use super::gateway::RepositoryGateway;
use super::locator::{BranchName, RepositoryLocator};
use super::models::{
    Branch, BranchProtection, CodeSearchHit, CreatedIssue, Identity, Lookup, NewIssue,
    PermissionLevel, ProtectionStatus, ProtectionUpdate, PullRequestRef, RepositoryInfo,
};

/// Scripted remote repository state backing a [`ScriptedGateway`].
#[derive(Debug, Clone)]
pub struct ScriptedRepository {
    /// Current default branch.
    pub default_branch: String,
    /// Branch name to tip SHA.
    pub branches: BTreeMap<String, String>,
    /// Branch name to protection rule.
    pub protection: BTreeMap<String, BranchProtection>,
    /// Open pull requests as (number, base branch) pairs.
    pub open_pulls: Vec<(u64, String)>,
    /// Authenticated login.
    pub login: String,
    /// Permission level reported for the authenticated login.
    pub permission: PermissionLevel,
    /// Search term to matching file paths.
    pub code_hits: BTreeMap<String, Vec<String>>,
    /// Issues created through the gateway.
    pub created_issues: Vec<NewIssue>,
}

impl Default for ScriptedRepository {
    fn default() -> Self {
        Self {
            default_branch: "master".to_owned(),
            branches: BTreeMap::new(),
            protection: BTreeMap::new(),
            open_pulls: Vec::new(),
            login: "octocat".to_owned(),
            permission: PermissionLevel::Admin,
            code_hits: BTreeMap::new(),
            created_issues: Vec::new(),
        }
    }
}

/// Per-operation call counters recorded by a [`ScriptedGateway`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// Calls to `repository`.
    pub repository: usize,
    /// Calls to `branch`.
    pub branch: usize,
    /// Calls to `default_branch`.
    pub default_branch: usize,
    /// Calls to `create_branch`.
    pub create_branch: usize,
    /// Calls to `update_default_branch`.
    pub update_default_branch: usize,
    /// Calls to `branch_protection`.
    pub branch_protection: usize,
    /// Calls to `set_branch_protection`.
    pub set_branch_protection: usize,
    /// Calls to `delete_branch_protection`.
    pub delete_branch_protection: usize,
    /// Calls to `authenticated_identity`.
    pub authenticated_identity: usize,
    /// Calls to `collaborator_permission`.
    pub collaborator_permission: usize,
    /// Calls to `count_open_pull_requests`.
    pub count_open_pull_requests: usize,
    /// Calls to `open_pull_requests_first_page`.
    pub list_open_pull_requests: usize,
    /// Calls to `retarget_pull_request`.
    pub retarget_pull_request: usize,
    /// Calls to `delete_branch`.
    pub delete_branch: usize,
    /// Calls to `search_code`.
    pub search_code: usize,
    /// Calls to `create_issue`.
    pub create_issue: usize,
}

impl CallCounts {
    /// Total number of mutating calls received.
    #[must_use]
    pub const fn mutating(&self) -> usize {
        self.create_branch
            + self.update_default_branch
            + self.set_branch_protection
            + self.delete_branch_protection
            + self.retarget_pull_request
            + self.delete_branch
            + self.create_issue
    }
}

/// Fake gateway over a [`ScriptedRepository`], recording every call.
#[derive(Debug)]
pub struct ScriptedGateway {
    state: Mutex<ScriptedRepository>,
    counts: Mutex<CallCounts>,
    /// Page size for pull-request listing; small by default so tests
    /// exercise the re-poll loop.
    page_size: usize,
}

impl ScriptedGateway {
    /// Creates a gateway over the given scripted state.
    #[must_use]
    pub fn new(state: ScriptedRepository) -> Self {
        Self {
            state: Mutex::new(state),
            counts: Mutex::new(CallCounts::default()),
            page_size: 2,
        }
    }

    /// Overrides the pull-request listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Snapshot of the call counters.
    #[must_use]
    pub fn counts(&self) -> CallCounts {
        *self
            .counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Snapshot of the scripted repository state.
    #[must_use]
    pub fn state(&self) -> ScriptedRepository {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut CallCounts)) {
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        update(&mut counts);
    }

    fn with_state<T>(&self, read: impl FnOnce(&mut ScriptedRepository) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        read(&mut state)
    }
}

#[async_trait]
impl RepositoryGateway for ScriptedGateway {
    async fn repository(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<RepositoryInfo, GatewayError> {
        self.record(|counts| counts.repository += 1);
        let default_branch = self.with_state(|state| state.default_branch.clone());
        Ok(RepositoryInfo {
            full_name: locator.slug(),
            default_branch,
        })
    }

    async fn branch(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<Lookup<Branch>, GatewayError> {
        self.record(|counts| counts.branch += 1);
        Ok(self.with_state(|state| {
            state
                .branches
                .get(name.as_str())
                .map_or(Lookup::Absent, |sha| {
                    Lookup::Found(Branch {
                        name: name.as_str().to_owned(),
                        tip_sha: sha.clone(),
                    })
                })
        }))
    }

    async fn default_branch(
        &self,
        _locator: &RepositoryLocator,
    ) -> Result<String, GatewayError> {
        self.record(|counts| counts.default_branch += 1);
        Ok(self.with_state(|state| state.default_branch.clone()))
    }

    async fn create_branch(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
        at_commit: &str,
    ) -> Result<(), GatewayError> {
        self.record(|counts| counts.create_branch += 1);
        self.with_state(|state| {
            if state.branches.contains_key(name.as_str()) {
                return Err(GatewayError::already_exists(format!(
                    "branch {name}",
                )));
            }
            state
                .branches
                .insert(name.as_str().to_owned(), at_commit.to_owned());
            Ok(())
        })
    }

    async fn update_default_branch(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError> {
        self.record(|counts| counts.update_default_branch += 1);
        self.with_state(|state| {
            state.default_branch = name.as_str().to_owned();
        });
        Ok(())
    }

    async fn branch_protection(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<ProtectionStatus, GatewayError> {
        self.record(|counts| counts.branch_protection += 1);
        Ok(self.with_state(|state| {
            state
                .protection
                .get(name.as_str())
                .map_or(ProtectionStatus::Unprotected, |rule| {
                    ProtectionStatus::Protected(rule.clone())
                })
        }))
    }

    async fn set_branch_protection(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
        update: &ProtectionUpdate,
    ) -> Result<(), GatewayError> {
        self.record(|counts| counts.set_branch_protection += 1);
        self.with_state(|state| {
            state.protection.insert(
                name.as_str().to_owned(),
                BranchProtection {
                    required_status_checks: update.required_status_checks.clone(),
                    enforce_admins: update.enforce_admins.unwrap_or_default(),
                    required_pull_request_reviews: update.required_pull_request_reviews.as_ref()
                        .map(|reviews| super::models::RequiredPullRequestReviews {
                            dismissal_restrictions: reviews.dismissal_restrictions.clone(),
                            dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                            require_code_owner_reviews: reviews.require_code_owner_reviews,
                            required_approving_review_count: Some(
                                reviews.required_approving_review_count,
                            ),
                        }),
                    restrictions: update.restrictions.clone(),
                    required_signatures: update.required_signatures,
                    required_linear_history: update.required_linear_history,
                    allow_force_pushes: update.allow_force_pushes,
                    allow_deletions: update.allow_deletions,
                },
            );
        });
        Ok(())
    }

    async fn delete_branch_protection(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError> {
        self.record(|counts| counts.delete_branch_protection += 1);
        self.with_state(|state| {
            state.protection.remove(name.as_str());
        });
        Ok(())
    }

    async fn authenticated_identity(&self) -> Result<Identity, GatewayError> {
        self.record(|counts| counts.authenticated_identity += 1);
        Ok(Identity {
            login: self.with_state(|state| state.login.clone()),
        })
    }

    async fn collaborator_permission(
        &self,
        _locator: &RepositoryLocator,
        _login: &str,
    ) -> Result<PermissionLevel, GatewayError> {
        self.record(|counts| counts.collaborator_permission += 1);
        Ok(self.with_state(|state| state.permission))
    }

    async fn count_open_pull_requests(
        &self,
        _locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<u64, GatewayError> {
        self.record(|counts| counts.count_open_pull_requests += 1);
        let count = self.with_state(|state| {
            state
                .open_pulls
                .iter()
                .filter(|(_, pull_base)| pull_base == base.as_str())
                .count()
        });
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn open_pull_requests_first_page(
        &self,
        _locator: &RepositoryLocator,
        base: &BranchName,
    ) -> Result<Vec<PullRequestRef>, GatewayError> {
        self.record(|counts| counts.list_open_pull_requests += 1);
        Ok(self.with_state(|state| {
            state
                .open_pulls
                .iter()
                .filter(|(_, pull_base)| pull_base == base.as_str())
                .take(self.page_size)
                .map(|(number, pull_base)| PullRequestRef {
                    number: *number,
                    base: pull_base.clone(),
                })
                .collect()
        }))
    }

    async fn retarget_pull_request(
        &self,
        _locator: &RepositoryLocator,
        number: u64,
        base: &BranchName,
    ) -> Result<(), GatewayError> {
        self.record(|counts| counts.retarget_pull_request += 1);
        self.with_state(|state| {
            for (pull_number, pull_base) in &mut state.open_pulls {
                if *pull_number == number {
                    *pull_base = base.as_str().to_owned();
                }
            }
        });
        Ok(())
    }

    async fn delete_branch(
        &self,
        _locator: &RepositoryLocator,
        name: &BranchName,
    ) -> Result<(), GatewayError> {
        self.record(|counts| counts.delete_branch += 1);
        self.with_state(|state| {
            if state.branches.remove(name.as_str()).is_none() {
                return Err(GatewayError::not_found(format!("branch {name}")));
            }
            Ok(())
        })
    }

    async fn search_code(
        &self,
        _locator: &RepositoryLocator,
        term: &str,
    ) -> Result<Vec<CodeSearchHit>, GatewayError> {
        self.record(|counts| counts.search_code += 1);
        Ok(self.with_state(|state| {
            state
                .code_hits
                .get(term)
                .map(|paths| {
                    paths
                        .iter()
                        .map(|path| CodeSearchHit { path: path.clone() })
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    async fn create_issue(
        &self,
        _locator: &RepositoryLocator,
        issue: &NewIssue,
    ) -> Result<CreatedIssue, GatewayError> {
        self.record(|counts| counts.create_issue += 1);
        let number = self.with_state(|state| {
            state.created_issues.push(issue.clone());
            state.created_issues.len()
        });
        Ok(CreatedIssue {
            number: u64::try_from(number).unwrap_or(u64::MAX),
            html_url: None,
        })
    }
}
