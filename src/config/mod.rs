//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach, and converts them into the
//! immutable [`MigrationConfig`] the orchestrator owns for the run.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – old branch `master`, new branch `main`, dry-run,
//!    issues and platform-specific steps enabled
//! 2. **Configuration file** – `.rebranch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REBRANCH_*`, or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments**

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::{LocatorError, PersonalAccessToken, RepositoryLocator};
use crate::migration::{ConfigInvariantError, MigrationConfig};

/// Default name of the branch being migrated away from.
pub const DEFAULT_OLD_BRANCH: &str = "master";

/// Default name of the branch being migrated to.
pub const DEFAULT_NEW_BRANCH: &str = "main";

/// Failures while resolving the configuration into run inputs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No repository owner was supplied.
    #[error("repository owner is required (--owner or REBRANCH_OWNER)")]
    MissingOwner,

    /// No repository name was supplied.
    #[error("repository name is required (--repo or REBRANCH_REPO)")]
    MissingRepo,

    /// No authentication token was supplied.
    #[error("personal access token is required (--token, REBRANCH_TOKEN, or GITHUB_TOKEN)")]
    MissingToken,

    /// Owner, repository, branch, or token validation failed.
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// The branch-name pair violates a migration invariant.
    #[error(transparent)]
    Invariant(#[from] ConfigInvariantError),

    /// ortho-config failed to parse arguments or load configuration files.
    #[error("configuration error: {message}")]
    Load {
        /// Loader error detail.
        message: String,
    },
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `REBRANCH_OWNER` or `--owner`: Repository owner
/// - `REBRANCH_REPO` or `--repo`: Repository name
/// - `REBRANCH_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `REBRANCH_HOST` or `--host`: GitHub Enterprise base URL
/// - `REBRANCH_OLD_BRANCH` or `--old-branch`: Branch to migrate away from
/// - `REBRANCH_NEW_BRANCH` or `--new-branch`: Branch to migrate to
/// - `REBRANCH_FORCE` or `--force`: Skip the confirmation prompt
/// - `REBRANCH_EXECUTE` or `--execute`: Perform mutating calls (absence
///   means simulate-only)
/// - `REBRANCH_SKIP_ISSUES` or `--skip-issues`: Do not open advisory issues
/// - `REBRANCH_SKIP_PLATFORM_STEPS` or `--skip-platform-steps`: Omit the
///   deployment-config and build-tooling advisory issues
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REBRANCH",
    discovery(
        dotfile_name = ".rebranch.toml",
        config_file_name = "rebranch.toml",
        app_name = "rebranch"
    )
)]
pub struct RebranchConfig {
    /// Repository owner (e.g. "octocat").
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g. "hello-world").
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Personal access token for GitHub API authentication.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub instance, for GitHub Enterprise deployments.
    /// Defaults to `github.com`.
    pub host: Option<String>,

    /// Branch to migrate away from. Defaults to `master`.
    pub old_branch: Option<String>,

    /// Branch to migrate to. Defaults to `main`.
    pub new_branch: Option<String>,

    /// Skip the confirmation prompt, logging the risk message instead.
    pub force: bool,

    /// Perform mutating remote calls. Without this flag the run is a
    /// simulation: reads and validation happen for real, writes do not.
    pub execute: bool,

    /// Do not open advisory issues for follow-up work.
    pub skip_issues: bool,

    /// Omit the deployment-config and build-tooling advisory issues.
    pub skip_platform_steps: bool,
}

impl RebranchConfig {
    /// Resolves the repository locator from owner and repo values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOwner`] or [`ConfigError::MissingRepo`]
    /// when a part is absent, or a locator error when a part is blank.
    pub fn locator(&self) -> Result<RepositoryLocator, ConfigError> {
        let owner = self.owner.as_deref().ok_or(ConfigError::MissingOwner)?;
        let repo = self.repo.as_deref().ok_or(ConfigError::MissingRepo)?;
        let locator = match self.host.as_deref() {
            Some(host) => RepositoryLocator::for_host(host, owner, repo)?,
            None => RepositoryLocator::from_owner_repo(owner, repo)?,
        };
        Ok(locator)
    }

    /// Resolves the personal access token, falling back to the legacy
    /// `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] when neither source supplies a
    /// token.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, ConfigError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ConfigError::MissingToken)?;
        Ok(PersonalAccessToken::new(value)?)
    }

    /// Converts the loaded values into the immutable migration config,
    /// applying the branch-name defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invariant`] when the branch names are equal
    /// or blank.
    pub fn migration(&self) -> Result<MigrationConfig, ConfigError> {
        let old_branch = self.old_branch.as_deref().unwrap_or(DEFAULT_OLD_BRANCH);
        let new_branch = self.new_branch.as_deref().unwrap_or(DEFAULT_NEW_BRANCH);

        Ok(MigrationConfig::new(
            old_branch,
            new_branch,
            self.force,
            self.execute,
            !self.skip_issues,
            !self.skip_platform_steps,
        )?)
    }
}

#[cfg(test)]
mod tests;
