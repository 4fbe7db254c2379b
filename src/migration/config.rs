//! Immutable snapshot of operator intent for a migration run.

use thiserror::Error;

use crate::github::{BranchName, LocatorError};

/// Violations of the migration-config invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigInvariantError {
    /// Old and new branch names must differ.
    #[error("old and new branch names are both \"{name}\"")]
    MatchingBranchNames {
        /// The offending name.
        name: String,
    },

    /// A branch name failed validation.
    #[error(transparent)]
    Locator(#[from] LocatorError),
}

/// Operator intent, created once from validated input and owned by the
/// orchestrator for the run's duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    old_branch: BranchName,
    new_branch: BranchName,
    force: bool,
    execute: bool,
    open_issues: bool,
    platform_specific_steps: bool,
}

impl MigrationConfig {
    /// Builds a migration config, enforcing that the branch names differ.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigInvariantError::MatchingBranchNames`] when the two
    /// names are equal, or a locator error when either name is blank.
    pub fn new(
        old_branch: &str,
        new_branch: &str,
        force: bool,
        execute: bool,
        open_issues: bool,
        platform_specific_steps: bool,
    ) -> Result<Self, ConfigInvariantError> {
        let old = BranchName::new(old_branch)?;
        let new = BranchName::new(new_branch)?;
        if old == new {
            return Err(ConfigInvariantError::MatchingBranchNames {
                name: old.as_str().to_owned(),
            });
        }

        Ok(Self {
            old_branch: old,
            new_branch: new,
            force,
            execute,
            open_issues,
            platform_specific_steps,
        })
    }

    /// The branch being migrated away from.
    #[must_use]
    pub const fn old_branch(&self) -> &BranchName {
        &self.old_branch
    }

    /// The branch being migrated to.
    #[must_use]
    pub const fn new_branch(&self) -> &BranchName {
        &self.new_branch
    }

    /// Whether the confirmation prompt is bypassed.
    #[must_use]
    pub const fn force(&self) -> bool {
        self.force
    }

    /// Whether mutating remote calls are performed. `false` means
    /// simulate-only.
    #[must_use]
    pub const fn execute(&self) -> bool {
        self.execute
    }

    /// Whether advisory issues are opened at all.
    #[must_use]
    pub const fn open_issues(&self) -> bool {
        self.open_issues
    }

    /// Whether the deployment-config and build-tooling advisory issues are
    /// included.
    #[must_use]
    pub const fn platform_specific_steps(&self) -> bool {
        self.platform_specific_steps
    }
}
