//! Rebranch library crate for migrating a repository's default branch.
//!
//! The library wraps Octocrab to verify migration preconditions, copy
//! branch-protection configuration from the old branch to the new one,
//! retarget open pull requests, delete the old branch, and open advisory
//! issues for follow-up work. Remote access goes through a trait-based
//! gateway so that the migration pipeline can be exercised against fakes.

pub mod config;
pub mod github;
pub mod migration;

pub use config::{ConfigError, RebranchConfig};
pub use github::{
    BranchName, GatewayError, Lookup, OctocrabRepositoryGateway, PersonalAccessToken,
    ProtectionStatus, RepositoryGateway, RepositoryLocator,
};
pub use migration::{
    BranchMigration, ConfirmationGate, MigrationConfig, MigrationError, MigrationReport,
    RiskThresholds, StepName, StepOutcome, StepResult, TerminalGate, TerminalState,
};
