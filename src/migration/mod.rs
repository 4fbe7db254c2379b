//! Branch-migration pipeline: configuration, step sequencing, protection
//! transformation, operator confirmation, and generated notices.
//!
//! The orchestrator drives a fixed, fail-fast sequence of named steps over
//! a [`crate::github::RepositoryGateway`], producing a [`MigrationReport`]
//! with one result per step. Dry-run performs every read and validation for
//! real while recording mutating steps as simulated.

pub mod config;
pub mod confirm;
pub mod notices;
pub mod orchestrator;
pub mod protection;
pub mod report;

pub use config::{ConfigInvariantError, MigrationConfig};
pub use confirm::{ConfirmationGate, Decision, RiskThresholds, Severity, TerminalGate};
pub use orchestrator::BranchMigration;
pub use report::{
    MigrationError, MigrationReport, RunPhase, StepName, StepOutcome, StepResult, TerminalState,
};

#[cfg(test)]
pub use confirm::MockConfirmationGate;

#[cfg(test)]
mod tests;
