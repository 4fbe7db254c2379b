//! Step naming, outcomes, and the migration report.

use thiserror::Error;

use crate::github::GatewayError;

/// Failures recorded against a pipeline step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// A remote operation failed.
    #[error(transparent)]
    Remote(#[from] GatewayError),

    /// The operator declined the confirmation prompt. Distinct from remote
    /// failures so the report can show an aborted run rather than a broken
    /// one.
    #[error("operator declined the confirmation prompt")]
    UserAborted,

    /// The confirmation prompt itself could not be read or written.
    #[error("confirmation prompt failed: {message}")]
    Prompt {
        /// I/O error detail.
        message: String,
    },

    /// A notice template failed to render.
    #[error("notice rendering failed: {message}")]
    Template {
        /// Template engine error detail.
        message: String,
    },
}

/// The named steps of the migration pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepName {
    /// Read repository metadata to confirm the repository exists.
    VerifyRepositoryExists,
    /// Confirm the old branch exists.
    VerifyOldBranchExists,
    /// Confirm the new branch does not exist yet.
    VerifyNewBranchAbsent,
    /// Confirm the authenticated identity has admin permission.
    VerifyAdminPermission,
    /// Present the impact count and obtain operator consent.
    ConfirmWithOperator,
    /// Create the new branch at the old branch's tip.
    MigrateBranch,
    /// Repoint the repository default, when the old branch was default.
    UpdateDefaultBranch,
    /// Copy the protection rule to the new branch and remove the old one.
    MigrateBranchProtection,
    /// Retarget open pull requests based on the old branch.
    RetargetOpenPullRequests,
    /// Delete the old branch.
    DeleteOldBranch,
    /// Open advisory issues for follow-up work.
    FollowUpNotifications,
}

impl StepName {
    /// The fixed pipeline order. Each step's preconditions are the prior
    /// step's postconditions, so the sequence is not reorderable.
    pub const SEQUENCE: [Self; 11] = [
        Self::VerifyRepositoryExists,
        Self::VerifyOldBranchExists,
        Self::VerifyNewBranchAbsent,
        Self::VerifyAdminPermission,
        Self::ConfirmWithOperator,
        Self::MigrateBranch,
        Self::UpdateDefaultBranch,
        Self::MigrateBranchProtection,
        Self::RetargetOpenPullRequests,
        Self::DeleteOldBranch,
        Self::FollowUpNotifications,
    ];

    /// Human-readable step label used in the report and log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VerifyRepositoryExists => "verify repository exists",
            Self::VerifyOldBranchExists => "verify old branch exists",
            Self::VerifyNewBranchAbsent => "verify new branch absent",
            Self::VerifyAdminPermission => "verify admin permission",
            Self::ConfirmWithOperator => "confirm with operator",
            Self::MigrateBranch => "migrate branch",
            Self::UpdateDefaultBranch => "update default branch",
            Self::MigrateBranchProtection => "migrate branch protection",
            Self::RetargetOpenPullRequests => "retarget open pull requests",
            Self::DeleteOldBranch => "delete old branch",
            Self::FollowUpNotifications => "follow-up notifications",
        }
    }

    /// The pipeline phase this step belongs to.
    #[must_use]
    pub const fn phase(self) -> RunPhase {
        match self {
            Self::VerifyRepositoryExists
            | Self::VerifyOldBranchExists
            | Self::VerifyNewBranchAbsent
            | Self::VerifyAdminPermission => RunPhase::Validating,
            Self::ConfirmWithOperator => RunPhase::AwaitingConfirmation,
            Self::MigrateBranch
            | Self::UpdateDefaultBranch
            | Self::MigrateBranchProtection
            | Self::RetargetOpenPullRequests
            | Self::DeleteOldBranch => RunPhase::Migrating,
            Self::FollowUpNotifications => RunPhase::Finalising,
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pipeline phases, in order. There is no retry transition; a run moves
/// forward through these phases exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    /// No step has run yet.
    NotStarted,
    /// Precondition reads (steps 1-4).
    Validating,
    /// Blocking on operator consent (step 5).
    AwaitingConfirmation,
    /// Mutating the remote repository (steps 6-10).
    Migrating,
    /// Best-effort follow-up work (step 11).
    Finalising,
}

/// Outcome of a single pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and its remote effects are applied.
    Succeeded,
    /// The step did not apply to this repository and was deliberately
    /// skipped, recorded rather than silently omitted.
    SkippedNotApplicable,
    /// Dry-run: the step's reads ran but its mutations were withheld.
    Simulated,
    /// The step failed; the pipeline halts after recording it.
    Failed(MigrationError),
}

/// A named step together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// The step that produced this result.
    pub name: StepName,
    /// How the step finished.
    pub outcome: StepOutcome,
}

/// Terminal state of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalState {
    /// Every step finished without failure.
    Completed,
    /// The operator declined the confirmation prompt.
    Aborted,
    /// A step failed and halted the pipeline.
    Failed {
        /// The step that failed.
        step: StepName,
    },
}

/// Ordered record of the run, appended as the orchestrator progresses and
/// terminal once the pipeline halts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    steps: Vec<StepResult>,
    terminal: TerminalState,
}

impl MigrationReport {
    pub(crate) fn new(steps: Vec<StepResult>, terminal: TerminalState) -> Self {
        Self { steps, terminal }
    }

    /// Builds a report from recorded parts, for exercising report consumers
    /// in tests.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn from_parts(steps: Vec<StepResult>, terminal: TerminalState) -> Self {
        Self::new(steps, terminal)
    }

    /// Results for the steps that ran, in pipeline order.
    #[must_use]
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    /// Terminal state of the run.
    #[must_use]
    pub const fn terminal(&self) -> &TerminalState {
        &self.terminal
    }

    /// Whether the run completed without failure or abort.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.terminal, TerminalState::Completed)
    }

    /// The outcome recorded for a step, when the step ran.
    #[must_use]
    pub fn outcome(&self, name: StepName) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|result| result.name == name)
            .map(|result| &result.outcome)
    }
}
