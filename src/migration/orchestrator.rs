//! The migration orchestrator: a single loop over the fixed step sequence.

use tracing::{debug, info, warn};

use crate::github::{
    BranchName, GatewayError, Lookup, NewIssue, PermissionLevel, ProtectionStatus,
    RepositoryGateway, RepositoryLocator,
};

use super::config::MigrationConfig;
use super::confirm::{ConfirmationGate, Decision};
use super::notices;
use super::protection::creation_payload;
use super::report::{
    MigrationError, MigrationReport, RunPhase, StepName, StepOutcome, StepResult, TerminalState,
};

/// Drives the ordered, fail-fast migration pipeline against a gateway.
///
/// Steps run strictly in sequence; each step's preconditions are the prior
/// step's postconditions. The first failure halts the pipeline with no
/// compensation of already-applied steps.
pub struct BranchMigration<'run, Gateway, Gate>
where
    Gateway: RepositoryGateway,
    Gate: ConfirmationGate,
{
    gateway: &'run Gateway,
    gate: &'run Gate,
    locator: &'run RepositoryLocator,
    config: &'run MigrationConfig,
    phase: RunPhase,
}

impl<'run, Gateway, Gate> BranchMigration<'run, Gateway, Gate>
where
    Gateway: RepositoryGateway,
    Gate: ConfirmationGate,
{
    /// Creates an orchestrator for a single run.
    #[must_use]
    pub const fn new(
        gateway: &'run Gateway,
        gate: &'run Gate,
        locator: &'run RepositoryLocator,
        config: &'run MigrationConfig,
    ) -> Self {
        Self {
            gateway,
            gate,
            locator,
            config,
            phase: RunPhase::NotStarted,
        }
    }

    /// Runs the pipeline to its terminal state.
    ///
    /// The report carries one result per executed step; steps after the
    /// first failure never run.
    pub async fn run(mut self) -> MigrationReport {
        let mut results = Vec::with_capacity(StepName::SEQUENCE.len());

        for step in StepName::SEQUENCE {
            self.enter_phase(step.phase());
            debug!(step = step.label(), "running step");

            match self.execute(step).await {
                Ok(outcome) => {
                    debug!(step = step.label(), ?outcome, "step finished");
                    results.push(StepResult {
                        name: step,
                        outcome,
                    });
                }
                Err(error) => {
                    warn!(step = step.label(), %error, "step failed, halting");
                    let terminal = match error {
                        MigrationError::UserAborted => TerminalState::Aborted,
                        _ => TerminalState::Failed { step },
                    };
                    results.push(StepResult {
                        name: step,
                        outcome: StepOutcome::Failed(error),
                    });
                    return MigrationReport::new(results, terminal);
                }
            }
        }

        MigrationReport::new(results, TerminalState::Completed)
    }

    fn enter_phase(&mut self, phase: RunPhase) {
        if phase > self.phase {
            debug!(from = ?self.phase, to = ?phase, "phase transition");
            self.phase = phase;
        }
    }

    async fn execute(&self, step: StepName) -> Result<StepOutcome, MigrationError> {
        match step {
            StepName::VerifyRepositoryExists => self.verify_repository_exists().await,
            StepName::VerifyOldBranchExists => self.verify_old_branch_exists().await,
            StepName::VerifyNewBranchAbsent => self.verify_new_branch_absent().await,
            StepName::VerifyAdminPermission => self.verify_admin_permission().await,
            StepName::ConfirmWithOperator => self.confirm_with_operator().await,
            StepName::MigrateBranch => self.migrate_branch().await,
            StepName::UpdateDefaultBranch => self.update_default_branch().await,
            StepName::MigrateBranchProtection => self.migrate_branch_protection().await,
            StepName::RetargetOpenPullRequests => self.retarget_open_pull_requests().await,
            StepName::DeleteOldBranch => self.delete_old_branch().await,
            StepName::FollowUpNotifications => self.follow_up_notifications().await,
        }
    }

    const fn old(&self) -> &BranchName {
        self.config.old_branch()
    }

    const fn new_name(&self) -> &BranchName {
        self.config.new_branch()
    }

    async fn verify_repository_exists(&self) -> Result<StepOutcome, MigrationError> {
        let info = self.gateway.repository(self.locator).await?;
        info!(repository = info.full_name, "repository found");
        Ok(StepOutcome::Succeeded)
    }

    async fn verify_old_branch_exists(&self) -> Result<StepOutcome, MigrationError> {
        match self.gateway.branch(self.locator, self.old()).await? {
            Lookup::Found(branch) => {
                info!(branch = branch.name, tip = branch.tip_sha, "old branch found");
                Ok(StepOutcome::Succeeded)
            }
            Lookup::Absent => Err(GatewayError::not_found(format!(
                "branch {old}",
                old = self.old()
            ))
            .into()),
        }
    }

    async fn verify_new_branch_absent(&self) -> Result<StepOutcome, MigrationError> {
        // Absence is the success path here; it arrives as an ordinary
        // lookup result rather than as a caught read error.
        match self.gateway.branch(self.locator, self.new_name()).await? {
            Lookup::Absent => Ok(StepOutcome::Succeeded),
            Lookup::Found(_) => Err(GatewayError::already_exists(format!(
                "branch {new}",
                new = self.new_name()
            ))
            .into()),
        }
    }

    async fn verify_admin_permission(&self) -> Result<StepOutcome, MigrationError> {
        let identity = self.gateway.authenticated_identity().await?;
        let level = self
            .gateway
            .collaborator_permission(self.locator, &identity.login)
            .await?;

        if level == PermissionLevel::Admin {
            Ok(StepOutcome::Succeeded)
        } else {
            Err(GatewayError::PermissionDenied {
                message: format!(
                    "{login} has {level:?} permission on {slug}; admin is required",
                    login = identity.login,
                    slug = self.locator.slug()
                ),
            }
            .into())
        }
    }

    async fn confirm_with_operator(&self) -> Result<StepOutcome, MigrationError> {
        let impacted = self
            .gateway
            .count_open_pull_requests(self.locator, self.old())
            .await?;

        match self.gate.confirm(impacted)? {
            Decision::Proceed => Ok(StepOutcome::Succeeded),
            Decision::Abort => Err(MigrationError::UserAborted),
        }
    }

    async fn migrate_branch(&self) -> Result<StepOutcome, MigrationError> {
        if !self.config.execute() {
            info!(
                new = %self.new_name(),
                old = %self.old(),
                "dry-run: would create branch at the old tip"
            );
            return Ok(StepOutcome::Simulated);
        }

        let tip = match self.gateway.branch(self.locator, self.old()).await? {
            Lookup::Found(branch) => branch.tip_sha,
            Lookup::Absent => {
                return Err(GatewayError::not_found(format!(
                    "branch {old}",
                    old = self.old()
                ))
                .into());
            }
        };

        self.gateway
            .create_branch(self.locator, self.new_name(), &tip)
            .await?;
        info!(new = %self.new_name(), tip, "branch created");
        Ok(StepOutcome::Succeeded)
    }

    async fn update_default_branch(&self) -> Result<StepOutcome, MigrationError> {
        let default = self.gateway.default_branch(self.locator).await?;
        if default != self.old().as_str() {
            info!(default, "old branch is not the default, skipping");
            return Ok(StepOutcome::SkippedNotApplicable);
        }

        if !self.config.execute() {
            info!(new = %self.new_name(), "dry-run: would update default branch");
            return Ok(StepOutcome::Simulated);
        }

        self.gateway
            .update_default_branch(self.locator, self.new_name())
            .await?;
        info!(new = %self.new_name(), "default branch updated");
        Ok(StepOutcome::Succeeded)
    }

    async fn migrate_branch_protection(&self) -> Result<StepOutcome, MigrationError> {
        let status = self
            .gateway
            .branch_protection(self.locator, self.old())
            .await?;

        let rule = match status {
            ProtectionStatus::Unprotected => {
                info!(old = %self.old(), "old branch carries no protection, skipping");
                return Ok(StepOutcome::SkippedNotApplicable);
            }
            ProtectionStatus::Unsupported => {
                info!("repository plan does not support branch protection, skipping");
                return Ok(StepOutcome::SkippedNotApplicable);
            }
            ProtectionStatus::Protected(rule) => rule,
        };

        let payload = creation_payload(&rule);

        if !self.config.execute() {
            info!(new = %self.new_name(), "dry-run: would copy protection and unprotect old");
            return Ok(StepOutcome::Simulated);
        }

        self.gateway
            .set_branch_protection(self.locator, self.new_name(), &payload)
            .await?;
        // The old branch cannot be deleted later while still protected.
        self.gateway
            .delete_branch_protection(self.locator, self.old())
            .await?;
        info!(new = %self.new_name(), "protection migrated");
        Ok(StepOutcome::Succeeded)
    }

    async fn retarget_open_pull_requests(&self) -> Result<StepOutcome, MigrationError> {
        if !self.config.execute() {
            // Listing is deferred under dry-run: presenting a count here
            // would go stale by the time an execute run retargets.
            info!(old = %self.old(), "dry-run: would retarget open pull requests");
            return Ok(StepOutcome::Simulated);
        }

        // Each retarget removes a pull request from the query predicate, so
        // the first page is re-requested after every batch; the matching
        // set strictly shrinks, which guarantees termination.
        loop {
            let page = self
                .gateway
                .open_pull_requests_first_page(self.locator, self.old())
                .await?;
            if page.is_empty() {
                break;
            }

            for pull in page {
                self.gateway
                    .retarget_pull_request(self.locator, pull.number, self.new_name())
                    .await?;
                info!(number = pull.number, new = %self.new_name(), "pull request retargeted");
            }
        }

        Ok(StepOutcome::Succeeded)
    }

    async fn delete_old_branch(&self) -> Result<StepOutcome, MigrationError> {
        if !self.config.execute() {
            info!(old = %self.old(), "dry-run: would delete old branch");
            return Ok(StepOutcome::Simulated);
        }

        self.gateway.delete_branch(self.locator, self.old()).await?;
        info!(old = %self.old(), "old branch deleted");
        Ok(StepOutcome::Succeeded)
    }

    async fn follow_up_notifications(&self) -> Result<StepOutcome, MigrationError> {
        if !self.config.open_issues() {
            info!("issue opening disabled, skipping follow-up notifications");
            return Ok(StepOutcome::SkippedNotApplicable);
        }

        // Best-effort: every category is attempted even after one fails;
        // the first failure is reported once the rest have run.
        let mut first_failure: Option<MigrationError> = None;
        let mut record = |result: Result<(), MigrationError>| {
            if let Err(error) = result {
                warn!(%error, "follow-up category failed");
                if first_failure.is_none() {
                    first_failure = Some(error);
                }
            }
        };

        if self.config.platform_specific_steps() {
            record(self.deployment_config_issue().await);
        }
        record(self.references_issue().await);
        if self.config.platform_specific_steps() {
            record(self.build_issue().await);
        }

        match first_failure {
            Some(error) => Err(error),
            None if self.config.execute() => Ok(StepOutcome::Succeeded),
            None => Ok(StepOutcome::Simulated),
        }
    }

    async fn deployment_config_issue(&self) -> Result<(), MigrationError> {
        let term = format!("filename:{}", notices::DEPLOYMENT_CONFIG_FILENAME);
        let hits = self.gateway.search_code(self.locator, &term).await?;
        if hits.is_empty() {
            return Ok(());
        }

        let paths: Vec<String> = hits.into_iter().map(|hit| hit.path).collect();
        let body = notices::checklist_body(self.locator, self.old(), self.new_name(), &paths)?;
        self.open_advisory_issue(notices::DEPLOYMENT_ISSUE_TITLE.to_owned(), body)
            .await
    }

    async fn references_issue(&self) -> Result<(), MigrationError> {
        let hits = self
            .gateway
            .search_code(self.locator, self.old().as_str())
            .await?;
        if hits.is_empty() {
            return Ok(());
        }

        let paths: Vec<String> = hits.into_iter().map(|hit| hit.path).collect();
        let body = notices::checklist_body(self.locator, self.old(), self.new_name(), &paths)?;
        self.open_advisory_issue(notices::references_issue_title(self.old()), body)
            .await
    }

    async fn build_issue(&self) -> Result<(), MigrationError> {
        let body = notices::build_issue_body(self.old(), self.new_name())?;
        self.open_advisory_issue(notices::BUILD_ISSUE_TITLE.to_owned(), body)
            .await
    }

    async fn open_advisory_issue(
        &self,
        title: String,
        body: String,
    ) -> Result<(), MigrationError> {
        if !self.config.execute() {
            info!(title, "dry-run: would open advisory issue");
            return Ok(());
        }

        let issue = NewIssue {
            title,
            labels: vec![notices::ISSUE_LABEL.to_owned()],
            body,
        };
        let created = self.gateway.create_issue(self.locator, &issue).await?;
        info!(number = created.number, title = issue.title, "advisory issue opened");
        Ok(())
    }
}
