//! CLI output: the run report, follow-up instructions, and exit codes.

use std::io::{self, Write};
use std::process::ExitCode;

use thiserror::Error;

use rebranch::migration::notices;
use rebranch::{
    BranchName, ConfigError, GatewayError, MigrationError, MigrationReport, StepOutcome,
    TerminalState,
};

/// Failures surfaced by the CLI entrypoint.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The gateway could not be constructed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A notice template failed to render.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// Report output could not be written.
    #[error("output error: {message}")]
    Output {
        /// I/O error detail.
        message: String,
    },
}

fn io_error(error: &io::Error) -> CliError {
    CliError::Output {
        message: error.to_string(),
    }
}

/// Writes the run report to stdout.
///
/// # Errors
///
/// Returns [`CliError::Output`] when writing fails.
pub fn write_report(report: &MigrationReport) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    write_report_to(&mut stdout, report)
}

/// Writes the run report to the given writer: one line per executed step
/// followed by a terminal summary.
///
/// # Errors
///
/// Returns [`CliError::Output`] when writing fails.
pub fn write_report_to<W: Write>(
    writer: &mut W,
    report: &MigrationReport,
) -> Result<(), CliError> {
    for result in report.steps() {
        writeln!(
            writer,
            "{marker} {label}",
            marker = outcome_marker(&result.outcome),
            label = result.name.label()
        )
        .map_err(|e| io_error(&e))?;
        if let StepOutcome::Failed(error) = &result.outcome {
            writeln!(writer, "      {error}").map_err(|e| io_error(&e))?;
        }
    }

    let summary = match report.terminal() {
        TerminalState::Completed => "Migration completed.".to_owned(),
        TerminalState::Aborted => "Migration aborted; nothing was changed.".to_owned(),
        TerminalState::Failed { step } => {
            format!("Migration failed at: {label}.", label = step.label())
        }
    };
    writeln!(writer, "\n{summary}").map_err(|e| io_error(&e))
}

const fn outcome_marker(outcome: &StepOutcome) -> &'static str {
    match outcome {
        StepOutcome::Succeeded => "  ok ",
        StepOutcome::SkippedNotApplicable => "skip ",
        StepOutcome::Simulated => " sim ",
        StepOutcome::Failed(_) => "FAIL ",
    }
}

/// Writes the local follow-up instructions shown after a successful execute
/// run.
///
/// # Errors
///
/// Returns [`CliError::Migration`] when rendering fails or
/// [`CliError::Output`] when writing fails.
pub fn write_follow_up(old: &BranchName, new: &BranchName) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    write_follow_up_to(&mut stdout, old, new)
}

/// Writes the follow-up instructions to the given writer.
///
/// # Errors
///
/// Returns [`CliError::Migration`] when rendering fails or
/// [`CliError::Output`] when writing fails.
pub fn write_follow_up_to<W: Write>(
    writer: &mut W,
    old: &BranchName,
    new: &BranchName,
) -> Result<(), CliError> {
    let instructions = notices::follow_up_instructions(old, new)?;
    writeln!(writer, "\n{instructions}").map_err(|e| io_error(&e))
}

/// Maps the terminal state to the process exit code. Only a completed run
/// exits zero; an operator abort is still a non-zero exit so that scripts
/// can tell the branch was not migrated.
#[must_use]
pub const fn exit_code(report: &MigrationReport) -> ExitCode {
    match report.terminal() {
        TerminalState::Completed => ExitCode::SUCCESS,
        TerminalState::Aborted | TerminalState::Failed { .. } => ExitCode::FAILURE,
    }
}
