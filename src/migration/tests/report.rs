//! Tests for step ordering, phases, and the report accessors.

use rstest::rstest;

use crate::migration::{
    MigrationError, MigrationReport, RunPhase, StepName, StepOutcome, StepResult, TerminalState,
};

#[rstest]
fn sequence_covers_every_step_exactly_once() {
    assert_eq!(StepName::SEQUENCE.len(), 11, "pipeline length");
    for (index, step) in StepName::SEQUENCE.iter().enumerate() {
        let duplicates = StepName::SEQUENCE
            .iter()
            .skip(index + 1)
            .filter(|other| *other == step)
            .count();
        assert_eq!(duplicates, 0, "step {step} appears twice");
    }
}

#[rstest]
fn phases_never_move_backwards_along_the_sequence() {
    let mut previous = RunPhase::NotStarted;
    for step in StepName::SEQUENCE {
        let phase = step.phase();
        assert!(
            phase >= previous,
            "phase regressed at {step}: {phase:?} < {previous:?}"
        );
        previous = phase;
    }
    assert_eq!(previous, RunPhase::Finalising, "the pipeline ends finalising");
}

#[rstest]
fn confirmation_sits_between_validation_and_migration() {
    assert_eq!(
        StepName::ConfirmWithOperator.phase(),
        RunPhase::AwaitingConfirmation,
        "confirmation phase"
    );
    assert!(
        RunPhase::Validating < RunPhase::AwaitingConfirmation
            && RunPhase::AwaitingConfirmation < RunPhase::Migrating,
        "confirmation must separate reads from writes"
    );
}

#[rstest]
fn report_exposes_outcomes_by_step() {
    let report = MigrationReport::new(
        vec![
            StepResult {
                name: StepName::VerifyRepositoryExists,
                outcome: StepOutcome::Succeeded,
            },
            StepResult {
                name: StepName::VerifyOldBranchExists,
                outcome: StepOutcome::Failed(MigrationError::UserAborted),
            },
        ],
        TerminalState::Aborted,
    );

    assert!(!report.is_completed(), "aborted runs are not complete");
    assert_eq!(
        report.outcome(StepName::VerifyRepositoryExists),
        Some(&StepOutcome::Succeeded),
        "recorded step"
    );
    assert_eq!(
        report.outcome(StepName::DeleteOldBranch),
        None,
        "steps that never ran have no outcome"
    );
}

#[rstest]
fn labels_are_unique_and_human_readable() {
    let mut labels: Vec<&str> = StepName::SEQUENCE.iter().map(|step| step.label()).collect();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels.len(), StepName::SEQUENCE.len(), "labels collide");
}
