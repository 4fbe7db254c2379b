//! Operator confirmation gate invoked once, after reads and before writes.

use std::io::{self, BufRead, Write};

use super::report::MigrationError;

/// Operator decision returned by a confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Continue into the mutating steps.
    Proceed,
    /// Abort the run before any mutation.
    Abort,
}

/// Severity of the risk message shown for a given impact count. Ordered so
/// that a larger impacted count never maps to a lower severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// No open pull requests are affected.
    Low,
    /// A handful of pull requests will be retargeted.
    Moderate,
    /// A large number of pull requests will be retargeted.
    Severe,
}

/// Impact-count thresholds at which the risk message escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskThresholds {
    /// Counts at or above this are at least [`Severity::Moderate`].
    pub moderate: u64,
    /// Counts at or above this are [`Severity::Severe`].
    pub severe: u64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate: 1,
            severe: 10,
        }
    }
}

impl RiskThresholds {
    /// Maps an impacted count to its severity. Monotonically non-decreasing
    /// in the count.
    #[must_use]
    pub const fn severity(&self, impacted: u64) -> Severity {
        if impacted >= self.severe {
            Severity::Severe
        } else if impacted >= self.moderate {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

/// Builds the risk message presented before the prompt.
#[must_use]
pub fn risk_message(impacted: u64, thresholds: &RiskThresholds) -> String {
    match thresholds.severity(impacted) {
        Severity::Low => "No open pull requests target the old branch.".to_owned(),
        Severity::Moderate => format!(
            "{impacted} open pull request(s) target the old branch and will be retargeted."
        ),
        Severity::Severe => format!(
            "Caution: {impacted} open pull requests target the old branch; every one of them \
             will be retargeted."
        ),
    }
}

/// Obtains or synthesises operator consent before the mutating steps run.
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationGate: Send + Sync {
    /// Presents the impacted pull-request count and returns the operator's
    /// decision.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Prompt`] when the interactive prompt
    /// cannot be read or written.
    fn confirm(&self, impacted: u64) -> Result<Decision, MigrationError>;
}

/// Interactive gate backed by the controlling terminal.
///
/// With `force` set the gate logs the computed risk message and proceeds
/// without prompting. Otherwise it blocks on a yes/no question defaulting
/// to yes; only an explicit "n"/"no" aborts.
#[derive(Debug, Clone)]
pub struct TerminalGate {
    force: bool,
    thresholds: RiskThresholds,
}

impl TerminalGate {
    /// Creates a gate with the default thresholds.
    #[must_use]
    pub fn new(force: bool) -> Self {
        Self {
            force,
            thresholds: RiskThresholds::default(),
        }
    }

    /// Overrides the escalation thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    fn prompt_decision<R: BufRead, W: Write>(
        &self,
        impacted: u64,
        input: &mut R,
        output: &mut W,
    ) -> Result<Decision, MigrationError> {
        let message = risk_message(impacted, &self.thresholds);
        write!(output, "{message}\nProceed with the migration? [Y/n] ").map_err(|error| {
            MigrationError::Prompt {
                message: error.to_string(),
            }
        })?;
        output.flush().map_err(|error| MigrationError::Prompt {
            message: error.to_string(),
        })?;

        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .map_err(|error| MigrationError::Prompt {
                message: error.to_string(),
            })?;

        Ok(parse_answer(&answer))
    }
}

/// Interprets a prompt answer; everything except an explicit no proceeds.
fn parse_answer(answer: &str) -> Decision {
    match answer.trim().to_lowercase().as_str() {
        "n" | "no" => Decision::Abort,
        _ => Decision::Proceed,
    }
}

impl ConfirmationGate for TerminalGate {
    fn confirm(&self, impacted: u64) -> Result<Decision, MigrationError> {
        if self.force {
            tracing::info!(
                impacted,
                "force set, skipping prompt: {}",
                risk_message(impacted, &self.thresholds)
            );
            return Ok(Decision::Proceed);
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let stderr = io::stderr();
        let mut output = stderr.lock();
        self.prompt_decision(impacted, &mut input, &mut output)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Decision, RiskThresholds, Severity, TerminalGate, parse_answer, risk_message};

    #[rstest]
    #[case("", Decision::Proceed)]
    #[case("\n", Decision::Proceed)]
    #[case("y", Decision::Proceed)]
    #[case("Yes", Decision::Proceed)]
    #[case("whatever", Decision::Proceed)]
    #[case("n", Decision::Abort)]
    #[case("NO", Decision::Abort)]
    fn prompt_defaults_to_yes(#[case] answer: &str, #[case] expected: Decision) {
        assert_eq!(parse_answer(answer), expected, "answer {answer:?}");
    }

    #[rstest]
    fn severity_is_monotonic_in_the_impact_count() {
        let thresholds = RiskThresholds::default();
        let mut previous = Severity::Low;
        for impacted in 0..32_u64 {
            let severity = thresholds.severity(impacted);
            assert!(
                severity >= previous,
                "severity regressed at {impacted}: {severity:?} < {previous:?}"
            );
            previous = severity;
        }
    }

    #[rstest]
    fn higher_count_reaches_severe_before_lower() {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.severity(0), Severity::Low, "zero impact");
        assert_eq!(thresholds.severity(2), Severity::Moderate, "small impact");
        assert_eq!(thresholds.severity(25), Severity::Severe, "large impact");
    }

    #[rstest]
    fn risk_message_names_the_count() {
        let thresholds = RiskThresholds::default();
        assert!(
            risk_message(3, &thresholds).contains('3'),
            "message should include the count"
        );
    }

    #[rstest]
    fn scripted_prompt_aborts_on_no() {
        let gate = TerminalGate::new(false);
        let mut input = b"no\n".as_slice();
        let mut output = Vec::new();
        let decision = gate
            .prompt_decision(2, &mut input, &mut output)
            .unwrap_or(Decision::Proceed);
        assert_eq!(decision, Decision::Abort, "explicit no should abort");
        assert!(
            String::from_utf8_lossy(&output).contains("[Y/n]"),
            "prompt should offer the default"
        );
    }
}
