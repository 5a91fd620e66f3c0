//! # Console Reporting Module / 控制台报告模块
//!
//! Renders assertion results as they happen and the end-of-run summary. The
//! [`Reporter`] also owns the [`RunState`], so the only way the run becomes
//! "failed" is through it.
//!
//! 实时渲染断言结果以及运行结束时的摘要。[`Reporter`] 同时持有 [`RunState`]，
//! 因此运行只能通过它被标记为"失败"。

use colored::*;

use crate::core::assertions::{AssertionKind, AssertionResult};
use crate::core::models::{FailFast, RunState, RunSummary, TestUnit, UnitOutcome};
use crate::infra::t;

/// Prints results and accumulates the run-wide failure flag.
/// 打印结果并累积运行级失败标志。
#[derive(Debug, Default)]
pub struct Reporter {
    state: RunState,
    /// Assertion counts for the unit currently running / 当前运行单元的断言计数
    passed: usize,
    failed: usize,
}

impl Reporter {
    pub fn new(state: RunState) -> Self {
        Self {
            state,
            passed: 0,
            failed: 0,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn into_state(self) -> RunState {
        self.state
    }

    /// Routes one assertion result to the success or failure path.
    pub fn report(&mut self, result: &AssertionResult) -> Result<(), FailFast> {
        if result.passed {
            self.report_success(&result.description);
            Ok(())
        } else {
            self.report_failure(result.kind, &result.description, &result.args)
        }
    }

    /// Prints a one-line confirmation. Touches nothing but the pass counter.
    pub fn report_success(&mut self, description: &str) {
        self.passed += 1;
        println!("  {} {}", "✔".green(), description);
    }

    /// Prints the kind, the description and each argument on its own line,
    /// then marks the run failed.
    ///
    /// # Returns
    /// `Err(FailFast)` when fail-fast is enabled, telling the body to stop.
    pub fn report_failure(
        &mut self,
        kind: AssertionKind,
        description: &str,
        args: &[String],
    ) -> Result<(), FailFast> {
        self.failed += 1;
        self.state.failed = true;

        println!(
            "  {} {} {}",
            "✘".red(),
            format!("[{kind}]").red().bold(),
            description
        );
        for arg in args {
            println!("      {}", arg.yellow());
        }

        if self.state.fail_fast {
            println!("{}", t!("run.fail_fast_triggered").red().bold());
            Err(FailFast)
        } else {
            Ok(())
        }
    }

    /// Marks the run failed for something that is not an assertion, such as a
    /// setup error, a timeout or a missing unit.
    pub fn mark_failed(&mut self) {
        self.state.failed = true;
    }

    pub fn print_banner(&self, unit: &TestUnit) {
        println!("\n{}", t!("run.unit_banner", name = unit.name).blue().bold());
    }

    /// Prints why a unit ended other than by passing or failing assertions.
    pub fn print_unit_problem(&self, unit: &TestUnit, outcome: &UnitOutcome) {
        let line = match outcome {
            UnitOutcome::TimedOut(limit) => {
                t!("run.unit_timeout", name = unit.name, timeout = limit.as_secs())
            }
            UnitOutcome::Errored(message) => {
                t!("run.unit_error", name = unit.name, error = message)
            }
            UnitOutcome::Cancelled => t!("run.unit_cancelled", name = unit.name),
            _ => return,
        };
        println!("  {}", line.red());
    }

    /// Whether an assertion failed since the last [`Reporter::take_counts`].
    pub fn failed_in_unit(&self) -> bool {
        self.failed > 0
    }

    /// Returns and resets the assertion counts of the current unit.
    pub fn take_counts(&mut self) -> (usize, usize) {
        let counts = (self.passed, self.failed);
        self.passed = 0;
        self.failed = 0;
        counts
    }
}

/// Prints a formatted summary of unit outcomes to the console.
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed     | hello                          |   3 ok   0 failed |   12.40ms
///   - Failed     | mismatch                       |   0 ok   1 failed |    3.10ms
/// ```
pub fn print_summary(summary: &RunSummary) {
    if summary.units.is_empty() {
        return;
    }

    println!("\n{}", t!("test_summary_banner").bold());

    for unit in &summary.units {
        let status_str = unit.outcome.get_status_str();
        let status_colored = match unit.outcome {
            UnitOutcome::Passed => status_str.green(),
            UnitOutcome::Cancelled => status_str.dimmed(),
            _ => status_str.red(),
        };

        println!(
            "  - {:<10} | {:<30} | {:>3} ok {:>3} failed | {:>10}",
            status_colored,
            unit.name,
            unit.passed,
            unit.failed,
            format!("{:.2?}", unit.duration)
        );
    }

    if summary.exit_code() == 0 {
        println!("\n{}", t!("all_tests_passed").green().bold());
    } else {
        let failed = summary.failures().count();
        println!("\n{}", t!("some_tests_failed", count = failed).red().bold());
    }
}
