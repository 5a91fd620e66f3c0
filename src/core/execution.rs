//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! Runs test units one after another: setup, body, teardown. A body is any
//! [`TestBody`]; scripts loaded from `.test` files are one implementation,
//! plain Rust closures ([`FnBody`]) another.
//!
//! 依次运行测试单元：准备、测试体、拆除。测试体可以是任意 [`TestBody`]；
//! 从 `.test` 文件加载的脚本是一种实现，普通 Rust 闭包（[`FnBody`]）是另一种。

use colored::*;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    core::{
        assertions::{self, AssertionResult},
        config::HarnessConfig,
        error::HarnessError,
        models::{FailFast, RunState, RunSummary, TestUnit, UnitOutcome, UnitReport},
        planner,
        script,
    },
    infra::{
        command::{self, CommandOutput},
        fs::{self, ExecutionContext},
        t,
    },
    reporting::console::{print_summary, Reporter},
};

/// Why a body stopped before reaching its end.
/// 测试体在到达结尾之前停止的原因。
#[derive(Debug)]
pub enum Interrupt {
    /// An assertion failed with fail-fast on / 快速失败模式下断言失败
    FailFast,
    /// The body could not continue / 测试体无法继续
    Error(HarnessError),
}

impl From<FailFast> for Interrupt {
    fn from(_: FailFast) -> Self {
        Interrupt::FailFast
    }
}

impl From<HarnessError> for Interrupt {
    fn from(e: HarnessError) -> Self {
        Interrupt::Error(e)
    }
}

/// The executable part of a test unit.
///
/// Implementations evaluate assertions and perform side effects through the
/// [`UnitContext`]. Fail-fast arrives as `Err(FailFast)` from the assertion
/// methods and should be propagated with `?`.
pub trait TestBody: Send + Sync {
    fn run<'a, 'b: 'a>(
        &'a self,
        cx: &'a mut UnitContext<'b>,
    ) -> BoxFuture<'a, Result<(), Interrupt>>;
}

/// A body backed by a synchronous Rust closure.
/// 由同步 Rust 闭包支撑的测试体。
pub struct FnBody<F>(pub F);

impl<F> TestBody for FnBody<F>
where
    F: Fn(&mut UnitContext<'_>) -> Result<(), Interrupt> + Send + Sync,
{
    fn run<'a, 'b: 'a>(
        &'a self,
        cx: &'a mut UnitContext<'b>,
    ) -> BoxFuture<'a, Result<(), Interrupt>> {
        let result = (self.0)(cx);
        Box::pin(async move { result })
    }
}

/// What a body sees while it runs: the workspace, the reporter and the
/// variables captured from earlier shell commands.
///
/// 测试体运行时可见的内容：工作区、报告器以及之前 shell 命令捕获的变量。
pub struct UnitContext<'a> {
    env: &'a ExecutionContext,
    reporter: &'a mut Reporter,
    vars: BTreeMap<String, String>,
}

impl<'a> UnitContext<'a> {
    pub fn new(
        env: &'a ExecutionContext,
        reporter: &'a mut Reporter,
        vars: BTreeMap<String, String>,
    ) -> Self {
        Self { env, reporter, vars }
    }

    pub fn workdir(&self) -> &Path {
        self.env.workdir()
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.env.resolve(path)
    }

    /// Looks a variable up in the captured/exported set, then the process environment.
    pub fn var(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }

    /// Expands `$name` and `${name}` references. Unknown names are left as written.
    pub fn expand(&self, input: &str) -> String {
        shellexpand::env_with_context_no_errors(input, |name| self.var(name)).into_owned()
    }

    /// Runs a shell command in the workspace and records its `stdout`,
    /// `stderr` and `status`. They are visible to later expansions and
    /// exported to later commands.
    pub async fn sh(&mut self, script: &str) -> std::io::Result<CommandOutput> {
        let output = command::run_shell(script, self.env.workdir(), &self.vars).await?;
        debug!(status = output.status, "shell command finished");
        self.vars.insert("stdout".into(), output.stdout.clone());
        self.vars.insert("stderr".into(), output.stderr.clone());
        self.vars.insert("status".into(), output.status.to_string());
        Ok(output)
    }

    /// Hands a result to the reporter.
    pub fn report(&mut self, result: &AssertionResult) -> Result<(), FailFast> {
        self.reporter.report(result)
    }

    pub fn string_equal(&mut self, description: &str, actual: &str, expected: &str) -> Result<(), FailFast> {
        self.report(&assertions::string_equal(description, actual, expected))
    }

    pub fn array_equal<A, E>(&mut self, description: &str, actual: &[A], expected: &[E]) -> Result<(), FailFast>
    where
        A: AsRef<str>,
        E: AsRef<str>,
    {
        self.report(&assertions::array_equal(description, actual, expected))
    }

    /// Relative paths resolve against the workspace; the report shows the path as given.
    pub fn path_exists(&mut self, description: &str, path: impl AsRef<Path>) -> Result<(), FailFast> {
        let path = path.as_ref();
        let mut result = assertions::path_exists(description, &self.resolve(path));
        result.args = vec![path.display().to_string()];
        self.report(&result)
    }

    pub fn path_not_exists(&mut self, description: &str, path: impl AsRef<Path>) -> Result<(), FailFast> {
        let path = path.as_ref();
        let mut result = assertions::path_not_exists(description, &self.resolve(path));
        result.args = vec![path.display().to_string()];
        self.report(&result)
    }

    pub fn exit_code_success(&mut self, description: &str, code: i64) -> Result<(), FailFast> {
        self.report(&assertions::exit_code_success(description, code))
    }

    pub fn exit_code_failure(&mut self, description: &str, code: i64) -> Result<(), FailFast> {
        self.report(&assertions::exit_code_failure(description, code))
    }
}

enum Finished {
    Body(Result<(), Interrupt>),
    TimedOut(Duration),
    Cancelled,
}

/// Sequential unit runner. Owns the reporter (and with it the run state) for
/// the whole run; [`Runner::finish`] hands both back.
///
/// 顺序单元运行器。在整个运行期间持有报告器（以及运行状态）；
/// [`Runner::finish`] 将二者交还。
pub struct Runner {
    fixture_root: PathBuf,
    config: HarnessConfig,
    reporter: Reporter,
    timeout: Option<Duration>,
    cancel: CancellationToken,
    reports: Vec<UnitReport>,
}

impl Runner {
    pub fn new(fixture_root: impl Into<PathBuf>, config: HarnessConfig, state: RunState) -> Self {
        let timeout = config.timeout_secs.map(Duration::from_secs);
        Self {
            fixture_root: fixture_root.into(),
            config,
            reporter: Reporter::new(state),
            timeout,
            cancel: CancellationToken::new(),
            reports: Vec::new(),
        }
    }

    /// Overrides the per-unit timeout taken from the config.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn state(&self) -> &RunState {
        self.reporter.state()
    }

    pub fn reports(&self) -> &[UnitReport] {
        &self.reports
    }

    /// Discovers, selects and runs every unit, then prints the summary.
    pub async fn run_all(mut self) -> RunSummary {
        let filter = self.state().unit_filter.clone();
        let plan = match planner::plan_execution(
            &self.fixture_root,
            &self.config.extension,
            filter.as_deref(),
        ) {
            Ok(plan) => plan,
            Err(HarnessError::UnitNotFound { name, dir }) => {
                println!(
                    "{}",
                    t!("run.unit_not_found", name = name, dir = dir.display()).red()
                );
                self.reporter.mark_failed();
                return self.finish();
            }
            Err(e) => {
                println!("{}", t!("run.discovery_failed", error = e).red());
                self.reporter.mark_failed();
                return self.finish();
            }
        };

        if plan.units.is_empty() {
            println!(
                "{}",
                t!("run.no_units", dir = self.fixture_root.display(), ext = self.config.extension).yellow()
            );
            return self.finish();
        }

        info!(
            discovered = plan.discovered,
            selected = plan.units.len(),
            filtered = plan.is_filtered,
            "execution plan ready"
        );

        for unit in &plan.units {
            let outcome = self.run_one(unit).await;
            let fail_fast = self.state().fail_fast;
            if outcome.stops_run() || (fail_fast && outcome.is_failure()) {
                debug!(unit = %unit, "stopping run early");
                break;
            }
        }

        let summary = self.finish();
        print_summary(&summary);
        summary
    }

    /// Loads the unit's script and runs it.
    pub async fn run_one(&mut self, unit: &TestUnit) -> UnitOutcome {
        match script::load_script(&unit.path) {
            Ok(body) => self.run_body(unit, &body).await,
            Err(e) => {
                self.reporter.print_banner(unit);
                self.record(unit, UnitOutcome::Errored(e.to_string()), Duration::ZERO)
            }
        }
    }

    /// setup → body → teardown for one unit. Teardown runs whatever the body
    /// did, including fail-fast, timeout and cancellation.
    pub async fn run_body(&mut self, unit: &TestUnit, body: &dyn TestBody) -> UnitOutcome {
        self.reporter.print_banner(unit);
        let start = Instant::now();

        let prepared = if self.state().skip_setup {
            fs::in_place(&self.fixture_root)
        } else {
            fs::setup(&self.fixture_root)
        };
        let ctx = match prepared {
            Ok(ctx) => ctx,
            Err(e) => {
                return self.record(unit, UnitOutcome::Errored(e.to_string()), start.elapsed());
            }
        };

        let vars = self.exported_vars(ctx.origin());
        let cancel = self.cancel.clone();
        let timeout = self.timeout;

        let finished = {
            let mut cx = UnitContext::new(&ctx, &mut self.reporter, vars);
            let body_future = body.run(&mut cx);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Finished::Cancelled,
                res = with_timeout(timeout, body_future) => match res {
                    Ok(result) => Finished::Body(result),
                    Err(limit) => Finished::TimedOut(limit),
                },
            }
        };

        fs::teardown(ctx);

        let outcome = match finished {
            Finished::Body(Ok(())) => {
                if self.reporter.failed_in_unit() {
                    UnitOutcome::Failed
                } else {
                    UnitOutcome::Passed
                }
            }
            Finished::Body(Err(Interrupt::FailFast)) => UnitOutcome::Aborted,
            Finished::Body(Err(Interrupt::Error(e))) => UnitOutcome::Errored(e.to_string()),
            Finished::TimedOut(limit) => UnitOutcome::TimedOut(limit),
            Finished::Cancelled => UnitOutcome::Cancelled,
        };
        self.record(unit, outcome, start.elapsed())
    }

    /// Ends the run and returns the collected reports and final state.
    pub fn finish(self) -> RunSummary {
        RunSummary {
            units: self.reports,
            state: self.reporter.into_state(),
        }
    }

    fn record(&mut self, unit: &TestUnit, outcome: UnitOutcome, duration: Duration) -> UnitOutcome {
        if outcome.is_failure() {
            self.reporter.mark_failed();
        }
        self.reporter.print_unit_problem(unit, &outcome);
        let (passed, failed) = self.reporter.take_counts();
        self.reports.push(UnitReport {
            name: unit.name.clone(),
            outcome: outcome.clone(),
            passed,
            failed,
            duration,
        });
        outcome
    }

    fn exported_vars(&self, origin: &Path) -> BTreeMap<String, String> {
        let mut vars = self.config.env.clone();
        vars.insert("HARNESS_FIXTURES".into(), origin.display().to_string());
        if self.state().verbose {
            vars.insert("HARNESS_VERBOSE".into(), "1".into());
        }
        vars
    }
}

async fn with_timeout<F: Future>(limit: Option<Duration>, future: F) -> Result<F::Output, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await.map_err(|_| limit),
        None => Ok(future.await),
    }
}
