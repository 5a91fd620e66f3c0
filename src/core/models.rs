//! # Data Models Module / 数据模型模块
//!
//! Core data structures shared by the planner, the runner and the reporter:
//! discovered test units, the run-wide state accumulator and per-unit results.
//!
//! 规划器、运行器和报告器共享的核心数据结构：
//! 已发现的测试单元、运行级状态累加器以及单元级结果。

use crate::infra::t;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One discovered test-definition file.
/// 一个已发现的测试定义文件。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestUnit {
    /// File name with the test extension stripped / 去掉测试扩展名后的文件名
    pub name: String,
    /// Absolute path of the definition file / 定义文件的绝对路径
    pub path: PathBuf,
}

impl TestUnit {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for TestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Run-wide accumulator. Built once from the CLI flags and config, mutated by
/// the reporter when an assertion fails, read at exit for the exit code.
///
/// 运行级累加器。由 CLI 标志和配置构建一次，断言失败时由报告器修改，
/// 退出时读取以计算退出码。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    /// Set as soon as anything fails / 一旦有任何失败即置位
    pub failed: bool,
    /// Stop at the first assertion failure / 在第一个断言失败时停止
    pub fail_fast: bool,
    /// Forwarded to bodies as `HARNESS_VERBOSE=1` / 以 `HARNESS_VERBOSE=1` 转发给测试体
    pub verbose: bool,
    /// Run only this unit / 仅运行此单元
    pub unit_filter: Option<String>,
    /// Run bodies in place, without an isolated workspace / 原地运行，不创建隔离工作区
    pub skip_setup: bool,
}

impl RunState {
    pub fn exit_code(&self) -> u8 {
        if self.failed { 1 } else { 0 }
    }
}

/// How a single unit ended.
/// 单个单元的结束方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Every assertion passed / 所有断言均通过
    Passed,
    /// At least one assertion failed / 至少一个断言失败
    Failed,
    /// Fail-fast stopped the body at its first failure / 快速失败在第一次失败时停止了测试体
    Aborted,
    /// The body exceeded the per-unit timeout / 测试体超出了单元超时
    TimedOut(Duration),
    /// Setup, loading or a shell command failed before the body could finish.
    /// 在测试体完成之前，准备、加载或 shell 命令失败。
    Errored(String),
    /// Interrupted by Ctrl-C / 被 Ctrl-C 中断
    Cancelled,
}

impl UnitOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, UnitOutcome::Passed)
    }

    /// Whether the runner should stop scheduling further units after this one.
    pub fn stops_run(&self) -> bool {
        matches!(self, UnitOutcome::Aborted | UnitOutcome::Cancelled)
    }

    pub fn get_status_str(&self) -> String {
        match self {
            UnitOutcome::Passed => t!("report.status_passed").to_string(),
            UnitOutcome::Failed => t!("report.status_failed").to_string(),
            UnitOutcome::Aborted => t!("report.status_aborted").to_string(),
            UnitOutcome::TimedOut(_) => t!("report.status_timeout").to_string(),
            UnitOutcome::Errored(_) => t!("report.status_error").to_string(),
            UnitOutcome::Cancelled => t!("report.status_cancelled").to_string(),
        }
    }
}

/// Result of one unit, as collected for the end-of-run summary.
/// 单个单元的结果，用于运行结束时的摘要。
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub name: String,
    pub outcome: UnitOutcome,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// Everything the runner hands back to the CLI once the run is over.
/// 运行结束后运行器交还给 CLI 的全部内容。
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub units: Vec<UnitReport>,
    pub state: RunState,
}

impl RunSummary {
    pub fn exit_code(&self) -> u8 {
        self.state.exit_code()
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.outcome.is_failure())
    }
}

/// Signal raised by the reporter when fail-fast is on and an assertion fails.
/// Bodies propagate it with `?`; the runner tears the workspace down and stops.
///
/// 启用快速失败且断言失败时由报告器发出的信号。
/// 测试体通过 `?` 传播它；运行器拆除工作区并停止。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailFast;

impl fmt::Display for FailFast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fail-fast: stopping at first failure")
    }
}

impl std::error::Error for FailFast {}
