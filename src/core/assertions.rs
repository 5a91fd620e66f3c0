//! # Assertion Library / 断言库
//!
//! Stateless predicates. Each one takes a human-readable description plus the
//! values under test and produces exactly one [`AssertionResult`]. Nothing here
//! prints or mutates run state; reporting is the caller's job.
//!
//! 无状态的断言谓词。每个断言接收一条可读的描述以及被测值，
//! 并且只产生一个 [`AssertionResult`]。此处不打印也不修改运行状态；报告由调用方负责。

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The assertion that produced a result. The string form is the keyword used
/// in test scripts and in failure reports.
/// 产生结果的断言种类。其字符串形式即测试脚本和失败报告中使用的关键字。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionKind {
    StringEqual,
    ArrayEqual,
    PathExists,
    PathNotExists,
    ExitCodeSuccess,
    ExitCodeFailure,
}

impl AssertionKind {
    pub const ALL: [AssertionKind; 6] = [
        AssertionKind::StringEqual,
        AssertionKind::ArrayEqual,
        AssertionKind::PathExists,
        AssertionKind::PathNotExists,
        AssertionKind::ExitCodeSuccess,
        AssertionKind::ExitCodeFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionKind::StringEqual => "string-equal",
            AssertionKind::ArrayEqual => "array-equal",
            AssertionKind::PathExists => "path-exists",
            AssertionKind::PathNotExists => "path-not-exists",
            AssertionKind::ExitCodeSuccess => "exit-code-success",
            AssertionKind::ExitCodeFailure => "exit-code-failure",
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssertionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssertionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown assertion '{s}'"))
    }
}

/// Outcome of one assertion evaluation.
/// 一次断言求值的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    pub kind: AssertionKind,
    pub description: String,
    pub passed: bool,
    /// The raw arguments, minus the description, kept for failure diagnostics.
    /// 原始参数（不含描述），用于失败诊断。
    pub args: Vec<String>,
}

impl AssertionResult {
    fn new(kind: AssertionKind, description: &str, passed: bool, args: Vec<String>) -> Self {
        Self {
            kind,
            description: description.to_string(),
            passed,
            args,
        }
    }
}

/// Passes iff `actual` and `expected` are byte-for-byte equal.
pub fn string_equal(description: &str, actual: &str, expected: &str) -> AssertionResult {
    AssertionResult::new(
        AssertionKind::StringEqual,
        description,
        actual.as_bytes() == expected.as_bytes(),
        vec![actual.to_string(), expected.to_string()],
    )
}

/// Passes iff the lists agree at every index below the shorter length.
///
/// Order matters; sort both sides first when it doesn't. On a mismatch the
/// first argument names the offending index, followed by both lists.
///
/// 当两个列表在较短长度以内的每个下标上都相等时通过。
/// 顺序敏感；若顺序无关，请先对两边排序。
pub fn array_equal<A, E>(description: &str, actual: &[A], expected: &[E]) -> AssertionResult
where
    A: AsRef<str>,
    E: AsRef<str>,
{
    let mismatch = actual
        .iter()
        .zip(expected)
        .position(|(a, e)| a.as_ref() != e.as_ref());

    let actual_joined = join_items(actual);
    let expected_joined = join_items(expected);

    let args = match mismatch {
        Some(index) => vec![
            format!("index {index}"),
            actual_joined,
            expected_joined,
        ],
        None => vec![actual_joined, expected_joined],
    };

    AssertionResult::new(AssertionKind::ArrayEqual, description, mismatch.is_none(), args)
}

/// Passes iff anything exists at `path`. Symlinks count even when dangling.
pub fn path_exists(description: &str, path: &Path) -> AssertionResult {
    AssertionResult::new(
        AssertionKind::PathExists,
        description,
        entry_exists(path),
        vec![path.display().to_string()],
    )
}

/// Passes iff nothing exists at `path`.
pub fn path_not_exists(description: &str, path: &Path) -> AssertionResult {
    AssertionResult::new(
        AssertionKind::PathNotExists,
        description,
        !entry_exists(path),
        vec![path.display().to_string()],
    )
}

/// Passes iff `code` is zero.
pub fn exit_code_success(description: &str, code: i64) -> AssertionResult {
    AssertionResult::new(
        AssertionKind::ExitCodeSuccess,
        description,
        code == 0,
        vec![code.to_string()],
    )
}

/// Passes iff `code` is non-zero.
pub fn exit_code_failure(description: &str, code: i64) -> AssertionResult {
    AssertionResult::new(
        AssertionKind::ExitCodeFailure,
        description,
        code != 0,
        vec![code.to_string()],
    )
}

/// A fixed failing result for input that cannot be evaluated, such as a
/// non-numeric exit code coming out of a script.
pub(crate) fn unevaluable(kind: AssertionKind, description: &str, args: Vec<String>) -> AssertionResult {
    AssertionResult::new(kind, description, false, args)
}

fn join_items<S: AsRef<str>>(items: &[S]) -> String {
    items.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(" ")
}

// `symlink_metadata` does not follow the link, so dangling links still exist.
fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
