//! # Test Script Module / 测试脚本模块
//!
//! Parses `.test` files into a flat list of steps and runs them as a
//! [`TestBody`].
//!
//! ```text
//! # comments and blank lines are ignored
//! $ echo $((6 * 7))
//! string-equal "6*7==42" "$stdout" 42
//! path-not-exists "no file yet" hello.txt
//! $ touch hello.txt
//! path-exists "file now there" hello.txt
//! $ ls *.txt | sort
//! array-equal "listing" $stdout -- hello.txt
//! ```
//!
//! A `$` line runs through `sh -c` in the workspace; its output lands in the
//! `stdout`, `stderr` and `status` variables. Assertion arguments follow shell
//! quoting rules: `$var` references are expanded unquoted and inside double
//! quotes, never inside single quotes or after a backslash.
//!
//! 将 `.test` 文件解析为扁平的步骤列表，并作为 [`TestBody`] 运行。

use futures::future::BoxFuture;
use std::fs;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use crate::core::assertions::{self, AssertionKind};
use crate::core::error::{HarnessError, Result};
use crate::core::execution::{Interrupt, TestBody, UnitContext};

/// Separates the two lists of an `array-equal` line. Only an unquoted `--`
/// counts; `'--'` is an ordinary item.
pub const LIST_SEPARATOR: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    /// Single-quoted or backslash-escaped text, never expanded
    Literal(String),
    /// Unquoted or double-quoted text, `$var` references expanded
    Expand(String),
}

/// One shell word of an assertion line, remembering how each piece of it was
/// quoted so expansion can skip the literal pieces.
///
/// 断言行中的一个 shell 单词，记录每一段的引用方式，以便展开时跳过字面量部分。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    parts: Vec<Part>,
    quoted: bool,
}

impl Word {
    /// The word with quotes removed and nothing expanded.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Literal(s) | Part::Expand(s) => s.as_str(),
            })
            .collect()
    }

    /// Whether the word was written as exactly `text`, with no quoting at all.
    pub fn is_bare(&self, text: &str) -> bool {
        !self.quoted && self.text() == text
    }

    /// Runs `expand` over the expandable pieces and joins the result.
    pub fn expand(&self, expand: impl Fn(&str) -> String) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Literal(s) => s.clone(),
                Part::Expand(s) => expand(s),
            })
            .collect()
    }

    fn flush(&mut self, pending: &mut String) {
        if !pending.is_empty() {
            self.parts.push(Part::Expand(std::mem::take(pending)));
        }
    }
}

/// Splits a line into words following POSIX shell quoting. A `#` starting a
/// word comments out the rest of the line.
pub fn split_words(line: &str) -> std::result::Result<Vec<Word>, &'static str> {
    const UNBALANCED: &str = "unbalanced quotes";

    let mut words = Vec::new();
    let mut word: Option<Word> = None;
    let mut bare = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            if let Some(mut done) = word.take() {
                done.flush(&mut bare);
                words.push(done);
            }
            continue;
        }
        if c == '#' && word.is_none() {
            break;
        }

        let current = word.get_or_insert_with(Word::default);
        match c {
            '\'' => {
                current.flush(&mut bare);
                current.quoted = true;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => text.push(c),
                        None => return Err(UNBALANCED),
                    }
                }
                current.parts.push(Part::Literal(text));
            }
            '"' => {
                current.flush(&mut bare);
                current.quoted = true;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('$' | '`' | '"' | '\\')) => {
                                current.flush(&mut text);
                                current.parts.push(Part::Literal(c.to_string()));
                            }
                            Some(c) => {
                                text.push('\\');
                                text.push(c);
                            }
                            None => return Err(UNBALANCED),
                        },
                        Some(c) => text.push(c),
                        None => return Err(UNBALANCED),
                    }
                }
                current.flush(&mut text);
            }
            '\\' => {
                current.flush(&mut bare);
                current.quoted = true;
                let escaped = chars.next().ok_or("trailing backslash")?;
                current.parts.push(Part::Literal(escaped.to_string()));
            }
            c => bare.push(c),
        }
    }

    if let Some(mut done) = word {
        done.flush(&mut bare);
        words.push(done);
    }
    Ok(words)
}

/// One executable line of a script.
/// 脚本中的一个可执行行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `$ <command>`
    Shell { line: usize, command: String },
    /// `<assertion> <description> <args...>`, arguments not yet expanded
    /// `<断言> <描述> <参数...>`，参数尚未展开
    Assert {
        line: usize,
        kind: AssertionKind,
        args: Vec<Word>,
        /// Index in `args` of the `array-equal` list separator
        separator: Option<usize>,
    },
}

/// A parsed test-definition file.
/// 已解析的测试定义文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub path: PathBuf,
    pub steps: Vec<Step>,
}

/// Reads and parses a test-definition file.
pub fn load_script(path: &Path) -> Result<Script> {
    let source = fs::read_to_string(path)?;
    parse_script(path, &source)
}

/// Parses script source. `path` is only used for error messages.
pub fn parse_script(path: &Path, source: &str) -> Result<Script> {
    let mut steps = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        if let Some(command) = shell_command(text) {
            if command.is_empty() {
                return Err(script_error(path, line, "empty shell command"));
            }
            steps.push(Step::Shell {
                line,
                command: command.to_string(),
            });
            continue;
        }

        let words = split_words(text).map_err(|e| script_error(path, line, e))?;
        let Some((keyword, args)) = words.split_first() else {
            continue;
        };
        let kind: AssertionKind = keyword
            .text()
            .parse()
            .map_err(|e: String| script_error(path, line, e))?;
        let separator = check_arity(kind, args).map_err(|e| script_error(path, line, e))?;

        steps.push(Step::Assert {
            line,
            kind,
            args: args.to_vec(),
            separator,
        });
    }

    Ok(Script {
        path: path.to_path_buf(),
        steps,
    })
}

fn shell_command(text: &str) -> Option<&str> {
    match text.strip_prefix('$')? {
        "" => Some(""),
        rest if rest.starts_with(char::is_whitespace) => Some(rest.trim()),
        _ => None,
    }
}

/// Validates the argument count of an assertion line, description included.
/// For `array-equal` the position of the list separator is returned.
fn check_arity(kind: AssertionKind, args: &[Word]) -> std::result::Result<Option<usize>, String> {
    let expected = match kind {
        AssertionKind::StringEqual => 3,
        AssertionKind::PathExists
        | AssertionKind::PathNotExists
        | AssertionKind::ExitCodeSuccess
        | AssertionKind::ExitCodeFailure => 2,
        AssertionKind::ArrayEqual => {
            if args.is_empty() {
                return Err(format!("{kind} needs a description"));
            }
            let mut separators = args
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(_, word)| word.is_bare(LIST_SEPARATOR))
                .map(|(index, _)| index);
            return match (separators.next(), separators.next()) {
                (Some(index), None) => Ok(Some(index)),
                _ => Err(format!(
                    "{kind} needs exactly one '{LIST_SEPARATOR}' between the lists"
                )),
            };
        }
    };

    if args.len() == expected {
        Ok(None)
    } else {
        Err(format!(
            "{kind} takes {expected} arguments (description included), got {}",
            args.len()
        ))
    }
}

fn script_error(path: &Path, line: usize, message: impl Into<String>) -> HarnessError {
    HarnessError::Script {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

impl Script {
    async fn execute(&self, cx: &mut UnitContext<'_>) -> std::result::Result<(), Interrupt> {
        for step in &self.steps {
            match step {
                Step::Shell { line, command } => {
                    cx.sh(command).await.map_err(|e| {
                        script_error(&self.path, *line, format!("cannot run '{command}': {e}"))
                    })?;
                }
                Step::Assert {
                    line,
                    kind,
                    args,
                    separator,
                } => {
                    let args: Vec<String> = args
                        .iter()
                        .map(|word| word.expand(|piece| cx.expand(piece)))
                        .collect();
                    self.evaluate(cx, *line, *kind, &args, *separator)?;
                }
            }
        }
        Ok(())
    }

    /// Evaluates one assertion line whose arguments are already expanded.
    fn evaluate(
        &self,
        cx: &mut UnitContext<'_>,
        line: usize,
        kind: AssertionKind,
        args: &[String],
        separator: Option<usize>,
    ) -> std::result::Result<(), Interrupt> {
        let malformed = || {
            Interrupt::from(script_error(
                &self.path,
                line,
                format!("malformed {kind} arguments"),
            ))
        };
        let Some((description, rest)) = args.split_first() else {
            return Err(malformed());
        };

        match (kind, rest) {
            (AssertionKind::StringEqual, [actual, expected]) => {
                cx.string_equal(description, actual, expected)?
            }
            (AssertionKind::ArrayEqual, _) => {
                let lists = separator
                    .and_then(|split| Some((args.get(1..split)?, args.get(split + 1..)?)));
                let Some((actual, expected)) = lists else {
                    return Err(malformed());
                };
                cx.array_equal(description, &words(actual), &words(expected))?
            }
            (AssertionKind::PathExists, [path]) => cx.path_exists(description, path)?,
            (AssertionKind::PathNotExists, [path]) => cx.path_not_exists(description, path)?,
            (AssertionKind::ExitCodeSuccess | AssertionKind::ExitCodeFailure, [text]) => {
                let mut result = match parse_exit_code(text) {
                    Some(code) if kind == AssertionKind::ExitCodeSuccess => {
                        assertions::exit_code_success(description, code)
                    }
                    Some(code) => assertions::exit_code_failure(description, code),
                    None => assertions::unevaluable(kind, description, Vec::new()),
                };
                result.args = vec![text.clone()];
                cx.report(&result)?
            }
            _ => return Err(malformed()),
        }
        Ok(())
    }
}

impl TestBody for Script {
    fn run<'a, 'b: 'a>(
        &'a self,
        cx: &'a mut UnitContext<'b>,
    ) -> BoxFuture<'a, std::result::Result<(), Interrupt>> {
        Box::pin(self.execute(cx))
    }
}

/// Integer exit code from script text. Out-of-range integers saturate, so
/// they still count as non-zero.
fn parse_exit_code(text: &str) -> Option<i64> {
    match text.trim().parse::<i64>() {
        Ok(code) => Some(code),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Word-splits expanded list items, so `$stdout` holding several lines
/// becomes several items.
fn words(items: &[String]) -> Vec<&str> {
    items.iter().flat_map(|s| s.split_whitespace()).collect()
}
