//! # CLI End-to-End Tests / CLI 端到端测试
//!
//! Runs the `harness-runner` binary against temporary fixture directories and
//! checks its output and exit code.
//!
//! 在临时夹具目录上运行 `harness-runner` 可执行文件，并检查其输出和退出码。

mod common;

use assert_cmd::Command;
use common::{fixture_dir, single_unit, write_config, write_fixture, write_unit};
use predicates::prelude::*;
use std::path::Path;

fn harness(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("harness-runner").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("HARNESS_LOG")
        .args(["--lang", "en", "-C"])
        .arg(dir);
    cmd
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_passing_string_assertion() {
        let dir = single_unit("math", "string-equal \"6*7==42\" 42 42\n");

        harness(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("=== math ==="))
            .stdout(predicate::str::contains("6*7==42"))
            .stdout(predicate::str::contains("ALL TEST UNITS PASSED"));
    }

    #[test]
    fn test_failing_string_assertion() {
        let dir = single_unit("days", "string-equal mismatch Thursday Friday\n");

        harness(dir.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("[string-equal] mismatch"))
            .stdout(predicate::str::contains("Thursday"))
            .stdout(predicate::str::contains("Friday"))
            .stdout(predicate::str::contains("1 TEST UNIT(S) FAILED"));
    }

    #[test]
    fn test_file_created_between_assertions() {
        let dir = single_unit(
            "hello",
            "path-not-exists \"no file yet\" hello.txt\n\
             $ touch hello.txt\n\
             path-exists \"file now there\" hello.txt\n",
        );

        harness(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("no file yet"))
            .stdout(predicate::str::contains("file now there"));
        assert!(!dir.path().join("hello.txt").exists());
    }

    #[test]
    fn test_missing_unit_fails() {
        let dir = single_unit("present", "string-equal ok a a\n");

        harness(dir.path())
            .args(["-u", "missingunit"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("No test unit named 'missingunit'"))
            .stdout(predicate::str::contains("=== present ===").not());
    }

    #[test]
    fn test_fail_fast_reports_only_first_failure() {
        let dir = single_unit(
            "ff",
            "string-equal first-failure a b\nstring-equal second-failure c d\n",
        );

        harness(dir.path())
            .arg("-x")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("first-failure"))
            .stdout(predicate::str::contains("second-failure").not());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn test_same_exit_code_on_rerun() {
        let dir = fixture_dir();
        write_unit(dir.path(), "a", "$ touch made.txt\npath-exists made made.txt\n");
        write_unit(dir.path(), "b", "string-equal bad x y\n");

        let first = harness(dir.path()).output().unwrap();
        let second = harness(dir.path()).output().unwrap();
        assert_eq!(first.status.code(), Some(1));
        assert_eq!(first.status.code(), second.status.code());
    }

    #[test]
    fn test_files_do_not_leak_between_units() {
        let dir = fixture_dir();
        write_unit(dir.path(), "a_writer", "$ touch hello.txt\npath-exists made hello.txt\n");
        write_unit(dir.path(), "b_reader", "path-not-exists \"fresh workspace\" hello.txt\n");

        harness(dir.path()).assert().success();
    }

    #[test]
    fn test_fixture_files_are_available() {
        let dir = single_unit("input", "$ cat data.txt\nstring-equal content \"$stdout\" \"hello world\"\n");
        write_fixture(dir.path(), "data.txt", "hello world\n");

        harness(dir.path()).assert().success();
    }
}

#[cfg(test)]
mod script_edge_tests {
    use super::*;

    #[test]
    fn test_non_numeric_exit_code_is_an_assertion_failure() {
        let dir = single_unit("nonnum", "exit-code-success d abc\n");

        harness(dir.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("[exit-code-success] d"))
            .stdout(predicate::str::contains("abc"))
            .stdout(predicate::str::contains("could not run").not());
    }

    #[test]
    fn test_single_quoted_dollar_is_literal() {
        let dir = single_unit("lit", "$ echo hi\nstring-equal lit '$stdout' hi\n");

        harness(dir.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("[string-equal] lit"));
    }
}

#[cfg(test)]
mod flag_tests {
    use super::*;

    #[test]
    fn test_help_exits_zero_without_running() {
        let dir = single_unit("never", "string-equal bad a b\n");

        harness(dir.path())
            .arg("-h")
            .assert()
            .success()
            .stdout(predicate::str::contains("--fail-fast"))
            .stdout(predicate::str::contains("=== never ===").not());
    }

    #[test]
    fn test_unknown_flag_exits_two() {
        let dir = fixture_dir();
        harness(dir.path()).arg("--bogus").assert().code(2);
    }

    #[test]
    fn test_missing_flag_value_exits_two() {
        let dir = fixture_dir();
        harness(dir.path()).arg("-u").assert().code(2);
    }

    #[test]
    fn test_unit_filter_accepts_extension() {
        let dir = fixture_dir();
        write_unit(dir.path(), "good", "string-equal ok a a\n");
        write_unit(dir.path(), "bad", "string-equal bad a b\n");

        harness(dir.path())
            .args(["-u", "good.test"])
            .assert()
            .success()
            .stdout(predicate::str::contains("=== good ==="))
            .stdout(predicate::str::contains("=== bad ===").not());
    }

    #[test]
    fn test_debug_mode_runs_in_fixture_dir() {
        let dir = single_unit("inplace", "$ touch debug-artifact.txt\n");

        harness(dir.path()).arg("-d").assert().success();
        assert!(dir.path().join("debug-artifact.txt").exists());
    }

    #[test]
    fn test_verbose_is_exported() {
        let dir = single_unit("verbose", "string-equal \"verbose flag\" \"$HARNESS_VERBOSE\" 1\n");

        harness(dir.path()).arg("-v").assert().success();
        harness(dir.path()).assert().code(1);
    }

    #[test]
    fn test_timeout_flag() {
        let dir = single_unit("slow", "$ sleep 5\n");

        harness(dir.path())
            .args(["-t", "1"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("timed out after 1s"));
    }

    #[test]
    fn test_missing_fixture_dir_fails() {
        let dir = fixture_dir();
        harness(&dir.path().join("absent")).assert().code(1);
    }

    #[test]
    fn test_chinese_output() {
        let dir = single_unit("math", "string-equal ok 42 42\n");

        Command::cargo_bin("harness-runner")
            .unwrap()
            .env("NO_COLOR", "1")
            .args(["--lang", "zh-CN", "-C"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("=== math ==="));
    }
}

#[cfg(test)]
mod clean_tests {
    use super::*;

    #[test]
    fn test_clean_removes_configured_artifacts() {
        let dir = single_unit("never", "string-equal bad a b\n");
        write_config(dir.path(), "[clean]\nremove = [\"out\", \"log.txt\", \"absent\"]\n");
        std::fs::create_dir(dir.path().join("out")).unwrap();
        write_fixture(&dir.path().join("out"), "artifact.bin", "x");
        write_fixture(dir.path(), "log.txt", "x");
        write_fixture(dir.path(), "keep.txt", "x");

        harness(dir.path())
            .arg("-c")
            .assert()
            .success()
            .stdout(predicate::str::contains("=== never ===").not());

        assert!(!dir.path().join("out").exists());
        assert!(!dir.path().join("log.txt").exists());
        assert!(dir.path().join("keep.txt").exists());
        assert!(dir.path().join("never.test").exists());
    }

    #[test]
    fn test_clean_refuses_paths_outside_fixture_dir() {
        let dir = fixture_dir();
        write_config(dir.path(), "[clean]\nremove = [\"../elsewhere\"]\n");

        harness(dir.path()).arg("-c").assert().code(1);
    }
}
