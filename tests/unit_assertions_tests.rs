//! # Assertion Library Unit Tests / 断言库单元测试
//!
//! Tests for the stateless predicates in `core::assertions`.
//!
//! 测试 `core::assertions` 中的无状态谓词。

use harness_runner::assertions::{self, AssertionKind};
use std::fs;
use tempfile::TempDir;

#[cfg(test)]
mod string_equal_tests {
    use super::*;

    #[test]
    fn test_equal_strings_pass() {
        let result = assertions::string_equal("6*7==42", "42", "42");
        assert!(result.passed);
        assert_eq!(result.kind, AssertionKind::StringEqual);
        assert_eq!(result.description, "6*7==42");
    }

    #[test]
    fn test_unequal_strings_fail_with_both_values() {
        let result = assertions::string_equal("mismatch", "Thursday", "Friday");
        assert!(!result.passed);
        assert_eq!(result.kind, AssertionKind::StringEqual);
        assert_eq!(result.args, vec!["Thursday".to_string(), "Friday".to_string()]);
    }

    #[test]
    fn test_comparison_is_exact() {
        assert!(!assertions::string_equal("case", "abc", "ABC").passed);
        assert!(!assertions::string_equal("whitespace", "abc ", "abc").passed);
        assert!(assertions::string_equal("empty", "", "").passed);
        assert!(assertions::string_equal("unicode", "héllo", "héllo").passed);
    }
}

#[cfg(test)]
mod array_equal_tests {
    use super::*;

    #[test]
    fn test_identical_lists_pass() {
        let result = assertions::array_equal("files", &["a", "b", "c"], &["a", "b", "c"]);
        assert!(result.passed);
        assert_eq!(result.kind, AssertionKind::ArrayEqual);
    }

    #[test]
    fn test_mismatch_reports_index_once() {
        let result = assertions::array_equal("files", &["a", "x", "c"], &["a", "b", "c"]);
        assert!(!result.passed);
        assert_eq!(result.args[0], "index 1");
        assert_eq!(result.args[1], "a x c");
        assert_eq!(result.args[2], "a b c");
    }

    #[test]
    fn test_only_shared_prefix_is_compared() {
        assert!(assertions::array_equal("prefix", &["a"], &["a", "b"]).passed);
        assert!(assertions::array_equal("prefix", &["a", "b"], &["a"]).passed);
        assert!(assertions::array_equal("empty", &[] as &[&str], &["a"]).passed);
    }

    #[test]
    fn test_order_matters() {
        assert!(!assertions::array_equal("order", &["b", "a"], &["a", "b"]).passed);
    }

    #[test]
    fn test_accepts_owned_strings() {
        let actual = vec!["one".to_string(), "two".to_string()];
        assert!(assertions::array_equal("owned", &actual, &["one", "two"]).passed);
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;

    #[test]
    fn test_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("hello.txt");
        fs::write(&file, "hi").unwrap();

        assert!(assertions::path_exists("there", &file).passed);
        let result = assertions::path_not_exists("not there", &file);
        assert!(!result.passed);
        assert_eq!(result.kind, AssertionKind::PathNotExists);
        assert_eq!(result.args, vec![file.display().to_string()]);
    }

    #[test]
    fn test_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        assert!(!assertions::path_exists("there", &missing).passed);
        assert!(assertions::path_not_exists("not there", &missing).passed);
    }

    #[test]
    fn test_directory_counts() {
        let dir = TempDir::new().unwrap();
        assert!(assertions::path_exists("dir", dir.path()).passed);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("target-missing"), &link).unwrap();

        assert!(assertions::path_exists("link", &link).passed);
        assert!(!assertions::path_not_exists("link", &link).passed);
    }
}

#[cfg(test)]
mod exit_code_tests {
    use super::*;

    #[test]
    fn test_success_iff_zero() {
        for code in [-1, 0, 1, 2, 127, 255] {
            assert_eq!(assertions::exit_code_success("ok", code).passed, code == 0);
            assert_eq!(assertions::exit_code_failure("ko", code).passed, code != 0);
        }
    }

    #[test]
    fn test_failure_records_code() {
        let result = assertions::exit_code_success("tool ran", 3);
        assert_eq!(result.kind, AssertionKind::ExitCodeSuccess);
        assert_eq!(result.args, vec!["3".to_string()]);
    }
}

#[cfg(test)]
mod kind_tests {
    use super::*;

    #[test]
    fn test_keywords_parse_back() {
        for kind in AssertionKind::ALL {
            assert_eq!(kind.as_str().parse::<AssertionKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_unknown_keyword() {
        assert!("string-equals".parse::<AssertionKind>().is_err());
    }
}
