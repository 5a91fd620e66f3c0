//! # Environment Manager Unit Tests / 环境管理器单元测试
//!
//! Tests for workspace creation, fixture copying and teardown.
//!
//! 测试工作区的创建、夹具复制和拆除。

mod common;

use common::{fixture_dir, write_fixture, write_unit};
use harness_runner::infra::fs::{copy_fixtures, in_place, setup, teardown};
use std::fs;
use std::path::PathBuf;

#[cfg(test)]
mod setup_tests {
    use super::*;

    #[test]
    fn test_workspace_is_a_fresh_directory() {
        let dir = fixture_dir();
        write_unit(dir.path(), "hello", "$ true\n");

        let ctx = setup(dir.path()).unwrap();
        let origin = fs::canonicalize(dir.path()).unwrap();

        assert!(ctx.is_isolated());
        assert!(ctx.workdir().is_dir());
        assert_ne!(ctx.workdir(), origin);
        assert_eq!(ctx.origin(), origin);
        teardown(ctx);
    }

    #[test]
    fn test_fixture_files_are_copied_shallowly() {
        let dir = fixture_dir();
        write_unit(dir.path(), "hello", "");
        write_fixture(dir.path(), "input.txt", "payload");
        write_fixture(dir.path(), ".secret", "x");
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_fixture(&dir.path().join("sub"), "deep.txt", "x");

        let ctx = setup(dir.path()).unwrap();

        assert_eq!(
            ctx.copied(),
            &[PathBuf::from("hello.test"), PathBuf::from("input.txt")]
        );
        assert_eq!(
            fs::read_to_string(ctx.workdir().join("input.txt")).unwrap(),
            "payload"
        );
        assert!(!ctx.workdir().join(".secret").exists());
        assert!(!ctx.workdir().join("sub").exists());
        teardown(ctx);
    }

    #[test]
    fn test_workspace_changes_do_not_touch_fixtures() {
        let dir = fixture_dir();
        write_fixture(dir.path(), "input.txt", "original");

        let ctx = setup(dir.path()).unwrap();
        fs::write(ctx.workdir().join("input.txt"), "changed").unwrap();
        fs::write(ctx.workdir().join("new.txt"), "new").unwrap();
        teardown(ctx);

        assert_eq!(
            fs::read_to_string(dir.path().join("input.txt")).unwrap(),
            "original"
        );
        assert!(!dir.path().join("new.txt").exists());
    }

    #[test]
    fn test_missing_fixture_dir_is_an_error() {
        let dir = fixture_dir();
        assert!(setup(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_each_setup_gets_its_own_directory() {
        let dir = fixture_dir();
        let first = setup(dir.path()).unwrap();
        let second = setup(dir.path()).unwrap();
        assert_ne!(first.workdir(), second.workdir());
        teardown(first);
        teardown(second);
    }
}

#[cfg(test)]
mod teardown_tests {
    use super::*;

    #[test]
    fn test_teardown_removes_workspace() {
        let dir = fixture_dir();
        write_fixture(dir.path(), "input.txt", "x");

        let ctx = setup(dir.path()).unwrap();
        let workdir = ctx.workdir().to_path_buf();
        fs::create_dir(workdir.join("generated")).unwrap();
        fs::write(workdir.join("generated/out.bin"), "x").unwrap();

        teardown(ctx);
        assert!(!workdir.exists());
        assert!(dir.path().join("input.txt").exists());
    }

    #[test]
    fn test_dropping_the_context_also_cleans_up() {
        let dir = fixture_dir();
        let ctx = setup(dir.path()).unwrap();
        let workdir = ctx.workdir().to_path_buf();
        drop(ctx);
        assert!(!workdir.exists());
    }

    #[test]
    fn test_in_place_context_is_left_alone() {
        let dir = fixture_dir();
        write_fixture(dir.path(), "input.txt", "x");

        let ctx = in_place(dir.path()).unwrap();
        assert!(!ctx.is_isolated());
        assert_eq!(ctx.workdir(), fs::canonicalize(dir.path()).unwrap());

        teardown(ctx);
        assert!(dir.path().join("input.txt").exists());
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let dir = fixture_dir();
        let ctx = in_place(dir.path()).unwrap();
        assert_eq!(ctx.resolve("a/b.txt"), ctx.workdir().join("a/b.txt"));
        assert_eq!(ctx.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_copy_fixtures_returns_sorted_names() {
        let from = fixture_dir();
        let to = fixture_dir();
        for name in ["b.txt", "a.txt", "c.test"] {
            write_fixture(from.path(), name, name);
        }

        let copied = copy_fixtures(from.path(), to.path()).unwrap();
        assert_eq!(
            copied,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("c.test")
            ]
        );
        assert_eq!(fs::read_to_string(to.path().join("c.test")).unwrap(), "c.test");
    }
}
