//! # Clean Command Module / 清理命令模块
//!
//! Housekeeping for the fixture directory: delete generated artifacts listed
//! in `Harness.toml` and optionally revert version-controlled fixtures with
//! git. Destructive by nature; never part of a test run.
//!
//! 夹具目录的清理：删除 `Harness.toml` 中列出的生成产物，
//! 并可选地使用 git 还原受版本控制的夹具。本质上是破坏性的；从不属于测试运行的一部分。

use anyhow::{bail, Context, Result};
use colored::*;
use std::fs;
use std::path::{Component, Path};

use crate::{core::config, infra::t};

/// Executes the clean command against `fixture_dir`.
pub async fn execute(fixture_dir: &Path) -> Result<()> {
    let root = fs::canonicalize(fixture_dir)
        .with_context(|| t!("fixture_dir_not_found", path = fixture_dir.display()).to_string())?;
    let config = config::load_config(&root)?;

    for entry in &config.clean.remove {
        if !is_contained(Path::new(entry)) {
            bail!(t!("clean.outside_fixture_dir", path = entry).to_string());
        }
        let path = root.join(entry);
        let Ok(meta) = path.symlink_metadata() else {
            continue;
        };
        let removed = if meta.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.with_context(|| format!("Failed to remove {}", path.display()))?;
        println!("{}", t!("clean.removed", path = entry).dimmed());
    }

    if config.clean.revert {
        let status = tokio::process::Command::new("git")
            .args(["checkout", "--", "."])
            .current_dir(&root)
            .status()
            .await
            .context("Failed to execute 'git checkout'")?;
        if !status.success() {
            bail!(t!("clean.revert_failed").to_string());
        }
        println!("{}", t!("clean.reverted").dimmed());
    }

    println!("{}", t!("clean.done").green());
    Ok(())
}

/// Only plain relative paths below the fixture directory may be removed.
fn is_contained(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::Normal(_)))
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
