//! # Environment Manager / 环境管理器
//!
//! Creates the isolated workspace a test unit runs in: a fresh temporary
//! directory holding a flat snapshot of the fixture files. The workspace is an
//! [`ExecutionContext`] value handed explicitly to everything that needs a
//! working directory; the process's own current directory is never touched.
//!
//! 创建测试单元运行所在的隔离工作区：一个全新的临时目录，其中包含夹具文件的平面快照。
//! 工作区是一个 [`ExecutionContext`] 值，显式传递给所有需要工作目录的地方；
//! 进程自身的当前目录从不被修改。

use crate::core::error::{HarnessError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "harness_";

/// One isolated run. Dropping the context removes its temporary directory, so
/// the workspace is cleaned up on every exit path.
///
/// 一次隔离运行。丢弃上下文会删除其临时目录，因此工作区在任何退出路径上都会被清理。
#[derive(Debug)]
pub struct ExecutionContext {
    workdir: PathBuf,
    origin: PathBuf,
    copied: Vec<PathBuf>,
    /// The `TempDir` guard. `None` in no-setup mode.
    /// `TempDir` 的 guard。无准备模式下为 `None`。
    temp: Option<TempDir>,
}

impl ExecutionContext {
    /// Directory bodies run in / 测试体运行所在的目录
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// The fixture directory the run started from / 运行开始时的夹具目录
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Names of the fixture files copied into the workspace / 复制到工作区的夹具文件名
    pub fn copied(&self) -> &[PathBuf] {
        &self.copied
    }

    pub fn is_isolated(&self) -> bool {
        self.temp.is_some()
    }

    /// Resolves `path` against the working directory unless it is absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }
}

/// Creates a fresh workspace and copies the fixture files into it.
///
/// # Arguments
/// * `fixture_root` - Directory holding the test-definition and fixture files
///
/// # Returns
/// An `ExecutionContext` owning the new temporary directory
pub fn setup(fixture_root: &Path) -> Result<ExecutionContext> {
    let origin = fs::canonicalize(fixture_root).map_err(|e| {
        HarnessError::environment(
            format!("cannot resolve fixture directory {}", fixture_root.display()),
            e,
        )
    })?;

    let temp_dir = create_temp_dir(&origin)?;
    let workdir = temp_dir.path().to_path_buf();

    let copied = copy_fixtures(&origin, &workdir).map_err(|e| {
        HarnessError::environment(
            format!("cannot copy fixtures into {}", workdir.display()),
            e,
        )
    })?;

    debug!(
        workdir = %workdir.display(),
        files = copied.len(),
        "workspace ready"
    );

    Ok(ExecutionContext {
        workdir,
        origin,
        copied,
        temp: Some(temp_dir),
    })
}

/// A context that runs directly in the fixture directory, with no isolation.
/// Used by the `-d` debug mode.
pub fn in_place(fixture_root: &Path) -> Result<ExecutionContext> {
    let origin = fs::canonicalize(fixture_root).map_err(|e| {
        HarnessError::environment(
            format!("cannot resolve fixture directory {}", fixture_root.display()),
            e,
        )
    })?;

    Ok(ExecutionContext {
        workdir: origin.clone(),
        origin,
        copied: Vec::new(),
        temp: None,
    })
}

/// Removes the workspace. A failed removal is logged rather than returned:
/// the unit has already produced its result by then.
pub fn teardown(ctx: ExecutionContext) {
    let Some(temp_dir) = ctx.temp else {
        return;
    };
    let path = temp_dir.path().to_path_buf();
    match temp_dir.close() {
        Ok(()) => debug!(workdir = %path.display(), "workspace removed"),
        Err(e) => warn!(workdir = %path.display(), error = %e, "failed to remove workspace"),
    }
}

/// Portable form first; if the system temp directory is unusable, fall back to
/// a hidden, prefixed directory inside the fixture root. Hidden entries are
/// never discovered as units nor copied as fixtures.
fn create_temp_dir(fixture_root: &Path) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .or_else(|first| {
            debug!(error = %first, "system temp dir unavailable, using fixture root");
            tempdir_in(fixture_root)
        })
        .map_err(|e| HarnessError::environment("failed to create temporary workspace", e))
}

fn tempdir_in(dir: &Path) -> std::io::Result<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!(".{TEMP_PREFIX}"))
        .tempdir_in(dir)
}

/// Shallow copy of every non-hidden regular file in `from` into `to`.
/// Subdirectories are skipped; symlinks are followed, dangling ones skipped.
///
/// Returns the copied file names, sorted.
pub fn copy_fixtures(from: &Path, to: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let is_file = fs::metadata(entry.path()).is_ok_and(|m| m.is_file());
        if !is_file {
            continue;
        }
        fs::copy(entry.path(), to.join(&name))?;
        copied.push(PathBuf::from(name));
    }
    copied.sort();
    Ok(copied)
}
