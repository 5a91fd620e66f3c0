//! # Error Taxonomy / 错误分类
//!
//! Typed errors raised at the engine boundary. The CLI layer wraps them in
//! `anyhow` with extra context; the runner turns them into per-unit failures.
//!
//! 引擎边界上抛出的类型化错误。CLI 层使用 `anyhow` 附加上下文；
//! 运行器将它们转换为单元级失败。

use std::path::PathBuf;
use thiserror::Error;

/// Errors that occur while discovering, preparing or executing test units.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no test unit named '{name}' in {}", dir.display())]
    UnitNotFound { name: String, dir: PathBuf },

    #[error("environment error: {message}")]
    Environment {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Script {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub(crate) fn environment(message: impl Into<String>, source: std::io::Error) -> Self {
        HarnessError::Environment {
            message: message.into(),
            source,
        }
    }
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
