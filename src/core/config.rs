//! # Configuration Module / 配置模块
//!
//! Optional `Harness.toml` living next to the test-definition files. Every key
//! has a default, so a fixture directory without the file works as-is.
//!
//! 位于测试定义文件旁边的可选 `Harness.toml`。每个键都有默认值，
//! 因此没有该文件的夹具目录也可以直接使用。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name looked up in the fixture directory.
pub const CONFIG_FILE_NAME: &str = "Harness.toml";

/// Extension identifying test-definition files when none is configured.
pub const DEFAULT_EXTENSION: &str = "test";

/// Settings for the housekeeping `-c` action.
/// `-c` 清理操作的设置。
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CleanConfig {
    /// Paths, relative to the fixture directory, deleted on clean.
    /// 清理时删除的路径（相对于夹具目录）。
    #[serde(default)]
    pub remove: Vec<String>,
    /// Revert version-controlled fixture files with `git checkout -- .`.
    /// 使用 `git checkout -- .` 还原受版本控制的夹具文件。
    #[serde(default)]
    pub revert: bool,
}

/// Contents of `Harness.toml`.
/// `Harness.toml` 的内容。
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HarnessConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// When absent, the system locale decides.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。缺省时由系统区域设置决定。
    #[serde(default)]
    pub language: Option<String>,

    /// Extension of test-definition files, without the dot.
    /// 测试定义文件的扩展名（不含点）。
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Per-unit timeout in seconds. No timeout when absent.
    /// 单元超时时间（秒）。缺省时不设超时。
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Enables fail-fast without passing `-x`.
    /// 无需 `-x` 即启用快速失败。
    #[serde(default)]
    pub fail_fast: bool,

    /// Extra environment exported to every shell command a body runs.
    /// 导出给测试体运行的每个 shell 命令的额外环境变量。
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub clean: CleanConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            language: None,
            extension: default_extension(),
            timeout_secs: None,
            fail_fast: false,
            env: BTreeMap::new(),
            clean: CleanConfig::default(),
        }
    }
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Loads `Harness.toml` from `fixture_root`, falling back to defaults when the
/// file does not exist. A file that exists but does not parse is an error.
pub fn load_config(fixture_root: &Path) -> Result<HarnessConfig> {
    let path = fixture_root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(HarnessConfig::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: HarnessConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
