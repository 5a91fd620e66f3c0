//! # Harness Runner Library / Harness Runner 库
//!
//! This library provides the core functionality for Harness Runner, a minimal
//! integration-test harness for command-line tools. Each test unit runs in a
//! fresh temporary workspace seeded with the fixture files, evaluates
//! shell-style assertions, and contributes to a single process exit code.
//!
//! 此库为 Harness Runner 提供核心功能，这是一个面向命令行工具的最小集成测试框架。
//! 每个测试单元都在以夹具文件初始化的全新临时工作区中运行，
//! 执行 shell 风格的断言，并汇总为单一的进程退出码。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, assertions, scripts and the test runner
//! - `infra` - Shell command execution and workspace management
//! - `reporting` - Console output
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、断言、脚本和测试运行器
//! - `infra` - shell 命令执行和工作区管理
//! - `reporting` - 控制台输出
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::assertions;
pub use crate::core::config;
pub use crate::core::execution;
pub use crate::core::models;

/// Picks the output language and activates it.
///
/// An explicit `requested` language wins. Otherwise the system locale is
/// used: the full locale (e.g., "zh-CN") first, then just the language code
/// (e.g., "en"), and finally the default language ("en").
pub fn init_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split(['-', '_'])
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
    lang.to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
