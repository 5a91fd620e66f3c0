//! # Reporting Module / 报告模块
//!
//! This module renders assertion results and the end-of-run summary to the
//! console, with colour and internationalization support.
//!
//! 此模块将断言结果和运行结束摘要渲染到控制台，支持彩色输出和国际化。

pub mod console;

// Re-export common reporting functions
pub use console::{print_summary, Reporter};
