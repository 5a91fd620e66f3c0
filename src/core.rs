//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the harness: data models,
//! configuration, the assertion library, script parsing and the sequential
//! test runner.
//!
//! 此模块包含测试框架的核心功能：数据模型、配置、断言库、脚本解析以及顺序测试运行器。

pub mod assertions;
pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod planner;
pub mod script;

// Re-exports
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use execution::{FnBody, Interrupt, Runner, TestBody, UnitContext};
pub use models::{RunState, RunSummary, TestUnit, UnitOutcome};
