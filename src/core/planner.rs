//! # Test Execution Planner Module / 测试执行计划模块
//!
//! Discovers test units in the fixture directory and narrows them down to the
//! ones this run should execute.
//!
//! 在夹具目录中发现测试单元，并将其筛选为本次运行应执行的单元。

use crate::core::error::{HarnessError, Result};
use crate::core::models::TestUnit;
use std::fs;
use std::path::Path;

/// Represents the complete execution plan for one run.
/// 表示一次运行的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Units to run, in execution order / 要运行的单元，按执行顺序排列
    pub units: Vec<TestUnit>,
    /// How many units discovery found before filtering / 筛选前发现的单元数量
    pub discovered: usize,
    /// Whether a `-u` filter narrowed the run / 是否通过 `-u` 过滤缩小了运行范围
    pub is_filtered: bool,
}

/// Lists every test-definition file in `fixture_root`.
///
/// A test-definition file is a non-hidden regular file whose extension is
/// `extension`. Units are sorted by name, so the order does not depend on the
/// filesystem's enumeration order.
///
/// 列出 `fixture_root` 中的所有测试定义文件。
/// 单元按名称排序，因此顺序不依赖于文件系统的枚举顺序。
pub fn discover(fixture_root: &Path, extension: &str) -> Result<Vec<TestUnit>> {
    let root = fs::canonicalize(fixture_root)?;
    let mut units = Vec::new();

    for entry in fs::read_dir(&root)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name.starts_with('.') || !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            units.push(TestUnit::new(stem, path.clone()));
        }
    }

    units.sort();
    Ok(units)
}

/// Strips a trailing `.<extension>` from a unit name given on the command line.
pub fn normalize_unit_name<'a>(name: &'a str, extension: &str) -> &'a str {
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

/// Creates the execution plan: discovery, then the optional single-unit filter.
///
/// # Arguments
/// * `fixture_root` - Directory holding the test-definition files
/// * `extension` - Extension identifying test-definition files
/// * `unit_filter` - Optional unit name, with or without the extension
///
/// # Returns
/// The plan, or `HarnessError::UnitNotFound` when the filter matches nothing
pub fn plan_execution(
    fixture_root: &Path,
    extension: &str,
    unit_filter: Option<&str>,
) -> Result<ExecutionPlan> {
    let units = discover(fixture_root, extension)?;
    let discovered = units.len();

    let Some(filter) = unit_filter else {
        return Ok(ExecutionPlan {
            units,
            discovered,
            is_filtered: false,
        });
    };

    let wanted = normalize_unit_name(filter, extension);
    let selected: Vec<_> = units.into_iter().filter(|u| u.name == wanted).collect();
    if selected.is_empty() {
        return Err(HarnessError::UnitNotFound {
            name: wanted.to_string(),
            dir: fixture_root.to_path_buf(),
        });
    }

    Ok(ExecutionPlan {
        units: selected,
        discovered,
        is_filtered: true,
    })
}
