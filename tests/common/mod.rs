// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Creates an empty fixture directory.
pub fn fixture_dir() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// Writes `<name>.test` with the given script body into `dir`.
pub fn write_unit(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(format!("{name}.test"));
    fs::write(&path, body).expect("Failed to write test unit");
    path
}

/// Writes a supporting fixture file into `dir`.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Writes `Harness.toml` into `dir`.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    write_fixture(dir, "Harness.toml", content)
}

/// A fixture directory holding one unit with the given body.
pub fn single_unit(name: &str, body: &str) -> TempDir {
    let dir = fixture_dir();
    write_unit(dir.path(), name, body);
    dir
}
