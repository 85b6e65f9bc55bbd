//! Shared helpers for CLI integration tests.

use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;

/// `schemasplit` run from `dir` with a clean environment.
pub fn schemasplit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("schemasplit").expect("binary builds");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("SCHEMASPLIT_CONFIG")
        .env_remove("SCHEMASPLIT_FORMAT")
        .env_remove("SCHEMASPLIT_VALIDATE")
        .env_remove("SCHEMASPLIT_CLEAN")
        .env("SCHEMASPLIT_LOG_LEVEL", "warn");
    cmd
}

/// Write `value` as `name` (JSON) under `dir`.
pub fn write_schema(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), schemasplit_test_utils::to_json_text(value))
        .expect("write schema");
}
