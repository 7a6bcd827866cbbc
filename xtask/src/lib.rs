pub mod tasks;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Root of the workspace, one level above this crate.
pub fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn check_command_exists(program: &str, args: &[&str], hint: &str) -> Result<(), anyhow::Error> {
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => Ok(()),
        _ => anyhow::bail!("`{program}` is not available. {hint}"),
    }
}

pub fn check_docker_exists() -> Result<(), anyhow::Error> {
    check_command_exists("docker", &["--version"], "Install docker first.")
}

pub fn check_sqlx_exists() -> Result<(), anyhow::Error> {
    check_command_exists(
        "sqlx",
        &["--version"],
        "Run `cargo install sqlx-cli --no-default-features --features rustls,postgres`.",
    )
}

pub fn check_nextest_exists() -> Result<(), anyhow::Error> {
    check_command_exists(
        "cargo",
        &["nextest", "--version"],
        "Run `cargo install cargo-nextest`.",
    )
}
