use std::process::{Command, ExitStatus};

use owo_colors::OwoColorize;

use crate::{
    project_root,
    tasks::test::{run_integration_test, run_unit_test},
};

pub fn ci() -> Result<(), anyhow::Error> {
    println!("Running `cargo check`...");
    let check = cargo(&["check", "--workspace", "--all-targets"])?;

    println!("Running `cargo clippy`...");
    let clippy = cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;

    println!("Running `cargo fmt`...");
    let fmt = cargo(&["fmt", "--all", "--", "--check"])?;

    println!("Running unit tests...");
    let unit_test = run_unit_test()?;

    println!("Running integration tests...");
    let integration_test = run_integration_test()?;

    let results = [
        ("cargo check", check),
        ("cargo clippy", clippy),
        ("cargo fmt", fmt),
        ("unit tests", unit_test),
        ("integration tests", integration_test),
    ];

    let failures = results
        .iter()
        .filter(|(task, status)| print_error_with_status_code(task, *status))
        .count();

    if failures > 0 {
        anyhow::bail!("{failures} CI check(s) failed");
    }

    println!("{}", "CI checks complete.".green());
    Ok(())
}

fn cargo(args: &[&str]) -> Result<ExitStatus, anyhow::Error> {
    let status = Command::new("cargo")
        .current_dir(project_root())
        .args(args)
        .status()?;
    Ok(status)
}

/// Returns true if the task failed.
fn print_error_with_status_code(task: &str, status: ExitStatus) -> bool {
    if status.success() {
        return false;
    }
    let code = match status.code() {
        Some(x) => x.to_string(),
        None => "<< no status code >>".to_string(),
    };
    println!(
        "{} `{}` finished with a non-zero status code: {}",
        "Error:".to_string().red(),
        task.blue(),
        code
    );
    true
}
