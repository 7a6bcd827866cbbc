use std::env;

use xtask::tasks::ci::ci;
use xtask::tasks::database::{migrate, postgres_db};
use xtask::tasks::test::xtest;

fn main() -> Result<(), anyhow::Error> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("ci") => ci(),
        Some("test") => xtest(),
        Some("postgres") => postgres_db(),
        Some("migrate") => migrate(),
        _ => print_help(),
    }
}

fn print_help() -> anyhow::Result<()> {
    eprintln!(
        r#"
Usage: cargo xtask <task>

Tasks:
  test            runs unit and integration tests (uses nextest if installed)
  ci              runs all necessary checks to avoid CI errors when git pushed
  postgres        starts up a postgres docker container with the weather database
  migrate         applies the database migrations with sqlx-cli
"#
    );

    Ok(())
}
