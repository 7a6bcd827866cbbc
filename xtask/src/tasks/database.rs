use common::config::merge_configuration;
use common::settings::{DatabaseSettings, Settings};
use std::process::Command;

use crate::{check_docker_exists, check_sqlx_exists, project_root};

const CONTAINER_NAME: &str = "weather-postgres";
const POSTGRES_IMAGE: &str = "postgres:15-alpine";

/// Database settings of the 'dev' profile.
pub fn database_settings() -> Result<DatabaseSettings, anyhow::Error> {
    let config_dir = project_root().join("config");
    println!(
        "Reading database configuration from {}",
        config_dir.display()
    );
    let settings: Settings = merge_configuration(
        &config_dir,
        &["service", "database", "weather"],
        "dev",
        "WEATHER",
        vec![],
    )?
    .try_deserialize()?;
    Ok(settings.database)
}

pub fn postgres_db() -> Result<(), anyhow::Error> {
    check_docker_exists()?;

    let settings = database_settings()?;

    println!("Starting docker image ({POSTGRES_IMAGE}) ...");
    let status = Command::new("docker")
        .current_dir(project_root())
        .args([
            "run",
            "--name",
            CONTAINER_NAME,
            "-e",
            &format!("POSTGRES_USER={}", settings.username),
            "-e",
            &format!("POSTGRES_PASSWORD={}", settings.password),
            "-e",
            &format!("POSTGRES_DB={}", settings.database_name),
            "-p",
            &format!("{}:5432", settings.port),
            "-d",
            POSTGRES_IMAGE,
        ])
        .status()?;

    if !status.success() {
        anyhow::bail!("Could not run docker image");
    }

    println!("Docker Postgres server online");
    println!("Set DATABASE_URL=\"{}\"", settings.connection_string());

    Ok(())
}

/// The server also applies the migrations at startup when `database.migrate` is set.
pub fn migrate() -> Result<(), anyhow::Error> {
    check_sqlx_exists()?;

    let settings = database_settings()?;

    let status = Command::new("sqlx")
        .current_dir(project_root())
        .env("DATABASE_URL", settings.connection_string())
        .args([
            "migrate",
            "run",
            "--source",
            "services/weather-backend/migrations",
        ])
        .status()?;

    if !status.success() {
        anyhow::bail!("there was a problem applying the migrations");
    }

    Ok(())
}
