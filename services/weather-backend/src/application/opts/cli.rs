use std::path::PathBuf;

use common::config;
use common::settings::Settings;

use super::Error;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the environment variables overriding settings, eg `WEATHER__DATABASE__PASSWORD`.
pub const ENV_PREFIX: &str = "WEATHER";

/// Configuration sub directories, one per settings section.
pub const CONFIG_SUB_DIRS: [&str; 3] = ["service", "database", "weather"];

#[derive(Debug, Clone, clap::Parser)]
#[clap(
    name = "weather",
    about = "Weather forecast and subscription REST API",
    version = VERSION,
    )]
pub struct Opts {
    /// Defines the config directory
    #[arg(value_parser = clap::value_parser!(PathBuf), short = 'c', long = "config-dir")]
    pub config_dir: PathBuf,

    /// Defines the run mode in {testing, dev, prod, ...}
    ///
    /// If no run mode is provided, a default behavior will be used.
    #[arg(short = 'm', long = "run-mode")]
    pub run_mode: Option<String>,

    /// Override settings values using key=value
    #[arg(short = 's', long = "setting")]
    pub settings: Vec<String>,

    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Clone, clap::Parser)]
pub enum Command {
    /// Runs the REST server
    Run,
    /// Prints the configuration
    Config,
}

impl TryInto<Settings> for Opts {
    type Error = Error;

    fn try_into(self) -> Result<Settings, Self::Error> {
        config::merge_configuration(
            self.config_dir.as_ref(),
            &CONFIG_SUB_DIRS,
            self.run_mode.as_deref(),
            ENV_PREFIX,
            self.settings.clone(),
        )
        .map_err(|err| Error::Merging {
            context: "Weather Server Settings: Could not merge configuration".to_string(),
            source: err,
        })?
        .try_deserialize()
        .map_err(|err| Error::Deserializing {
            context: "Weather Server Settings: Could not deserialize configuration".to_string(),
            source: err,
        })
    }
}
