mod error;
pub use self::error::Error;

use config::{Config, Environment, File, FileFormat};
use std::{env, path::Path};
use tracing::trace;

use crate::err_context::ErrorContextExt;

static DEFAULT_ENV_NAME: &str = "default";
static LOCAL_ENV_NAME: &str = "local";

/// Name of the environment variable used to select a profile, which takes
/// precedence over the profile given as argument.
pub static PROFILE_ENV_VAR: &str = "WEATHER_PROFILE";

/// Builds a configuration by merging, in order:
/// * for each sub directory: `default`, then the profile, then `local`,
/// * environment variables starting with `prefix` (using `__` as separator),
/// * the `key=value` overrides.
pub fn merge_configuration<
    'a,
    R: Into<Option<&'a str>> + Clone,
    P: Into<Option<&'a str>>,
    D: AsRef<str>,
>(
    root_dir: &Path,
    sub_dirs: &[D],
    profile: R,
    prefix: P,
    overrides: Vec<String>,
) -> Result<Config, Error> {
    let mut builder = sub_dirs
        .iter()
        .try_fold(Config::builder(), |mut builder, sub_dir| {
            let dir_path = root_dir.join(sub_dir.as_ref());

            let default_path = dir_path.join(DEFAULT_ENV_NAME);

            trace!(
                "Reading default configuration from: {}",
                default_path.display()
            );

            builder = builder.add_source(File::from(default_path));

            // The profile from the environment wins over the one given as argument
            // (usually coming from the command line).
            if let Some(profile) = env::var(PROFILE_ENV_VAR)
                .ok()
                .or_else(|| profile.clone().into().map(String::from))
            {
                let profile_path = dir_path.join(profile);

                trace!(
                    "Reading profile configuration from: {}",
                    profile_path.display()
                );

                builder = builder.add_source(File::from(profile_path).required(false));
            }

            // This file shouldn't be checked in to git
            let local_path = dir_path.join(LOCAL_ENV_NAME);

            trace!("Reading local configuration from: {}", local_path.display());

            builder = builder.add_source(File::from(local_path).required(false));

            Ok::<_, Error>(builder)
        })?;

    if let Some(prefix) = prefix.into() {
        let prefix = Environment::with_prefix(prefix)
            .prefix_separator("__")
            .separator("__");
        builder = builder.add_source(prefix)
    }

    if !overrides.is_empty() {
        builder = builder.add_source(config_from_args(overrides)?)
    }

    builder
        .build()
        .context("Could not merge configuration")
        .map_err(|err| err.into())
}

/// Configuration source built from `key=value` assignments, each one being a
/// TOML snippet (strings must be quoted).
fn config_from_args(args: impl IntoIterator<Item = String>) -> Result<Config, Error> {
    args.into_iter()
        .try_fold(Config::builder(), |builder, arg| {
            // Each assignment is parsed on its own so the faulty one can be reported.
            Config::builder()
                .add_source(File::from_str(&arg, FileFormat::Toml))
                .build()
                .map_err(|source| Error::Override {
                    assignment: arg.clone(),
                    source,
                })?;
            Ok::<_, Error>(builder.add_source(File::from_str(&arg, FileFormat::Toml)))
        })?
        .build()
        .context("Could not build configuration from args")
        .map_err(Error::from)
}
