use config::ConfigError;
use std::fmt;

use crate::err_context::ErrorContext;

#[derive(Debug)]
pub enum Error {
    /// The configuration sources (files, environment) could not be merged
    Merging {
        context: String,
        source: ConfigError,
    },
    /// A command line `key=value` assignment is not valid TOML
    Override {
        assignment: String,
        source: ConfigError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Merging { context, source } => {
                write!(fmt, "Could not merge configuration: {context} | {source}")
            }
            Error::Override { assignment, source } => {
                write!(fmt, "Invalid setting override '{assignment}' | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Merging { source, .. } | Error::Override { source, .. } => Some(source),
        }
    }
}

impl From<ErrorContext<ConfigError>> for Error {
    fn from(ctx: ErrorContext<ConfigError>) -> Error {
        Error::Merging {
            context: ctx.0,
            source: ctx.1,
        }
    }
}
