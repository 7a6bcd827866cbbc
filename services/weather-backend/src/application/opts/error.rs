use std::fmt;

use common::config::Error as ConfigError;

#[derive(Debug)]
pub enum Error {
    Merging {
        context: String,
        source: ConfigError,
    },
    Deserializing {
        context: String,
        source: ::config::ConfigError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Merging { context, source } => {
                write!(fmt, "Could not merge configuration: {context} | {source}")
            }
            Error::Deserializing { context, source } => {
                write!(fmt, "Could not deserialize settings: {context} | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Merging { source, .. } => Some(source),
            Error::Deserializing { source, .. } => Some(source),
        }
    }
}
