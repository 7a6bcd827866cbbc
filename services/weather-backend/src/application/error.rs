use common::err_context::ErrorContext;
use std::fmt;

use super::listener::Error as ListenerError;
use super::server::Error as ServerError;
use crate::domain::ports::secondary::{StorageError, WeatherError};

#[derive(Debug)]
pub enum Error {
    Listener {
        context: String,
        source: ListenerError,
    },
    Storage {
        context: String,
        source: StorageError,
    },
    Weather {
        context: String,
        source: WeatherError,
    },
    Startup {
        context: String,
        source: ServerError,
    },
    Server {
        context: String,
        source: hyper::Error,
    },
    Configuration {
        context: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Listener { context, source } => {
                write!(fmt, "Could not build TCP listener: {context} | {source}")
            }
            Error::Storage { context, source } => {
                write!(fmt, "Storage Error: {context} | {source}")
            }
            Error::Weather { context, source } => {
                write!(fmt, "Weather Provider Error: {context} | {source}")
            }
            Error::Startup { context, source } => {
                write!(fmt, "Application Startup Error: {context} | {source}")
            }
            Error::Server { context, source } => {
                write!(fmt, "Application Server Error: {context} | {source}")
            }
            Error::Configuration { context } => {
                write!(fmt, "Application Configuration Error: {context}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Listener { source, .. } => Some(source),
            Error::Storage { source, .. } => Some(source),
            Error::Weather { source, .. } => Some(source),
            Error::Startup { source, .. } => Some(source),
            Error::Server { source, .. } => Some(source),
            Error::Configuration { .. } => None,
        }
    }
}

impl From<ErrorContext<StorageError>> for Error {
    fn from(err: ErrorContext<StorageError>) -> Self {
        Error::Storage {
            context: err.0,
            source: err.1,
        }
    }
}

impl From<ErrorContext<WeatherError>> for Error {
    fn from(err: ErrorContext<WeatherError>) -> Self {
        Error::Weather {
            context: err.0,
            source: err.1,
        }
    }
}

impl From<ErrorContext<ListenerError>> for Error {
    fn from(err: ErrorContext<ListenerError>) -> Self {
        Error::Listener {
            context: err.0,
            source: err.1,
        }
    }
}

impl From<ErrorContext<hyper::Error>> for Error {
    fn from(err: ErrorContext<hyper::Error>) -> Self {
        Error::Server {
            context: err.0,
            source: err.1,
        }
    }
}

impl From<ErrorContext<ServerError>> for Error {
    fn from(err: ErrorContext<ServerError>) -> Self {
        Error::Startup {
            context: err.0,
            source: err.1,
        }
    }
}
