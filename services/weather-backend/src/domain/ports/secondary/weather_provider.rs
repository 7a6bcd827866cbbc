/// Interface to a third party weather service.
use async_trait::async_trait;
use common::err_context::ErrorContext;
use std::fmt;

use crate::domain::Weather;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider {
    /// Current weather for the given city.
    async fn fetch_forecast(&self, city: &str) -> Result<Weather, Error>;
}

#[derive(Debug)]
pub enum Error {
    /// The provider does not know this city
    CityNotFound {
        context: String,
    },
    /// Transport, timeout, or decoding issue
    Connection {
        context: String,
        source: reqwest::Error,
    },
    /// The provider answered with an error of its own
    Api {
        context: String,
        code: i64,
        message: String,
    },
    Configuration {
        context: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CityNotFound { context } => {
                write!(fmt, "City not found: {context}")
            }
            Error::Connection { context, source } => {
                write!(fmt, "Weather Provider Connection: {context} | {source}")
            }
            Error::Api {
                context,
                code,
                message,
            } => {
                write!(fmt, "Weather Provider API: {context} | {code}: {message}")
            }
            Error::Configuration { context } => {
                write!(fmt, "Weather Provider Configuration: {context}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ErrorContext<reqwest::Error>> for Error {
    fn from(err: ErrorContext<reqwest::Error>) -> Self {
        Error::Connection {
            context: err.0,
            source: err.1,
        }
    }
}
