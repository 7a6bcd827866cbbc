use async_trait::async_trait;
use common::err_context::ErrorContext;
use std::fmt;

use crate::domain::Subscription;

/// Persistence of subscriptions.
///
/// Implementations must enforce the uniqueness of the (email, city) pair
/// atomically: `insert` fails with `Error::Duplicate` even when a concurrent
/// insert slipped past `exists_for`. A token already carried by another
/// subscription is reported as `Error::TokenConflict`, never as a duplicate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionStorage {
    /// Returns true if there is a subscription for this email and city.
    async fn exists_for(&self, email: &str, city: &str) -> Result<bool, Error>;

    async fn insert(&self, subscription: &Subscription) -> Result<(), Error>;

    /// Fails with `Error::NotFound` if no subscription carries this token.
    async fn find_by_token(&self, token: &str) -> Result<Subscription, Error>;

    /// Fails with `Error::NotFound` if no subscription carries this token.
    async fn mark_confirmed(&self, token: &str) -> Result<(), Error>;

    /// Removes the subscription for good.
    /// Fails with `Error::NotFound` if no subscription carries this token.
    async fn delete_by_token(&self, token: &str) -> Result<(), Error>;
}

#[derive(Debug)]
pub enum Error {
    /// Error returned by sqlx
    Database {
        context: String,
        source: sqlx::Error,
    },
    /// Connection issue with the database
    Connection {
        context: String,
        source: sqlx::Error,
    },
    /// Stored data does not pass domain validation
    Validation {
        context: String,
    },
    /// A subscription already exists for this email and city
    Duplicate {
        context: String,
    },
    /// The token of a new subscription is already in use
    TokenConflict {
        context: String,
    },
    NotFound {
        context: String,
    },
    Configuration {
        context: String,
    },
    /// Embedded migrations could not be applied
    Migration {
        context: String,
        source: sqlx::migrate::MigrateError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database { context, source } => {
                write!(fmt, "Database: {context} | {source}")
            }
            Error::Connection { context, source } => {
                write!(fmt, "Database Connection: {context} | {source}")
            }
            Error::Validation { context } => {
                write!(fmt, "Data: {context}")
            }
            Error::Duplicate { context } => {
                write!(fmt, "Duplicate: {context}")
            }
            Error::TokenConflict { context } => {
                write!(fmt, "Token Conflict: {context}")
            }
            Error::NotFound { context } => {
                write!(fmt, "Not Found: {context}")
            }
            Error::Configuration { context } => {
                write!(fmt, "Database Configuration: {context}")
            }
            Error::Migration { context, source } => {
                write!(fmt, "Database Migration: {context} | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database { source, .. } | Error::Connection { source, .. } => Some(source),
            Error::Migration { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ErrorContext<sqlx::Error>> for Error {
    fn from(err: ErrorContext<sqlx::Error>) -> Self {
        match err.1 {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Error::Connection {
                    context: format!("PostgreSQL Storage: Connection: {}", err.0),
                    source: err.1,
                }
            }
            sqlx::Error::RowNotFound => Error::NotFound {
                context: format!("PostgreSQL Storage: {}", err.0),
            },
            _ => Error::Database {
                context: format!("PostgreSQL Storage: Database: {}", err.0),
                source: err.1,
            },
        }
    }
}

impl From<ErrorContext<sqlx::migrate::MigrateError>> for Error {
    fn from(err: ErrorContext<sqlx::migrate::MigrateError>) -> Self {
        Error::Migration {
            context: format!("PostgreSQL Storage: {}", err.0),
            source: err.1,
        }
    }
}
