use crate::evolutions;
use hyper::http;
use std::{fmt::Display, io, sync};

#[derive(Debug)]
pub enum Error {
    HeaderNotFound(String),
    DatabasePluginNotRegistered,
    UnknownDataSource(String),
    UnknownAction(String),
    InvalidDatabaseRevision {
        data_source: String,
        script: String,
    },
    InconsistentDatabase {
        data_source: String,
        revision: i64,
        problem: String,
    },
    EvolutionFailed {
        data_source: String,
        revision: i64,
        problem: String,
    },
    InvalidEvolutions(evolutions::error::Error),
    InvalidConfiguration(String),
    SqliteError(rusqlite::Error),
    IoError(io::Error),
    TomlError(toml::de::Error),
    HttpError(http::Error),
    InvalidHeaderValue,
    PoisonedLock,
}

impl Error {
    /// Whether this error signals a database whose evolutions lag behind the
    /// application's evolution scripts.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Error::InvalidDatabaseRevision { .. })
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::HeaderNotFound(key) => write!(f, "Header not found: {}", key),
            Error::DatabasePluginNotRegistered => write!(
                f,
                "The database plugin isn't registered, enable it in the application configuration"
            ),
            Error::UnknownDataSource(name) => write!(f, "Unknown data source: {}", name),
            Error::UnknownAction(name) => write!(f, "Unknown controller action: {}", name),
            Error::InvalidDatabaseRevision {
                data_source,
                script,
            } => write!(
                f,
                "Database '{}' needs evolution! An SQL script will be run on your database:\n{}",
                data_source, script
            ),
            Error::InconsistentDatabase {
                data_source,
                revision,
                problem,
            } => write!(
                f,
                "Database '{}' is in an inconsistent state at revision {}: {}",
                data_source, revision, problem
            ),
            Error::EvolutionFailed {
                data_source,
                revision,
                problem,
            } => write!(
                f,
                "Evolution {} failed on database '{}': {}",
                revision, data_source, problem
            ),
            Error::InvalidEvolutions(e) => write!(f, "Invalid evolutions: {}", e),
            Error::InvalidConfiguration(message) => {
                write!(f, "Invalid configuration: {}", message)
            }
            Error::SqliteError(e) => write!(f, "Sqlite error: {}", e),
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::TomlError(e) => write!(f, "Toml error: {}", e),
            Error::HttpError(e) => write!(f, "Http Error: {}", e),
            Error::InvalidHeaderValue => write!(f, "Invalid header value"),
            Error::PoisonedLock => write!(f, "The lock was poisoned"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::SqliteError(e)
    }
}

impl From<evolutions::error::Error> for Error {
    fn from(e: evolutions::error::Error) -> Self {
        Error::InvalidEvolutions(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::TomlError(e)
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::HttpError(e)
    }
}
