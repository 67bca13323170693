//! Crate-wide error type.

use thiserror::Error;

/// Errors produced by the supply-chain heuristics.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation that needs at least one element got none.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A record failed validation (negative weight, non-finite coordinate, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An algorithm configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A route or flow arc refers to a node that does not exist.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A node or route id was registered twice.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// The problem has no solution under the given constraints.
    #[error("infeasible: {0}")]
    Infeasible(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(feature = "serde")]
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
