//! Error types for the simulation.

use crate::types::{Dimensions, EntityKind, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Position {position} is outside the {dimensions} grid")]
    OutOfBounds {
        position: Position,
        dimensions: Dimensions,
    },

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(u8),

    #[error("Missing asset for entity kind: {0}")]
    MissingAsset(EntityKind),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
