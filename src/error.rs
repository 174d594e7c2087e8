//! Error types for Medflow.
//!
//! All errors in Medflow are represented by the `MedflowError` enum.
//! The layout engine itself never fails; errors come from parsing input,
//! loading configuration and the storage layer.

use std::{io::ErrorKind, string::FromUtf8Error};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Medflow operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum MedflowError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Flow definition errors.
    #[error("{0}")]
    Flow(String),

    /// Storage operation errors.
    #[error("{0}")]
    Store(String),

    /// A record looked up by id does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        kind: String,
        id: String,
    },

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl MedflowError {
    pub fn not_found(
        kind: &str,
        id: &str,
    ) -> Self {
        MedflowError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<MedflowError> for String {
    fn from(val: MedflowError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for MedflowError {
    fn from(error: std::io::Error) -> Self {
        MedflowError::IoError(error.to_string())
    }
}

impl From<MedflowError> for std::io::Error {
    fn from(val: MedflowError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<FromUtf8Error> for MedflowError {
    fn from(_: FromUtf8Error) -> Self {
        MedflowError::Convert("Error with utf-8 string convert".to_string())
    }
}

impl From<serde_json::Error> for MedflowError {
    fn from(error: serde_json::Error) -> Self {
        MedflowError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for MedflowError {
    fn from(error: toml::de::Error) -> Self {
        MedflowError::Config(error.to_string())
    }
}
