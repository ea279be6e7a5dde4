//! Error types for the CLI runtime.

use std::io;

use argot::{ArgumentError, ModelError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read schema {path}: {source}")]
    ReadSchema { path: String, source: io::Error },
    #[error("failed to decode schema {path}: {source}")]
    DecodeSchema {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid schema: {0}")]
    Model(#[from] ModelError),
    #[error("{0}")]
    Argument(#[from] ArgumentError),
    #[error("failed to serialise output: {0}")]
    Serialise(serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
