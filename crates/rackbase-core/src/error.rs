//! Core record store error types

use crate::model::ObjectId;
use thiserror::Error;

/// Errors raised by the base-object store and snapshot persistence
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Component model name already in use: {0}")]
    DuplicateModelName(String),

    #[error("IP address record already exists: {0}")]
    DuplicateIpAddress(std::net::IpAddr),

    #[error("Snapshot file error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
