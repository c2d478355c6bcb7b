//! Cloud inventory error types

use rackbase_core::ObjectId;
use thiserror::Error;

/// Cloud inventory errors
///
/// Lookup misses are `Option`s at the API surface; these variants cover
/// uniqueness violations and dangling references only.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Provider name already in use: {0}")]
    DuplicateProvider(String),

    #[error("Provider still referenced by flavors, projects or hosts: {0}")]
    ProviderInUse(String),

    #[error("Flavor not found: {0}")]
    FlavorNotFound(ObjectId),

    #[error("Flavor id already in use: {0}")]
    DuplicateFlavorId(String),

    #[error("Flavor still referenced by hosts: {0}")]
    FlavorInUse(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(ObjectId),

    #[error("Project id already in use: {0}")]
    DuplicateProjectId(String),

    #[error("Host not found: {0}")]
    HostNotFound(ObjectId),

    #[error("Host id already in use: {0}")]
    DuplicateHostId(String),

    #[error("Record not found: {0}")]
    RecordNotFound(ObjectId),

    #[error(transparent)]
    Core(#[from] rackbase_core::CoreError),
}

pub type Result<T> = std::result::Result<T, CloudError>;
