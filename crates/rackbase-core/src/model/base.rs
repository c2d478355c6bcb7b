//! Base object records
//!
//! Every asset-like entity in Rackbase is backed by a [`BaseObject`]
//! row that carries its identity, an optional service/environment tag
//! and an optional typed ownership edge to a parent object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a base object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

/// A logical service paired with a deployment environment
///
/// Inherited down ownership hierarchies: a child object saved under a
/// tagged parent takes the parent's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEnvironment {
    pub service: String,
    pub environment: String,
}

impl ServiceEnvironment {
    pub fn new(service: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            environment: environment.into(),
        }
    }
}

impl std::fmt::Display for ServiceEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.service, self.environment)
    }
}

/// Generic record backing every asset-like entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseObject {
    /// Object identity
    pub id: ObjectId,

    /// Logical owner, if any (project for a cloud host, etc.)
    pub parent: Option<ObjectId>,

    /// Service/environment tag
    pub service_env: Option<ServiceEnvironment>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl BaseObject {
    pub fn new(id: ObjectId, parent: Option<ObjectId>, service_env: Option<ServiceEnvironment>) -> Self {
        let now = Utc::now();
        Self {
            id,
            parent,
            service_env,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
