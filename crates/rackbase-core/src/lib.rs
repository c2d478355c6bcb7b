//! Rackbase core record store
//!
//! This crate provides the base-object layer shared by every asset-like
//! entity in Rackbase: stable identities, service/environment tagging,
//! parent/child linkage, hardware/virtual component attachments and IP
//! address ownership records.
//!
//! Higher layers (e.g. `rackbase-cloud`) compose their own entity tables
//! on top of [`InventoryStore`] and rely on it for everything generic:
//! object lifecycle, tag inheritance, component catalog resolution and
//! IP claims.

pub mod error;
pub mod model;
pub mod state;
pub mod store;

// Re-exports
pub use error::{CoreError, Result};
pub use model::{
    BaseObject, ComponentId, ComponentIndex, ComponentModel, ComponentModelSpec, ComponentType,
    IpRecord, ModelId, ObjectId, ServiceEnvironment, VirtualComponent,
};
pub use state::SnapshotManager;
pub use store::InventoryStore;
