//! Component catalog models and attachments
//!
//! A [`ComponentModel`] is a catalog descriptor (name-unique) for a
//! resource unit such as "8 cores vCPU". A [`VirtualComponent`] attaches
//! one catalog model to one base object. Derived accessors higher up
//! (flavor cores/memory/disk) read through these records.

use super::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of resource a component represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Processor,
    Memory,
    Disk,
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentType::Processor => write!(f, "processor"),
            ComponentType::Memory => write!(f, "memory"),
            ComponentType::Disk => write!(f, "disk"),
        }
    }
}

/// Stable identifier of a catalog model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u64);

/// Stable identifier of a component attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

/// Catalog descriptor for a resource unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentModel {
    pub id: ModelId,

    /// Display name, unique across the catalog (e.g. "8 cores vCPU")
    pub name: String,

    pub component_type: ComponentType,

    /// Core count, for processor models
    pub cores: Option<u32>,

    /// Size in MiB, for memory and disk models
    pub size_mib: Option<u64>,

    /// Model family (e.g. "vcpu")
    pub family: Option<String>,
}

/// Lookup-or-create argument for [`InventoryStore::ensure_model`]
///
/// Resolution is by exact name; the remaining fields are only used when
/// a new catalog entry has to be created.
///
/// [`InventoryStore::ensure_model`]: crate::store::InventoryStore::ensure_model
#[derive(Debug, Clone)]
pub struct ComponentModelSpec {
    pub name: String,
    pub component_type: ComponentType,
    pub cores: Option<u32>,
    pub size_mib: Option<u64>,
    pub family: Option<String>,
}

impl ComponentModelSpec {
    pub fn new(name: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            name: name.into(),
            component_type,
            cores: None,
            size_mib: None,
            family: None,
        }
    }

    pub fn with_cores(mut self, cores: u32) -> Self {
        self.cores = Some(cores);
        self
    }

    pub fn with_size_mib(mut self, size_mib: u64) -> Self {
        self.size_mib = Some(size_mib);
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

/// Component record linking a base object to a catalog model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualComponent {
    pub id: ComponentId,
    pub base_object: ObjectId,
    pub model: ModelId,
}

/// Pre-loaded component view for one base object
///
/// Built once via [`InventoryStore::component_index`] when a caller is
/// about to read several derived values; accessors consult the index
/// first and only fall back to a store query when no index was supplied.
/// At most one model per component type is retained, matching the
/// one-active-component-per-type invariant.
///
/// [`InventoryStore::component_index`]: crate::store::InventoryStore::component_index
#[derive(Debug, Clone, Default)]
pub struct ComponentIndex {
    entries: HashMap<ComponentType, ComponentModel>,
}

impl ComponentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ComponentModel) {
        self.entries.insert(model.component_type, model);
    }

    pub fn get(&self, component_type: ComponentType) -> Option<&ComponentModel> {
        self.entries.get(&component_type)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
