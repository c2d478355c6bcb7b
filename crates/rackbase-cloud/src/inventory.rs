//! Cloud inventory aggregate
//!
//! [`CloudInventory`] owns the generic base-object store plus one keyed
//! table per cloud entity. External identifiers (`flavor_id`,
//! `project_id`, `host_id`, provider names) are enforced unique by the
//! entity operations; the tables themselves are keyed by the backing
//! [`ObjectId`] so entity rows and base-object rows stay in lockstep.

use crate::flavor::CloudFlavor;
use crate::host::CloudHost;
use crate::project::CloudProject;
use crate::provider::{CloudProvider, ProviderId};
use crate::records::{Database, Vip, VirtualServer};
use rackbase_core::{InventoryStore, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All cloud entity tables plus the shared record store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudInventory {
    pub(crate) store: InventoryStore,
    pub(crate) providers: HashMap<ProviderId, CloudProvider>,
    pub(crate) flavors: HashMap<ObjectId, CloudFlavor>,
    pub(crate) projects: HashMap<ObjectId, CloudProject>,
    pub(crate) hosts: HashMap<ObjectId, CloudHost>,
    pub(crate) databases: HashMap<ObjectId, Database>,
    pub(crate) vips: HashMap<ObjectId, Vip>,
    pub(crate) virtual_servers: HashMap<ObjectId, VirtualServer>,

    pub(crate) next_provider: u64,
}

impl CloudInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying base-object store
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn flavor_count(&self) -> usize {
        self.flavors.len()
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}
