//! Cloud host records
//!
//! A host is a provisioned instance: one flavor, one provider, a
//! provider-side `host_id`, a hostname, and optionally a hypervisor
//! asset and image name. Its service/environment is never authoritative
//! on the host itself: every save re-derives it from the parent project
//! when one is set.
//!
//! IP assignment is a best-effort set reconciliation. Addresses already
//! owned by another object are logged and skipped, never raised; the
//! returned [`IpSyncReport`] makes the partial outcome observable.

use crate::error::{CloudError, Result};
use crate::inventory::CloudInventory;
use crate::project::CloudProject;
use crate::provider::ProviderId;
use rackbase_core::{ObjectId, ServiceEnvironment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::IpAddr;

/// Provisioned cloud instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudHost {
    /// Backing base object
    pub object: ObjectId,

    /// Instance type
    pub flavor: ObjectId,

    pub provider: ProviderId,

    /// Provider-side instance identifier, unique across the inventory
    pub host_id: String,

    pub hostname: String,

    /// Physical asset this instance runs on, when known
    pub hypervisor: Option<ObjectId>,

    pub image_name: Option<String>,
}

/// Parameters for registering a host
#[derive(Debug, Clone)]
pub struct NewCloudHost {
    pub host_id: String,
    pub hostname: String,
    pub flavor: ObjectId,
    pub provider: ProviderId,
    pub parent: Option<ObjectId>,
    pub service_env: Option<ServiceEnvironment>,
    pub hypervisor: Option<ObjectId>,
    pub image_name: Option<String>,
}

impl NewCloudHost {
    pub fn new(
        host_id: impl Into<String>,
        hostname: impl Into<String>,
        flavor: ObjectId,
        provider: ProviderId,
    ) -> Self {
        Self {
            host_id: host_id.into(),
            hostname: hostname.into(),
            flavor,
            provider,
            parent: None,
            service_env: None,
            hypervisor: None,
            image_name: None,
        }
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_service_env(mut self, service_env: ServiceEnvironment) -> Self {
        self.service_env = Some(service_env);
        self
    }

    pub fn with_hypervisor(mut self, hypervisor: ObjectId) -> Self {
        self.hypervisor = Some(hypervisor);
        self
    }

    pub fn with_image_name(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = Some(image_name.into());
        self
    }
}

/// Per-address outcome of one IP set reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpSyncReport {
    /// Addresses now owned by the host (claimed or newly created)
    pub claimed: Vec<IpAddr>,

    /// Addresses skipped because another object owns them
    pub conflicts: Vec<IpAddr>,

    /// Addresses released back to the unassigned pool
    pub released: Vec<IpAddr>,
}

impl IpSyncReport {
    pub fn is_noop(&self) -> bool {
        self.claimed.is_empty() && self.conflicts.is_empty() && self.released.is_empty()
    }
}

impl CloudInventory {
    /// Register a host under a unique provider-side `host_id`
    ///
    /// The save path runs immediately, so a host created under a parent
    /// carries the parent's service/environment regardless of what the
    /// caller supplied.
    pub fn add_host(&mut self, new: NewCloudHost) -> Result<ObjectId> {
        if self.provider(new.provider).is_none() {
            return Err(CloudError::ProviderNotFound(new.provider.to_string()));
        }
        if !self.flavors.contains_key(&new.flavor) {
            return Err(CloudError::FlavorNotFound(new.flavor));
        }
        if self.host_by_host_id(&new.host_id).is_some() {
            return Err(CloudError::DuplicateHostId(new.host_id));
        }

        let object = self.store.create_object(new.parent, new.service_env);
        self.hosts.insert(
            object,
            CloudHost {
                object,
                flavor: new.flavor,
                provider: new.provider,
                host_id: new.host_id,
                hostname: new.hostname,
                hypervisor: new.hypervisor,
                image_name: new.image_name,
            },
        );
        self.save_host(object)?;
        Ok(object)
    }

    pub fn host(&self, object: ObjectId) -> Option<&CloudHost> {
        self.hosts.get(&object)
    }

    pub fn host_by_host_id(&self, host_id: &str) -> Option<&CloudHost> {
        self.hosts.values().find(|h| h.host_id == host_id)
    }

    /// Persist-time derivation: copy the parent's service/environment
    ///
    /// Silent no-op when no parent is set.
    pub fn save_host(&mut self, object: ObjectId) -> Result<()> {
        if !self.hosts.contains_key(&object) {
            return Err(CloudError::HostNotFound(object));
        }
        self.store.inherit_service_env(object)?;
        Ok(())
    }

    /// Re-parent a host and re-derive its tag
    pub fn set_host_parent(&mut self, object: ObjectId, parent: Option<ObjectId>) -> Result<()> {
        if !self.hosts.contains_key(&object) {
            return Err(CloudError::HostNotFound(object));
        }
        self.store.set_parent(object, parent)?;
        self.save_host(object)
    }

    /// Addresses currently owned by the host
    pub fn host_ip_addresses(&self, object: ObjectId) -> BTreeSet<IpAddr> {
        self.store.ips_owned_by(object)
    }

    /// Reconcile the host's owned addresses against `target`
    ///
    /// Computes the symmetric difference with the current set. Added
    /// addresses claim an existing unowned record, create a missing one,
    /// or - when another object owns the record - log a warning and land
    /// in the report's conflicts. Removed addresses release ownership.
    /// An identical target set returns a no-op report.
    pub fn set_host_ip_addresses(
        &mut self,
        object: ObjectId,
        target: &BTreeSet<IpAddr>,
    ) -> Result<IpSyncReport> {
        let host = self
            .hosts
            .get(&object)
            .ok_or(CloudError::HostNotFound(object))?;
        let hostname = host.hostname.clone();
        let current = self.store.ips_owned_by(object);
        let mut report = IpSyncReport::default();
        if current == *target {
            return Ok(report);
        }

        for address in target.difference(&current) {
            match self.store.ip(*address).map(|r| r.base_object) {
                Some(Some(owner)) if owner != object => {
                    tracing::warn!(
                        "Cannot assign IP {address} to {hostname} - it is already in use by another asset"
                    );
                    report.conflicts.push(*address);
                }
                Some(_) => {
                    self.store.claim_ip(*address, object)?;
                    report.claimed.push(*address);
                }
                None => {
                    self.store.create_ip(*address, Some(object))?;
                    report.claimed.push(*address);
                }
            }
        }

        for address in current.difference(target) {
            self.store.release_ip(*address);
            report.released.push(*address);
        }

        Ok(report)
    }

    /// The parent resolved as a cloud project, if it is one
    pub fn host_cloud_project(&self, object: ObjectId) -> Option<&CloudProject> {
        let parent = self.hosts.get(&object).and_then(|h| {
            self.store.object(h.object).and_then(|o| o.parent)
        })?;
        self.projects.get(&parent)
    }

    /// Delete a host, releasing its owned addresses
    pub fn remove_host(&mut self, object: ObjectId) -> Result<CloudHost> {
        let host = self
            .hosts
            .remove(&object)
            .ok_or(CloudError::HostNotFound(object))?;
        self.store.remove_object(object)?;
        Ok(host)
    }
}
