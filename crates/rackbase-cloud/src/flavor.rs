//! Cloud flavor records and derived resource accessors
//!
//! A flavor is an instance-type catalog entry owned by one provider.
//! Its cores/memory/disk values are not stored on the flavor row;
//! each is backed by at most one attached component whose catalog
//! model carries the actual number. Setters synthesize the catalog
//! model by name ("8 cores vCPU", "2048 MiB vMEM", "10 GiB vHDD"),
//! retire any prior component of the same type and attach a fresh one.

use crate::error::{CloudError, Result};
use crate::inventory::CloudInventory;
use crate::provider::ProviderId;
use rackbase_core::{ComponentIndex, ComponentModelSpec, ComponentType, ObjectId};
use serde::{Deserialize, Serialize};

/// Instance-type catalog entry of one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFlavor {
    /// Backing base object
    pub object: ObjectId,

    pub name: String,

    pub provider: ProviderId,

    /// Provider-side flavor identifier, unique across the inventory
    pub flavor_id: String,
}

impl CloudInventory {
    /// Register a flavor under a unique provider-side `flavor_id`
    pub fn add_flavor(
        &mut self,
        name: impl Into<String>,
        provider: ProviderId,
        flavor_id: impl Into<String>,
    ) -> Result<ObjectId> {
        let flavor_id = flavor_id.into();
        if self.provider(provider).is_none() {
            return Err(CloudError::ProviderNotFound(provider.to_string()));
        }
        if self.flavor_by_flavor_id(&flavor_id).is_some() {
            return Err(CloudError::DuplicateFlavorId(flavor_id));
        }

        let object = self.store.create_object(None, None);
        self.flavors.insert(
            object,
            CloudFlavor {
                object,
                name: name.into(),
                provider,
                flavor_id,
            },
        );
        Ok(object)
    }

    pub fn flavor(&self, object: ObjectId) -> Option<&CloudFlavor> {
        self.flavors.get(&object)
    }

    pub fn flavor_by_flavor_id(&self, flavor_id: &str) -> Option<&CloudFlavor> {
        self.flavors.values().find(|f| f.flavor_id == flavor_id)
    }

    /// Delete a flavor that no host references
    pub fn remove_flavor(&mut self, object: ObjectId) -> Result<CloudFlavor> {
        let flavor = self
            .flavors
            .get(&object)
            .ok_or(CloudError::FlavorNotFound(object))?;
        if self.hosts.values().any(|h| h.flavor == object) {
            return Err(CloudError::FlavorInUse(flavor.flavor_id.clone()));
        }
        let flavor = self
            .flavors
            .remove(&object)
            .ok_or(CloudError::FlavorNotFound(object))?;
        self.store.remove_object(object)?;
        Ok(flavor)
    }

    // ---- derived resource accessors ----

    /// Number of cores
    ///
    /// Pass a pre-built [`ComponentIndex`] to answer from memory when
    /// components were bulk-fetched in advance; without one the store
    /// is queried directly. `None` when no processor component is
    /// attached.
    pub fn flavor_cores(&self, object: ObjectId, index: Option<&ComponentIndex>) -> Option<u32> {
        self.component_field(object, ComponentType::Processor, index, |m| m.cores)
    }

    /// RAM size in MiB
    pub fn flavor_memory(&self, object: ObjectId, index: Option<&ComponentIndex>) -> Option<u64> {
        self.component_field(object, ComponentType::Memory, index, |m| m.size_mib)
    }

    /// Disk size in MiB
    pub fn flavor_disk(&self, object: ObjectId, index: Option<&ComponentIndex>) -> Option<u64> {
        self.component_field(object, ComponentType::Disk, index, |m| m.size_mib)
    }

    fn component_field<T>(
        &self,
        object: ObjectId,
        component_type: ComponentType,
        index: Option<&ComponentIndex>,
        field: impl Fn(&rackbase_core::ComponentModel) -> Option<T>,
    ) -> Option<T> {
        match index {
            Some(index) => index.get(component_type).and_then(field),
            None => self.store.component_model(object, component_type).and_then(field),
        }
    }

    pub fn set_flavor_cores(&mut self, object: ObjectId, cores: u32) -> Result<()> {
        if self.flavor_cores(object, None) == Some(cores) {
            return Ok(());
        }
        let spec = ComponentModelSpec::new(
            format!("{} cores vCPU", cores),
            ComponentType::Processor,
        )
        .with_cores(cores)
        .with_family("vcpu");
        self.replace_flavor_component(object, spec)
    }

    pub fn set_flavor_memory(&mut self, object: ObjectId, size_mib: u64) -> Result<()> {
        if self.flavor_memory(object, None) == Some(size_mib) {
            return Ok(());
        }
        let spec = ComponentModelSpec::new(
            format!("{} MiB vMEM", size_mib),
            ComponentType::Memory,
        )
        .with_size_mib(size_mib);
        self.replace_flavor_component(object, spec)
    }

    /// Set disk size in MiB; the model name is expressed in whole GiB
    pub fn set_flavor_disk(&mut self, object: ObjectId, size_mib: u64) -> Result<()> {
        if self.flavor_disk(object, None) == Some(size_mib) {
            return Ok(());
        }
        let spec = ComponentModelSpec::new(
            format!("{} GiB vHDD", size_mib / 1024),
            ComponentType::Disk,
        )
        .with_size_mib(size_mib);
        self.replace_flavor_component(object, spec)
    }

    fn replace_flavor_component(&mut self, object: ObjectId, spec: ComponentModelSpec) -> Result<()> {
        if !self.flavors.contains_key(&object) {
            return Err(CloudError::FlavorNotFound(object));
        }
        let component_type = spec.component_type;
        let model = self.store.ensure_model(spec);
        let retired = self.store.detach_components(object, component_type);
        if retired > 0 {
            tracing::debug!("Retired {retired} {component_type} component(s) on flavor {object}");
        }
        self.store.attach_component(object, model)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory_with_flavor() -> (CloudInventory, ObjectId) {
        let mut inventory = CloudInventory::new();
        let provider = inventory.add_provider("openstack").unwrap();
        let flavor = inventory
            .add_flavor("m1.medium", provider, "flv-200")
            .unwrap();
        (inventory, flavor)
    }

    #[test]
    fn test_flavor_id_unique() {
        let (mut inventory, _) = inventory_with_flavor();
        let provider = inventory.provider_by_name("openstack").unwrap().id;
        assert!(matches!(
            inventory.add_flavor("m1.other", provider, "flv-200"),
            Err(CloudError::DuplicateFlavorId(_))
        ));
    }

    #[test]
    fn test_flavor_requires_known_provider() {
        let mut inventory = CloudInventory::new();
        assert!(matches!(
            inventory.add_flavor("m1.small", ProviderId(99), "flv-1"),
            Err(CloudError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn test_cores_absent_until_set() {
        let (inventory, flavor) = inventory_with_flavor();
        assert_eq!(inventory.flavor_cores(flavor, None), None);
    }

    #[test]
    fn test_set_cores_twice_keeps_one_component() {
        let (mut inventory, flavor) = inventory_with_flavor();
        inventory.set_flavor_cores(flavor, 4).unwrap();
        inventory.set_flavor_cores(flavor, 4).unwrap();

        let processors: Vec<_> = inventory
            .store()
            .components_of(flavor)
            .filter_map(|c| inventory.store().model(c.model))
            .filter(|m| m.component_type == ComponentType::Processor)
            .collect();
        assert_eq!(processors.len(), 1);
        assert_eq!(inventory.flavor_cores(flavor, None), Some(4));
    }

    #[test]
    fn test_changing_cores_replaces_component() {
        let (mut inventory, flavor) = inventory_with_flavor();
        inventory.set_flavor_cores(flavor, 2).unwrap();
        inventory.set_flavor_cores(flavor, 8).unwrap();

        let processors: Vec<_> = inventory
            .store()
            .components_of(flavor)
            .filter_map(|c| inventory.store().model(c.model))
            .filter(|m| m.component_type == ComponentType::Processor)
            .collect();
        assert_eq!(processors.len(), 1);
        assert_eq!(processors[0].name, "8 cores vCPU");
        assert_eq!(inventory.flavor_cores(flavor, None), Some(8));
    }

    #[test]
    fn test_memory_round_trip_in_mib() {
        let (mut inventory, flavor) = inventory_with_flavor();
        inventory.set_flavor_memory(flavor, 2048).unwrap();
        assert_eq!(inventory.flavor_memory(flavor, None), Some(2048));

        let model = inventory
            .store()
            .component_model(flavor, ComponentType::Memory)
            .unwrap();
        assert_eq!(model.name, "2048 MiB vMEM");
    }

    #[test]
    fn test_disk_name_truncates_to_gib() {
        let (mut inventory, flavor) = inventory_with_flavor();
        inventory.set_flavor_disk(flavor, 10_700).unwrap();

        let model = inventory
            .store()
            .component_model(flavor, ComponentType::Disk)
            .unwrap();
        assert_eq!(model.name, "10 GiB vHDD");
        // Stored size stays in MiB
        assert_eq!(inventory.flavor_disk(flavor, None), Some(10_700));
    }

    #[test]
    fn test_prefetched_index_answers_without_query() {
        let (mut inventory, flavor) = inventory_with_flavor();
        inventory.set_flavor_cores(flavor, 4).unwrap();
        inventory.set_flavor_memory(flavor, 4096).unwrap();

        let index = inventory.store().component_index(flavor);
        assert_eq!(inventory.flavor_cores(flavor, Some(&index)), Some(4));
        assert_eq!(inventory.flavor_memory(flavor, Some(&index)), Some(4096));
        // Index was built before any disk component existed
        inventory.set_flavor_disk(flavor, 1024).unwrap();
        assert_eq!(inventory.flavor_disk(flavor, Some(&index)), None);
        assert_eq!(inventory.flavor_disk(flavor, None), Some(1024));
    }

    #[test]
    fn test_two_flavors_share_catalog_model() {
        let (mut inventory, first) = inventory_with_flavor();
        let provider = inventory.provider_by_name("openstack").unwrap().id;
        let second = inventory
            .add_flavor("m1.clone", provider, "flv-201")
            .unwrap();

        inventory.set_flavor_cores(first, 4).unwrap();
        inventory.set_flavor_cores(second, 4).unwrap();

        let model = inventory.store().model_by_name("4 cores vCPU").unwrap();
        assert_eq!(model.cores, Some(4));
        assert_eq!(inventory.flavor_cores(second, None), Some(4));
    }

    #[test]
    fn test_remove_flavor_refused_while_hosts_reference_it() {
        let (mut inventory, flavor) = inventory_with_flavor();
        let provider = inventory.provider_by_name("openstack").unwrap().id;
        inventory
            .add_host(crate::host::NewCloudHost::new("host-1", "web-01", flavor, provider))
            .unwrap();

        assert!(matches!(
            inventory.remove_flavor(flavor),
            Err(CloudError::FlavorInUse(_))
        ));
    }
}
