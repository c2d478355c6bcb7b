//! Cloud provider records

use crate::error::{CloudError, Result};
use crate::inventory::CloudInventory;
use serde::{Deserialize, Serialize};

/// Stable identifier of a cloud provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub u64);

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "provider-{}", self.0)
    }
}

/// External cloud vendor (e.g. "openstack", "sakura-cloud")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProvider {
    pub id: ProviderId,

    /// Vendor name, unique across the inventory
    pub name: String,
}

impl CloudInventory {
    /// Register a provider under a unique name
    pub fn add_provider(&mut self, name: impl Into<String>) -> Result<ProviderId> {
        let name = name.into();
        if self.provider_by_name(&name).is_some() {
            return Err(CloudError::DuplicateProvider(name));
        }
        self.next_provider += 1;
        let id = ProviderId(self.next_provider);
        self.providers.insert(id, CloudProvider { id, name });
        Ok(id)
    }

    pub fn provider(&self, id: ProviderId) -> Option<&CloudProvider> {
        self.providers.get(&id)
    }

    pub fn provider_by_name(&self, name: &str) -> Option<&CloudProvider> {
        self.providers.values().find(|p| p.name == name)
    }

    /// Delete a provider that no flavor, project or host references
    pub fn remove_provider(&mut self, id: ProviderId) -> Result<CloudProvider> {
        let name = match self.providers.get(&id) {
            Some(provider) => provider.name.clone(),
            None => return Err(CloudError::ProviderNotFound(id.to_string())),
        };
        let referenced = self.flavors.values().any(|f| f.provider == id)
            || self.projects.values().any(|p| p.provider == id)
            || self.hosts.values().any(|h| h.provider == id);
        if referenced {
            return Err(CloudError::ProviderInUse(name));
        }
        self.providers
            .remove(&id)
            .ok_or(CloudError::ProviderNotFound(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_unique() {
        let mut inventory = CloudInventory::new();
        inventory.add_provider("openstack").unwrap();
        assert!(matches!(
            inventory.add_provider("openstack"),
            Err(CloudError::DuplicateProvider(_))
        ));
    }

    #[test]
    fn test_remove_provider_refused_while_referenced() {
        let mut inventory = CloudInventory::new();
        let provider = inventory.add_provider("openstack").unwrap();
        inventory
            .add_flavor("m1.small", provider, "flv-1")
            .unwrap();

        assert!(matches!(
            inventory.remove_provider(provider),
            Err(CloudError::ProviderInUse(_))
        ));
    }

    #[test]
    fn test_remove_unreferenced_provider() {
        let mut inventory = CloudInventory::new();
        let provider = inventory.add_provider("sakura-cloud").unwrap();
        let removed = inventory.remove_provider(provider).unwrap();
        assert_eq!(removed.name, "sakura-cloud");
        assert!(inventory.provider(provider).is_none());
    }
}
