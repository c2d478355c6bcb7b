//! Thin existence records over base objects
//!
//! Databases and VIPs carry no fields of their own; the record's whole
//! job is to tag a base object as "is a database" / "is a VIP".
//! [`VirtualServer`] is a placeholder in the same shape.

use crate::error::{CloudError, Result};
use crate::inventory::CloudInventory;
use rackbase_core::{ObjectId, ServiceEnvironment};
use serde::{Deserialize, Serialize};

/// Marks a base object as a database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub object: ObjectId,
}

/// Marks a base object as a virtual IP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vip {
    pub object: ObjectId,
}

/// Virtual machine record
// TODO flesh out with hostname and hypervisor once VM sync needs them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualServer {
    pub object: ObjectId,
}

impl CloudInventory {
    pub fn add_database(&mut self, service_env: Option<ServiceEnvironment>) -> ObjectId {
        let object = self.store.create_object(None, service_env);
        self.databases.insert(object, Database { object });
        object
    }

    pub fn database(&self, object: ObjectId) -> Option<&Database> {
        self.databases.get(&object)
    }

    pub fn databases(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }

    pub fn remove_database(&mut self, object: ObjectId) -> Result<()> {
        self.databases
            .remove(&object)
            .ok_or(CloudError::RecordNotFound(object))?;
        self.store.remove_object(object)?;
        Ok(())
    }

    pub fn add_vip(&mut self, service_env: Option<ServiceEnvironment>) -> ObjectId {
        let object = self.store.create_object(None, service_env);
        self.vips.insert(object, Vip { object });
        object
    }

    pub fn vip(&self, object: ObjectId) -> Option<&Vip> {
        self.vips.get(&object)
    }

    pub fn vips(&self) -> impl Iterator<Item = &Vip> {
        self.vips.values()
    }

    pub fn remove_vip(&mut self, object: ObjectId) -> Result<()> {
        self.vips
            .remove(&object)
            .ok_or(CloudError::RecordNotFound(object))?;
        self.store.remove_object(object)?;
        Ok(())
    }

    pub fn add_virtual_server(&mut self, service_env: Option<ServiceEnvironment>) -> ObjectId {
        let object = self.store.create_object(None, service_env);
        self.virtual_servers.insert(object, VirtualServer { object });
        object
    }

    pub fn virtual_server(&self, object: ObjectId) -> Option<&VirtualServer> {
        self.virtual_servers.get(&object)
    }

    pub fn virtual_servers(&self) -> impl Iterator<Item = &VirtualServer> {
        self.virtual_servers.values()
    }

    pub fn remove_virtual_server(&mut self, object: ObjectId) -> Result<()> {
        self.virtual_servers
            .remove(&object)
            .ok_or(CloudError::RecordNotFound(object))?;
        self.store.remove_object(object)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_lifecycle() {
        let mut inventory = CloudInventory::new();
        let db = inventory.add_database(Some(ServiceEnvironment::new("billing", "prod")));

        assert!(inventory.database(db).is_some());
        assert_eq!(
            inventory.store().object(db).unwrap().service_env,
            Some(ServiceEnvironment::new("billing", "prod"))
        );

        inventory.remove_database(db).unwrap();
        assert!(inventory.database(db).is_none());
        assert!(inventory.store().object(db).is_none());
    }

    #[test]
    fn test_vip_and_virtual_server_are_distinct_tables() {
        let mut inventory = CloudInventory::new();
        let vip = inventory.add_vip(None);
        let vm = inventory.add_virtual_server(None);

        assert!(inventory.vip(vip).is_some());
        assert!(inventory.vip(vm).is_none());
        assert!(inventory.virtual_server(vm).is_some());
        assert_eq!(inventory.vips().count(), 1);
        assert_eq!(inventory.virtual_servers().count(), 1);
    }

    #[test]
    fn test_remove_missing_record_is_an_error() {
        let mut inventory = CloudInventory::new();
        assert!(matches!(
            inventory.remove_vip(ObjectId(404)),
            Err(CloudError::RecordNotFound(_))
        ));
    }
}
