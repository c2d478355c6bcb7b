//! Cloud project records
//!
//! A project is the logical owner of cloud hosts. Updating a project's
//! service/environment reconciles the tag onto every current child
//! object; creating a project does not, since a brand-new record has no
//! children to fix up. The reconciliation runs after the project row is
//! written and is not transactional with it.

use crate::error::{CloudError, Result};
use crate::inventory::CloudInventory;
use crate::provider::ProviderId;
use rackbase_core::{ObjectId, ServiceEnvironment};
use serde::{Deserialize, Serialize};

/// Logical grouping of cloud hosts at one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProject {
    /// Backing base object
    pub object: ObjectId,

    pub provider: ProviderId,

    /// Provider-side project identifier, unique across the inventory
    pub project_id: String,

    pub name: String,
}

impl CloudInventory {
    /// Register a project under a unique provider-side `project_id`
    pub fn add_project(
        &mut self,
        project_id: impl Into<String>,
        name: impl Into<String>,
        provider: ProviderId,
        service_env: Option<ServiceEnvironment>,
    ) -> Result<ObjectId> {
        let project_id = project_id.into();
        if self.provider(provider).is_none() {
            return Err(CloudError::ProviderNotFound(provider.to_string()));
        }
        if self.project_by_project_id(&project_id).is_some() {
            return Err(CloudError::DuplicateProjectId(project_id));
        }

        let object = self.store.create_object(None, service_env);
        self.projects.insert(
            object,
            CloudProject {
                object,
                provider,
                project_id,
                name: name.into(),
            },
        );
        Ok(object)
    }

    pub fn project(&self, object: ObjectId) -> Option<&CloudProject> {
        self.projects.get(&object)
    }

    pub fn project_by_project_id(&self, project_id: &str) -> Option<&CloudProject> {
        self.projects.values().find(|p| p.project_id == project_id)
    }

    /// Update an existing project and reconcile its children
    ///
    /// `name` is only written when given; `service_env` is the new tag
    /// value and `None` clears it. After the project row is written,
    /// bulk-copies the resulting service/environment onto every current
    /// child object so they stay equal to the parent's. Returns the
    /// number of children touched. The reconciliation is an
    /// eventual-consistency fix-up: a child added concurrently with the
    /// update may miss it until its next save.
    pub fn update_project(
        &mut self,
        object: ObjectId,
        name: Option<String>,
        service_env: Option<ServiceEnvironment>,
    ) -> Result<usize> {
        let project = self
            .projects
            .get_mut(&object)
            .ok_or(CloudError::ProjectNotFound(object))?;
        if let Some(name) = name {
            project.name = name;
        }
        self.store.set_service_env(object, service_env)?;

        let touched = self.store.propagate_service_env(object)?;
        if touched > 0 {
            tracing::debug!("Reconciled service/environment onto {touched} child(ren) of {object}");
        }
        Ok(touched)
    }

    /// Hosts whose parent edge points at the project
    pub fn project_hosts(&self, object: ObjectId) -> Vec<&crate::host::CloudHost> {
        self.store
            .children(object)
            .into_iter()
            .filter_map(|id| self.hosts.get(&id))
            .collect()
    }

    /// Delete a project; children survive with their parent edge cleared
    pub fn remove_project(&mut self, object: ObjectId) -> Result<CloudProject> {
        let project = self
            .projects
            .remove(&object)
            .ok_or(CloudError::ProjectNotFound(object))?;
        for child in self.store.children(object) {
            self.store.set_parent(child, None)?;
        }
        self.store.remove_object(object)?;
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NewCloudHost;

    fn env(service: &str, environment: &str) -> ServiceEnvironment {
        ServiceEnvironment::new(service, environment)
    }

    fn inventory_with_project() -> (CloudInventory, ObjectId) {
        let mut inventory = CloudInventory::new();
        let provider = inventory.add_provider("openstack").unwrap();
        let project = inventory
            .add_project("prj-1", "search", provider, Some(env("search", "prod")))
            .unwrap();
        (inventory, project)
    }

    fn add_child_host(inventory: &mut CloudInventory, project: ObjectId, host_id: &str) -> ObjectId {
        let provider = inventory.provider_by_name("openstack").unwrap().id;
        let flavor = match inventory.flavor_by_flavor_id("flv-1") {
            Some(f) => f.object,
            None => inventory.add_flavor("m1.small", provider, "flv-1").unwrap(),
        };
        inventory
            .add_host(
                NewCloudHost::new(host_id, format!("{host_id}.example"), flavor, provider)
                    .with_parent(project),
            )
            .unwrap()
    }

    #[test]
    fn test_project_id_unique() {
        let (mut inventory, _) = inventory_with_project();
        let provider = inventory.provider_by_name("openstack").unwrap().id;
        assert!(matches!(
            inventory.add_project("prj-1", "other", provider, None),
            Err(CloudError::DuplicateProjectId(_))
        ));
    }

    #[test]
    fn test_update_project_reconciles_children() {
        let (mut inventory, project) = inventory_with_project();
        let a = add_child_host(&mut inventory, project, "host-a");
        let b = add_child_host(&mut inventory, project, "host-b");

        let touched = inventory
            .update_project(project, None, Some(env("search", "staging")))
            .unwrap();
        assert_eq!(touched, 2);
        for host in [a, b] {
            assert_eq!(
                inventory.store().object(host).unwrap().service_env,
                Some(env("search", "staging"))
            );
        }
    }

    #[test]
    fn test_new_project_does_not_reconcile_anything() {
        let mut inventory = CloudInventory::new();
        let provider = inventory.add_provider("openstack").unwrap();

        // Creation takes no reconciliation path at all; a host attached
        // afterwards keeps deriving its tag from the parent on save.
        let project = inventory
            .add_project("prj-9", "mail", provider, Some(env("mail", "prod")))
            .unwrap();
        assert!(inventory.project_hosts(project).is_empty());
    }

    #[test]
    fn test_project_hosts_lists_children() {
        let (mut inventory, project) = inventory_with_project();
        add_child_host(&mut inventory, project, "host-a");
        add_child_host(&mut inventory, project, "host-b");

        let hosts = inventory.project_hosts(project);
        assert_eq!(hosts.len(), 2);
    }

    #[test]
    fn test_remove_project_clears_parent_edges() {
        let (mut inventory, project) = inventory_with_project();
        let host = add_child_host(&mut inventory, project, "host-a");

        inventory.remove_project(project).unwrap();
        assert!(inventory.project(project).is_none());
        assert!(inventory.store().object(host).unwrap().parent.is_none());
    }
}
