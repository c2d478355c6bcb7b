//! In-memory base-object record store
//!
//! [`InventoryStore`] holds every generic record table: base objects,
//! the component catalog, component attachments and IP address records.
//! Identifiers are allocated from monotonic counters so the whole store
//! can be snapshotted and reloaded without renumbering.
//!
//! Lookups that miss return `None` rather than an error; uniqueness
//! violations and dangling references are the only failure modes.

use crate::error::{CoreError, Result};
use crate::model::{
    BaseObject, ComponentId, ComponentIndex, ComponentModel, ComponentModelSpec, ComponentType,
    IpRecord, ModelId, ObjectId, ServiceEnvironment, VirtualComponent,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::net::IpAddr;

/// Keyed record tables plus id counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryStore {
    objects: HashMap<ObjectId, BaseObject>,
    models: HashMap<ModelId, ComponentModel>,
    components: HashMap<ComponentId, VirtualComponent>,
    ips: HashMap<IpAddr, IpRecord>,

    next_object: u64,
    next_model: u64,
    next_component: u64,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- base objects ----

    /// Insert a new base object and return its id
    pub fn create_object(
        &mut self,
        parent: Option<ObjectId>,
        service_env: Option<ServiceEnvironment>,
    ) -> ObjectId {
        self.next_object += 1;
        let id = ObjectId(self.next_object);
        self.objects.insert(id, BaseObject::new(id, parent, service_env));
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&BaseObject> {
        self.objects.get(&id)
    }

    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Delete an object, its component attachments and its IP claims
    pub fn remove_object(&mut self, id: ObjectId) -> Result<BaseObject> {
        let object = self
            .objects
            .remove(&id)
            .ok_or(CoreError::ObjectNotFound(id))?;

        self.components.retain(|_, c| c.base_object != id);
        for record in self.ips.values_mut() {
            if record.base_object == Some(id) {
                record.base_object = None;
            }
        }

        tracing::debug!("Removed object {id} with its components and IP claims");
        Ok(object)
    }

    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(CoreError::ObjectNotFound(id))?;
        object.parent = parent;
        object.touch();
        Ok(())
    }

    pub fn set_service_env(
        &mut self,
        id: ObjectId,
        service_env: Option<ServiceEnvironment>,
    ) -> Result<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(CoreError::ObjectNotFound(id))?;
        object.service_env = service_env;
        object.touch();
        Ok(())
    }

    /// Ids of every object whose parent edge points at `id`
    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|o| o.parent == Some(id))
            .map(|o| o.id)
            .collect();
        ids.sort();
        ids
    }

    /// Copy the parent's service/environment onto `id`
    ///
    /// Silently does nothing when the object has no parent or the parent
    /// row is gone; a missing tag on the parent still overwrites.
    pub fn inherit_service_env(&mut self, id: ObjectId) -> Result<()> {
        let Some(object) = self.objects.get(&id) else {
            return Err(CoreError::ObjectNotFound(id));
        };
        let Some(parent_env) = object
            .parent
            .and_then(|p| self.objects.get(&p))
            .map(|p| p.service_env.clone())
        else {
            return Ok(());
        };
        self.set_service_env(id, parent_env)
    }

    /// Copy the object's service/environment onto every current child
    ///
    /// Returns the number of children updated. This is the bulk fix-up
    /// run after an owner record changes; it is not transactional with
    /// the triggering update.
    pub fn propagate_service_env(&mut self, id: ObjectId) -> Result<usize> {
        let env = self
            .objects
            .get(&id)
            .ok_or(CoreError::ObjectNotFound(id))?
            .service_env
            .clone();

        let children = self.children(id);
        for child in &children {
            self.set_service_env(*child, env.clone())?;
        }
        Ok(children.len())
    }

    // ---- component catalog ----

    pub fn model(&self, id: ModelId) -> Option<&ComponentModel> {
        self.models.get(&id)
    }

    /// Exact-name catalog lookup
    pub fn model_by_name(&self, name: &str) -> Option<&ComponentModel> {
        self.models.values().find(|m| m.name == name)
    }

    /// Resolve a catalog model by exact name, creating it on miss
    pub fn ensure_model(&mut self, spec: ComponentModelSpec) -> ModelId {
        if let Some(existing) = self.model_by_name(&spec.name) {
            return existing.id;
        }
        self.next_model += 1;
        let id = ModelId(self.next_model);
        self.models.insert(
            id,
            ComponentModel {
                id,
                name: spec.name,
                component_type: spec.component_type,
                cores: spec.cores,
                size_mib: spec.size_mib,
                family: spec.family,
            },
        );
        id
    }

    // ---- component attachments ----

    /// Attach a catalog model to a base object
    pub fn attach_component(&mut self, base_object: ObjectId, model: ModelId) -> Result<ComponentId> {
        if !self.objects.contains_key(&base_object) {
            return Err(CoreError::ObjectNotFound(base_object));
        }
        self.next_component += 1;
        let id = ComponentId(self.next_component);
        self.components.insert(
            id,
            VirtualComponent {
                id,
                base_object,
                model,
            },
        );
        Ok(id)
    }

    /// Remove every attached component of the given type
    ///
    /// Removes siblings too, so the one-active-component-per-type
    /// invariant holds even if earlier writes left duplicates behind.
    /// Returns the number of components removed.
    pub fn detach_components(&mut self, base_object: ObjectId, component_type: ComponentType) -> usize {
        let doomed: Vec<ComponentId> = self
            .components
            .values()
            .filter(|c| {
                c.base_object == base_object
                    && self
                        .models
                        .get(&c.model)
                        .is_some_and(|m| m.component_type == component_type)
            })
            .map(|c| c.id)
            .collect();
        for id in &doomed {
            self.components.remove(id);
        }
        doomed.len()
    }

    pub fn components_of(&self, base_object: ObjectId) -> impl Iterator<Item = &VirtualComponent> {
        self.components
            .values()
            .filter(move |c| c.base_object == base_object)
    }

    /// Catalog model behind the object's component of the given type
    ///
    /// `None` when no component of that type is attached; this is the
    /// direct-query path behind the derived resource accessors.
    pub fn component_model(
        &self,
        base_object: ObjectId,
        component_type: ComponentType,
    ) -> Option<&ComponentModel> {
        self.components_of(base_object)
            .filter_map(|c| self.models.get(&c.model))
            .find(|m| m.component_type == component_type)
    }

    /// Build the pre-loaded component view for one object
    pub fn component_index(&self, base_object: ObjectId) -> ComponentIndex {
        let mut index = ComponentIndex::new();
        for component in self.components_of(base_object) {
            if let Some(model) = self.models.get(&component.model) {
                index.insert(model.clone());
            }
        }
        index
    }

    // ---- IP address records ----

    pub fn ip(&self, address: IpAddr) -> Option<&IpRecord> {
        self.ips.get(&address)
    }

    /// Addresses currently owned by the object
    pub fn ips_owned_by(&self, base_object: ObjectId) -> BTreeSet<IpAddr> {
        self.ips
            .values()
            .filter(|r| r.base_object == Some(base_object))
            .map(|r| r.address)
            .collect()
    }

    /// Insert a brand-new IP record
    pub fn create_ip(&mut self, address: IpAddr, base_object: Option<ObjectId>) -> Result<()> {
        if self.ips.contains_key(&address) {
            return Err(CoreError::DuplicateIpAddress(address));
        }
        self.ips.insert(address, IpRecord::new(address, base_object));
        Ok(())
    }

    /// Point an existing record's ownership at `base_object`
    pub fn claim_ip(&mut self, address: IpAddr, base_object: ObjectId) -> Result<()> {
        if !self.objects.contains_key(&base_object) {
            return Err(CoreError::ObjectNotFound(base_object));
        }
        match self.ips.get_mut(&address) {
            Some(record) => {
                record.base_object = Some(base_object);
                Ok(())
            }
            None => self.create_ip(address, Some(base_object)),
        }
    }

    /// Clear ownership of an address; no-op when the record is missing
    pub fn release_ip(&mut self, address: IpAddr) {
        if let Some(record) = self.ips.get_mut(&address) {
            record.base_object = None;
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn ip_count(&self) -> usize {
        self.ips.len()
    }
}
