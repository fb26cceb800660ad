//! Parent/child relationship management.
//!
//! Children are owned rows in their own schema's tree; the parent references
//! one through the key field of a declared child link. Attach and detach
//! perform multiple sequential store writes with no surrounding transaction;
//! concurrent edits on the same parent are last-write-wins (see DESIGN.md).

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{ChildLink, TypeCatalog};
use crate::error::Error;
use crate::repository::DynRepository;
use crate::store::Store;

/// Manages child rows referenced through a parent's declared child links.
pub struct RelationshipManager<'a> {
    catalog: &'a TypeCatalog,
    store: &'a Store,
}

impl<'a> RelationshipManager<'a> {
    /// Create a manager over the given catalog and store.
    pub fn new(catalog: &'a TypeCatalog, store: &'a Store) -> Self {
        Self { catalog, store }
    }

    fn repository(&self, type_name: &str) -> Result<Box<dyn DynRepository>, Error> {
        let registration = self
            .catalog
            .resolve(type_name)
            .ok_or_else(|| Error::UnknownType(type_name.to_string()))?;
        registration.repository(self.store)
    }

    fn resolve_link(
        repo: &dyn DynRepository,
        navigation: &str,
    ) -> Result<ChildLink, Error> {
        repo.schema()
            .child_link(navigation)
            .cloned()
            .ok_or_else(|| Error::InvalidField(navigation.to_string()))
    }

    /// Create a new default child under the named navigation and attach it
    /// to the parent. Returns the updated parent with the child hydrated.
    pub fn add_child(
        &self,
        parent_type: &str,
        parent_id: Uuid,
        navigation: &str,
    ) -> Result<Value, Error> {
        let repo = self.repository(parent_type)?;
        let mut parent = repo
            .find_for_relationship(parent_id)?
            .ok_or(Error::NotFound)?;
        let link = Self::resolve_link(repo.as_ref(), navigation)?;

        let child_repo = self.repository(&link.target)?;
        let child = child_repo.add(child_repo.new_instance()?)?;
        let child_id = child.get("id").cloned().unwrap_or(Value::Null);

        set_field(&mut parent, &link.key_field, child_id);
        set_field(&mut parent, &link.navigation, Value::Null);
        repo.update(parent)?;

        debug!(parent_type, %parent_id, navigation, "attached new child");
        repo.find_for_relationship(parent_id)?.ok_or(Error::NotFound)
    }

    /// Detach the child referenced by the named navigation and delete its
    /// row. Returns the updated parent.
    pub fn remove_child(
        &self,
        parent_type: &str,
        parent_id: Uuid,
        navigation: &str,
        child_id: Uuid,
    ) -> Result<Value, Error> {
        let repo = self.repository(parent_type)?;
        let mut parent = repo
            .find_for_relationship(parent_id)?
            .ok_or(Error::NotFound)?;
        let link = Self::resolve_link(repo.as_ref(), navigation)?;
        let child_repo = self.repository(&link.target)?;

        set_field(&mut parent, &link.key_field, Value::Null);
        set_field(&mut parent, &link.navigation, Value::Null);
        repo.update(parent)?;
        child_repo.remove(child_id)?;

        debug!(parent_type, %parent_id, navigation, %child_id, "detached child");
        repo.find_for_relationship(parent_id)?.ok_or(Error::NotFound)
    }
}

fn set_field(row: &mut Value, field: &str, value: Value) {
    if let Some(map) = row.as_object_mut() {
        map.insert(field.to_string(), value);
    }
}
