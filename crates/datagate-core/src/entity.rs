//! The trait persisted entity types implement.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// A persistable entity type.
///
/// Serialized rows must expose the identifier under the `"id"` key. The
/// identifier is assigned once when the entity is first persisted and never
/// changes. `Default` supplies the transient instance used when a new child
/// is created before the caller has provided field values.
pub trait Entity: Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The entity's identifier.
    fn id(&self) -> Uuid;

    /// Assign the entity's identifier.
    fn set_id(&mut self, id: Uuid);
}

/// Short type name of `T`, without the module path.
pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
