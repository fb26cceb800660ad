//! DataGate core — type catalog, generic repository, and relationship engine.
//!
//! This crate is the dispatch-and-repository layer that sits above an
//! already-mapped entity model: a runtime-supplied type name resolves to a
//! registered schema, the schema's registration produces a request-scoped
//! repository bound to the concrete entity type, and all CRUD, paging, and
//! parent/child operations flow through that binding.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod introspect;
pub mod relation;
pub mod repository;
pub mod store;

pub use catalog::{
    ChildEntry, ChildLink, Classification, EntitySchema, FieldDef, FieldKind, MenuEntry,
    Registration, TypeCatalog, TypeCatalogBuilder,
};
pub use entity::Entity;
pub use error::Error;
pub use introspect::{describe_fields, FieldDescriptor, FieldIntrospector};
pub use relation::RelationshipManager;
pub use repository::{DynRepository, PageQuery, PageResult, Repository};
pub use store::{Store, StoreConfig};
