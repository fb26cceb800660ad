//! Type catalog and schema metadata.
//!
//! The catalog maps short external type names to registered entity schemas
//! and repository factories. It is populated once at process start by an
//! explicit registration step and is read-only afterwards.

#[allow(clippy::module_inception)]
mod catalog;
mod field;
mod schema;

pub use catalog::{ChildEntry, MenuEntry, Registration, TypeCatalog, TypeCatalogBuilder};
pub use field::{FieldDef, FieldKind};
pub use schema::{ChildLink, Classification, EntitySchema};
