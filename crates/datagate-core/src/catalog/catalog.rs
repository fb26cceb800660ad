//! The type catalog: external name to schema and repository factory.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::schema::{Classification, EntitySchema};
use crate::entity::{short_type_name, Entity};
use crate::error::Error;
use crate::repository::{DynRepository, Repository};
use crate::store::Store;

type RepositoryFactory =
    Box<dyn Fn(&Store, Arc<EntitySchema>) -> Result<Box<dyn DynRepository>, Error> + Send + Sync>;

/// One registered entity type: its schema plus a factory producing
/// request-scoped repositories already bound to the concrete type.
pub struct Registration {
    schema: Arc<EntitySchema>,
    factory: RepositoryFactory,
}

impl Registration {
    /// The registered schema.
    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    /// Build a fresh repository binding for one request.
    pub fn repository(&self, store: &Store) -> Result<Box<dyn DynRepository>, Error> {
        (self.factory)(store, Arc::clone(&self.schema))
    }
}

/// Menu listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    /// Menu path in "supertype/type/subtype" form.
    pub category: String,
    /// Icon name for the menu entry.
    #[serde(rename = "iconClass")]
    pub icon_class: String,
}

/// Child-type listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildEntry {
    /// Grouping category.
    pub category: String,
}

/// Read-only catalog mapping external type names to registrations.
///
/// Populated once at process start through [`TypeCatalogBuilder`] and never
/// mutated thereafter.
pub struct TypeCatalog {
    entries: HashMap<String, Registration>,
}

impl TypeCatalog {
    /// Start building a catalog.
    pub fn builder() -> TypeCatalogBuilder {
        TypeCatalogBuilder {
            entries: HashMap::new(),
        }
    }

    /// Resolve an external type name.
    ///
    /// Case-sensitive exact match; empty and unknown names fail closed with
    /// `None`.
    pub fn resolve(&self, name: &str) -> Option<&Registration> {
        if name.is_empty() {
            return None;
        }
        self.entries.get(name)
    }

    /// Menu-visible schemas with their category and icon.
    pub fn menu_types(&self) -> BTreeMap<String, MenuEntry> {
        self.entries
            .values()
            .filter_map(|reg| match &reg.schema.classification {
                Classification::Menu { category, icon } => Some((
                    reg.schema.name().to_string(),
                    MenuEntry {
                        category: or_root(category),
                        icon_class: icon.clone(),
                    },
                )),
                _ => None,
            })
            .collect()
    }

    /// Child-only schemas with their category.
    pub fn child_types(&self) -> BTreeMap<String, ChildEntry> {
        self.entries
            .values()
            .filter_map(|reg| match &reg.schema.classification {
                Classification::Child { category } => Some((
                    reg.schema.name().to_string(),
                    ChildEntry {
                        category: or_root(category),
                    },
                )),
                _ => None,
            })
            .collect()
    }

    /// All registered schemas.
    pub fn schemas(&self) -> impl Iterator<Item = &Arc<EntitySchema>> {
        self.entries.values().map(Registration::schema)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Empty categories list under the root menu path.
fn or_root(category: &str) -> String {
    if category.is_empty() {
        "/".to_string()
    } else {
        category.to_string()
    }
}

/// Builder populating a [`TypeCatalog`] through explicit registration.
pub struct TypeCatalogBuilder {
    entries: HashMap<String, Registration>,
}

impl TypeCatalogBuilder {
    /// Register `T` under its derived external name.
    ///
    /// The schema must have been created with [`EntitySchema::of`] for the
    /// same type; duplicate names are rejected.
    pub fn register<T: Entity>(mut self, schema: EntitySchema) -> Result<Self, Error> {
        let name = schema.name().to_string();
        if name != short_type_name::<T>() {
            return Err(Error::Registration(format!(
                "schema {:?} registered for mismatched type {:?}",
                name,
                short_type_name::<T>()
            )));
        }
        schema.validate()?;
        if self.entries.contains_key(&name) {
            return Err(Error::Registration(format!(
                "duplicate registration for {name:?}"
            )));
        }

        let schema = Arc::new(schema);
        let factory: RepositoryFactory = Box::new(|store, schema| {
            Ok(Box::new(Repository::<T>::new(store, schema)?) as Box<dyn DynRepository>)
        });
        debug!(name = %name, "registered entity type");
        self.entries.insert(name, Registration { schema, factory });
        Ok(self)
    }

    /// Validate cross-schema links and seal the catalog.
    pub fn build(self) -> Result<TypeCatalog, Error> {
        for reg in self.entries.values() {
            for link in &reg.schema.child_links {
                if !self.entries.contains_key(&link.target) {
                    return Err(Error::Registration(format!(
                        "{}: child link {:?} targets unregistered type {:?}",
                        reg.schema.name(),
                        link.navigation,
                        link.target
                    )));
                }
            }
        }
        debug!(types = self.entries.len(), "type catalog sealed");
        Ok(TypeCatalog {
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ChildLink, FieldDef};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Country {
        id: Uuid,
        name: String,
        leader_id: Option<Uuid>,
    }

    impl Entity for Country {
        fn id(&self) -> Uuid {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Leader {
        id: Uuid,
        name: String,
    }

    impl Entity for Leader {
        fn id(&self) -> Uuid {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct AuditEntry {
        id: Uuid,
        note: String,
    }

    impl Entity for AuditEntry {
        fn id(&self) -> Uuid {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    fn sample_catalog() -> TypeCatalog {
        TypeCatalog::builder()
            .register::<Country>(
                EntitySchema::of::<Country>()
                    .menu("Geography", "public")
                    .with_field(FieldDef::text("name").required())
                    .with_field(FieldDef::reference("leader", "Leader"))
                    .with_field(FieldDef::text("leaderId").hidden())
                    .with_child_link(ChildLink::new("leader", "leaderId", "Leader")),
            )
            .unwrap()
            .register::<Leader>(
                EntitySchema::of::<Leader>()
                    .child("Geography")
                    .with_field(FieldDef::text("name").required()),
            )
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_round_trips_registered_names() {
        let catalog = sample_catalog();
        for schema in catalog.schemas() {
            let resolved = catalog.resolve(schema.name()).unwrap();
            assert_eq!(resolved.schema().name(), schema.name());
        }
    }

    #[test]
    fn test_resolve_is_case_sensitive_and_fails_closed() {
        let catalog = sample_catalog();
        assert!(catalog.resolve("Country").is_some());
        assert!(catalog.resolve("country").is_none());
        assert!(catalog.resolve("").is_none());
        assert!(catalog.resolve("Unknown").is_none());
    }

    #[test]
    fn test_menu_and_child_listings() {
        let catalog = sample_catalog();

        let menu = catalog.menu_types();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu["Country"].category, "Geography");
        assert_eq!(menu["Country"].icon_class, "public");

        let children = catalog.child_types();
        assert_eq!(children.len(), 1);
        assert_eq!(children["Leader"].category, "Geography");
    }

    #[test]
    fn test_empty_category_lists_as_root() {
        let catalog = TypeCatalog::builder()
            .register::<Leader>(
                EntitySchema::of::<Leader>()
                    .child("")
                    .with_field(FieldDef::text("name")),
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(catalog.child_types()["Leader"].category, "/");
    }

    #[test]
    fn test_hidden_types_are_unlisted_but_operable() {
        let catalog = TypeCatalog::builder()
            .register::<Country>(
                EntitySchema::of::<Country>()
                    .menu("Geography", "public")
                    .with_field(FieldDef::text("name").required()),
            )
            .unwrap()
            .register::<AuditEntry>(
                EntitySchema::of::<AuditEntry>().with_field(FieldDef::text("note")),
            )
            .unwrap()
            .build()
            .unwrap();

        // Absent from both listings.
        assert!(!catalog.menu_types().contains_key("AuditEntry"));
        assert!(!catalog.child_types().contains_key("AuditEntry"));

        // Still resolvable and fully operable by name.
        let store = Store::open(crate::store::StoreConfig::temporary()).unwrap();
        let repo = catalog
            .resolve("AuditEntry")
            .unwrap()
            .repository(&store)
            .unwrap();
        let row = repo.add(serde_json::json!({ "note": "created" })).unwrap();
        let id = Uuid::parse_str(row["id"].as_str().unwrap()).unwrap();
        assert_eq!(repo.find(id).unwrap().unwrap()["note"], "created");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let result = TypeCatalog::builder()
            .register::<Leader>(EntitySchema::of::<Leader>().with_field(FieldDef::text("name")))
            .unwrap()
            .register::<Leader>(EntitySchema::of::<Leader>().with_field(FieldDef::text("name")));
        assert!(matches!(result, Err(Error::Registration(_))));
    }

    #[test]
    fn test_mismatched_type_rejected() {
        let result =
            TypeCatalog::builder().register::<Country>(EntitySchema::of::<Leader>());
        assert!(matches!(result, Err(Error::Registration(_))));
    }

    #[test]
    fn test_dangling_child_link_rejected_at_build() {
        let result = TypeCatalog::builder()
            .register::<Country>(
                EntitySchema::of::<Country>()
                    .with_field(FieldDef::reference("leader", "Leader"))
                    .with_field(FieldDef::text("leaderId").hidden())
                    .with_child_link(ChildLink::new("leader", "leaderId", "Leader")),
            )
            .unwrap()
            .build();
        assert!(matches!(result, Err(Error::Registration(_))));
    }

    #[test]
    fn test_repository_binding_is_fresh_per_call() {
        let catalog = sample_catalog();
        let store = Store::open(crate::store::StoreConfig::temporary()).unwrap();
        let reg = catalog.resolve("Country").unwrap();

        let a = reg.repository(&store).unwrap();
        let b = reg.repository(&store).unwrap();
        assert_eq!(a.schema().name(), b.schema().name());
    }
}
