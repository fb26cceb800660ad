//! Entity schema descriptions.

use super::field::{FieldDef, FieldKind};
use crate::entity::{short_type_name, Entity};
use crate::error::Error;

/// Where a schema surfaces in type listings.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Listed in the site menu with a category and icon.
    Menu {
        /// Menu path in "supertype/type/subtype" form.
        category: String,
        /// Icon name shown next to the menu entry.
        icon: String,
    },
    /// Reachable only as nested data under other types.
    Child {
        /// Grouping category for child-type listings.
        category: String,
    },
    /// Resolvable by name but never listed.
    Hidden,
}

/// An explicit parent/child link declared on a schema.
///
/// The navigation field holds the child reference; the key field holds the
/// child's raw identifier. Declaring the pair here replaces re-deriving the
/// key field from the navigation name at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildLink {
    /// Field holding the child reference.
    pub navigation: String,
    /// Field holding the child's raw identifier.
    pub key_field: String,
    /// Registered external name of the child schema.
    pub target: String,
}

impl ChildLink {
    /// Declare a link from a navigation field and its key field to a target
    /// schema.
    pub fn new(
        navigation: impl Into<String>,
        key_field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            navigation: navigation.into(),
            key_field: key_field.into(),
            target: target.into(),
        }
    }
}

/// The registered description of one entity type.
///
/// Built once at registration and never mutated afterwards. The external
/// name is derived from the underlying Rust type and is what clients use in
/// request paths.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    name: String,
    /// Listing classification.
    pub classification: Classification,
    /// Ordered field declarations.
    pub fields: Vec<FieldDef>,
    /// Field searched by paged queries; all text fields when unset.
    pub default_search_field: Option<String>,
    /// Sort field used when a query names none or an unknown one.
    pub default_sort_field: Option<String>,
    /// Declared parent/child links.
    pub child_links: Vec<ChildLink>,
}

impl EntitySchema {
    /// Start a schema for `T`. The external name is `T`'s short type name.
    pub fn of<T: Entity>() -> Self {
        Self {
            name: short_type_name::<T>().to_string(),
            classification: Classification::Hidden,
            fields: Vec::new(),
            default_search_field: None,
            default_sort_field: None,
            child_links: Vec::new(),
        }
    }

    /// The external type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classify as menu-visible.
    pub fn menu(mut self, category: impl Into<String>, icon: impl Into<String>) -> Self {
        self.classification = Classification::Menu {
            category: category.into(),
            icon: icon.into(),
        };
        self
    }

    /// Classify as child-only.
    pub fn child(mut self, category: impl Into<String>) -> Self {
        self.classification = Classification::Child {
            category: category.into(),
        };
        self
    }

    /// Add a field declaration.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple field declarations.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Declare a parent/child link.
    pub fn with_child_link(mut self, link: ChildLink) -> Self {
        self.child_links.push(link);
        self
    }

    /// Set the default searchable field.
    pub fn searchable_by(mut self, field: impl Into<String>) -> Self {
        self.default_search_field = Some(field.into());
        self
    }

    /// Set the default sort field.
    pub fn sorted_by(mut self, field: impl Into<String>) -> Self {
        self.default_sort_field = Some(field.into());
        self
    }

    /// Look up a field declaration by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a child link by its navigation field name.
    pub fn child_link(&self, navigation: &str) -> Option<&ChildLink> {
        self.child_links.iter().find(|l| l.navigation == navigation)
    }

    /// Whether the schema is menu-visible.
    pub fn is_menu(&self) -> bool {
        matches!(self.classification, Classification::Menu { .. })
    }

    /// Fields that hold related entities rather than row data. These are
    /// stripped from stored rows; only key fields persist references.
    pub fn navigation_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.kind.is_navigation())
            .map(|f| f.name.as_str())
            .collect();
        for link in &self.child_links {
            if !names.contains(&link.navigation.as_str()) {
                names.push(link.navigation.as_str());
            }
        }
        names
    }

    /// Fields a paged query's search term is matched against.
    pub fn search_fields(&self) -> Vec<&str> {
        match &self.default_search_field {
            Some(field) => vec![field.as_str()],
            None => self
                .fields
                .iter()
                .filter(|f| f.kind == FieldKind::Text && !f.hidden)
                .map(|f| f.name.as_str())
                .collect(),
        }
    }

    /// The sort field used when a query names none or an unknown one.
    pub fn fallback_sort_field(&self) -> &str {
        if let Some(field) = &self.default_sort_field {
            return field;
        }
        self.fields
            .iter()
            .find(|f| f.kind == FieldKind::Text && !f.hidden)
            .map(|f| f.name.as_str())
            .unwrap_or("id")
    }

    /// Check internal consistency. Link and default fields must be declared.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for link in &self.child_links {
            if self.get_field(&link.navigation).is_none() {
                return Err(Error::Registration(format!(
                    "{}: child link navigation field {:?} is not declared",
                    self.name, link.navigation
                )));
            }
            if self.get_field(&link.key_field).is_none() {
                return Err(Error::Registration(format!(
                    "{}: child link key field {:?} is not declared",
                    self.name, link.key_field
                )));
            }
        }
        for field in [&self.default_search_field, &self.default_sort_field]
            .into_iter()
            .flatten()
        {
            if self.get_field(field).is_none() {
                return Err(Error::Registration(format!(
                    "{}: default field {:?} is not declared",
                    self.name, field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Country {
        id: Uuid,
    }

    impl Entity for Country {
        fn id(&self) -> Uuid {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    fn country_schema() -> EntitySchema {
        EntitySchema::of::<Country>()
            .menu("Geography", "public")
            .with_field(FieldDef::text("name").required())
            .with_field(FieldDef::number("epiIndex"))
            .with_field(FieldDef::reference("leader", "Leader"))
            .with_field(FieldDef::text("leaderId").hidden())
            .with_child_link(ChildLink::new("leader", "leaderId", "Leader"))
    }

    #[test]
    fn test_name_derived_from_type() {
        assert_eq!(country_schema().name(), "Country");
    }

    #[test]
    fn test_child_link_lookup() {
        let schema = country_schema();
        let link = schema.child_link("leader").unwrap();
        assert_eq!(link.key_field, "leaderId");
        assert_eq!(link.target, "Leader");
        assert!(schema.child_link("owner").is_none());
    }

    #[test]
    fn test_navigation_fields() {
        let schema = country_schema();
        assert_eq!(schema.navigation_fields(), vec!["leader"]);
    }

    #[test]
    fn test_search_fields_default_to_text() {
        let schema = country_schema();
        assert_eq!(schema.search_fields(), vec!["name"]);

        let scoped = country_schema().searchable_by("name");
        assert_eq!(scoped.search_fields(), vec!["name"]);
    }

    #[test]
    fn test_fallback_sort_field() {
        assert_eq!(country_schema().fallback_sort_field(), "name");
        assert_eq!(
            EntitySchema::of::<Country>().fallback_sort_field(),
            "id",
        );
    }

    #[test]
    fn test_validate_rejects_undeclared_link_fields() {
        let schema = EntitySchema::of::<Country>()
            .with_field(FieldDef::reference("leader", "Leader"))
            .with_child_link(ChildLink::new("leader", "leaderId", "Leader"));
        assert!(schema.validate().is_err());
    }
}
