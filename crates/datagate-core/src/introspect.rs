//! Field introspection: schema metadata to client-facing descriptors.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::catalog::EntitySchema;

/// Client-facing description of one visible field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name, matching the serialized JSON key.
    pub name: String,
    /// Data kind label: text, number, boolean, date, reference, collection.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Default value for new instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Help text shown alongside the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Related schema name, for reference and collection kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Row count for multi-line text inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// Step size for numeric inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Decoration shown before the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Decoration shown after the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Identifier of the validation rule to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    /// Listed, but not rendered in tabular views.
    pub hide_in_table: bool,
}

/// Derive descriptors for a schema's visible fields, in declaration order.
/// Hidden fields are omitted entirely. Pure.
pub fn describe_fields(schema: &EntitySchema) -> Vec<FieldDescriptor> {
    schema
        .fields
        .iter()
        .filter(|f| !f.hidden)
        .map(|f| FieldDescriptor {
            name: f.name.clone(),
            kind: f.kind.label().to_string(),
            required: f.required,
            default: f.default.clone(),
            help: f.help.clone(),
            target: f.kind.target().map(str::to_string),
            rows: f.rows,
            step: f.step,
            prefix: f.prefix.clone(),
            suffix: f.suffix.clone(),
            validator: f.validator.clone(),
            hide_in_table: f.hide_in_table,
        })
        .collect()
}

/// Memoizing wrapper around [`describe_fields`].
///
/// The catalog is immutable after startup, so descriptors are cached per
/// schema name for the process lifetime.
#[derive(Default)]
pub struct FieldIntrospector {
    cache: DashMap<String, Arc<Vec<FieldDescriptor>>>,
}

impl FieldIntrospector {
    /// Create an empty introspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe the visible fields of a schema.
    pub fn describe(&self, schema: &EntitySchema) -> Arc<Vec<FieldDescriptor>> {
        if let Some(cached) = self.cache.get(schema.name()) {
            return Arc::clone(&cached);
        }
        let descriptors = Arc::new(describe_fields(schema));
        self.cache
            .insert(schema.name().to_string(), Arc::clone(&descriptors));
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldDef;
    use crate::entity::Entity;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use uuid::Uuid;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct City {
        id: Uuid,
    }

    impl Entity for City {
        fn id(&self) -> Uuid {
            self.id
        }

        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
    }

    fn city_schema() -> EntitySchema {
        EntitySchema::of::<City>()
            .child("Geography")
            .with_field(
                FieldDef::text("name")
                    .required()
                    .with_help("The city's name."),
            )
            .with_field(FieldDef::number("population").with_step(1.0))
            .with_field(FieldDef::text("notes").with_rows(4).hide_in_table())
            .with_field(FieldDef::text("secret").hidden())
    }

    #[test]
    fn test_hidden_fields_are_omitted() {
        let descriptors = describe_fields(&city_schema());
        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["name", "population", "notes"]);
    }

    #[test]
    fn test_hide_in_table_is_flagged_not_omitted() {
        let descriptors = describe_fields(&city_schema());
        let notes = descriptors.iter().find(|d| d.name == "notes").unwrap();
        assert!(notes.hide_in_table);
        assert_eq!(notes.rows, Some(4));
    }

    #[test]
    fn test_metadata_carried_through() {
        let descriptors = describe_fields(&city_schema());
        let name = &descriptors[0];
        assert_eq!(name.kind, "text");
        assert!(name.required);
        assert_eq!(name.help.as_deref(), Some("The city's name."));

        let population = &descriptors[1];
        assert_eq!(population.kind, "number");
        assert_eq!(population.step, Some(1.0));
    }

    #[test]
    fn test_serializes_camel_case_without_absent_options() {
        let descriptors = describe_fields(&city_schema());
        let rendered = serde_json::to_value(&descriptors[0]).unwrap();
        assert_eq!(
            rendered,
            json!({
                "name": "name",
                "type": "text",
                "required": true,
                "help": "The city's name.",
                "hideInTable": false,
            })
        );
    }

    #[test]
    fn test_describe_is_memoized_per_schema() {
        let introspector = FieldIntrospector::new();
        let schema = city_schema();

        let first = introspector.describe(&schema);
        let second = introspector.describe(&schema);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
