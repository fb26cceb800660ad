//! Field metadata declared at registration time.

use serde_json::Value;

/// The declared kind of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// Numeric value.
    Number,
    /// True/false flag.
    Boolean,
    /// Calendar date or timestamp, serialized as ISO-8601 text.
    Date,
    /// Reference to a single related entity.
    Reference {
        /// External name of the referenced schema.
        target: String,
    },
    /// Collection of related entities.
    Collection {
        /// External name of the element schema.
        target: String,
    },
}

impl FieldKind {
    /// Short client-facing label for the kind.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Reference { .. } => "reference",
            FieldKind::Collection { .. } => "collection",
        }
    }

    /// The related schema name, for reference and collection kinds.
    pub fn target(&self) -> Option<&str> {
        match self {
            FieldKind::Reference { target } | FieldKind::Collection { target } => {
                Some(target.as_str())
            }
            _ => None,
        }
    }

    /// Whether the field holds related entities rather than row data.
    pub fn is_navigation(&self) -> bool {
        matches!(self, FieldKind::Reference { .. } | FieldKind::Collection { .. })
    }
}

/// A field declared on an entity schema.
///
/// Immutable once the catalog is built. Names match the field's serialized
/// JSON key.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared data kind.
    pub kind: FieldKind,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Default value applied to new transient instances.
    pub default: Option<Value>,
    /// Help text shown alongside the input.
    pub help: Option<String>,
    /// Omitted entirely from field listings.
    pub hidden: bool,
    /// Listed, but not rendered in tabular views.
    pub hide_in_table: bool,
    /// Row count for multi-line text inputs.
    pub rows: Option<u32>,
    /// Step size for numeric inputs.
    pub step: Option<f64>,
    /// Decoration shown before the value.
    pub prefix: Option<String>,
    /// Decoration shown after the value.
    pub suffix: Option<String>,
    /// Identifier of the validation rule to apply.
    pub validator: Option<String>,
}

impl FieldDef {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            help: None,
            hidden: false,
            hide_in_table: false,
            rows: None,
            step: None,
            prefix: None,
            suffix: None,
            validator: None,
        }
    }

    /// Create a text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Text)
    }

    /// Create a number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Number)
    }

    /// Create a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Boolean)
    }

    /// Create a date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Date)
    }

    /// Create a reference field pointing at another registered schema.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            FieldKind::Reference {
                target: target.into(),
            },
        )
    }

    /// Create a collection field of another registered schema.
    pub fn collection(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            FieldKind::Collection {
                target: target.into(),
            },
        )
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    ///
    /// Applied to new transient instances only where the serialized field is
    /// null or absent; a field that always serializes a concrete value keeps
    /// that value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Omit the field from listings entirely.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Keep the field out of tabular views.
    pub fn hide_in_table(mut self) -> Self {
        self.hide_in_table = true;
        self
    }

    /// Set the multi-line row count.
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set the numeric step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the prefix decoration.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the suffix decoration.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set the validator identifier.
    pub fn with_validator(mut self, validator: impl Into<String>) -> Self {
        self.validator = Some(validator.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_builder() {
        let field = FieldDef::number("epiIndex")
            .required()
            .with_step(0.01)
            .with_help("Environmental Performance Index")
            .with_default(json!(0.0));

        assert_eq!(field.name, "epiIndex");
        assert_eq!(field.kind, FieldKind::Number);
        assert!(field.required);
        assert_eq!(field.step, Some(0.01));
        assert!(field.default.is_some());
    }

    #[test]
    fn test_navigation_kinds() {
        let leader = FieldDef::reference("leader", "Leader");
        let cities = FieldDef::collection("cities", "City");
        let name = FieldDef::text("name");

        assert!(leader.kind.is_navigation());
        assert!(cities.kind.is_navigation());
        assert!(!name.kind.is_navigation());
        assert_eq!(leader.kind.target(), Some("Leader"));
        assert_eq!(name.kind.target(), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FieldKind::Text.label(), "text");
        assert_eq!(FieldKind::Date.label(), "date");
        assert_eq!(
            FieldKind::Collection {
                target: "City".into()
            }
            .label(),
            "collection"
        );
    }
}
