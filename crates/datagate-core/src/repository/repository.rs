//! The generic repository: typed persistence behind an erased interface.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::page::{PageQuery, PageResult};
use crate::catalog::EntitySchema;
use crate::entity::Entity;
use crate::error::Error;
use crate::store::Store;

/// Type-erased repository interface.
///
/// One instance is bound to exactly one resolved schema for the lifetime of
/// one request. Payloads and rows cross this boundary as JSON values; the
/// implementation coerces them through the concrete entity type, which is
/// where type safety is enforced.
pub trait DynRepository: Send + Sync {
    /// The schema this repository is bound to.
    fn schema(&self) -> &Arc<EntitySchema>;

    /// Coerce the payload into the entity shape, assign a fresh identifier,
    /// and persist it as a new row.
    fn add(&self, payload: Value) -> Result<Value, Error>;

    /// Fetch by identifier. An absent row is `None`, not an error.
    fn find(&self, id: Uuid) -> Result<Option<Value>, Error>;

    /// Like [`find`](Self::find), but with child navigation references
    /// hydrated. Used as the precursor to relationship operations.
    fn find_for_relationship(&self, id: Uuid) -> Result<Option<Value>, Error>;

    /// All rows, unfiltered and unpaged. Intended for small reference sets.
    fn get_all(&self) -> Result<Vec<Value>, Error>;

    /// One page of a filtered, sorted result set.
    fn get_page(&self, query: &PageQuery) -> Result<PageResult, Error>;

    /// Total row count for the schema.
    fn get_total(&self) -> Result<u64, Error>;

    /// Update an existing row. The payload must carry a known identifier.
    fn update(&self, payload: Value) -> Result<Value, Error>;

    /// Delete by identifier. Deleting an absent row is not an error.
    fn remove(&self, id: Uuid) -> Result<(), Error>;

    /// Delete a batch of identifiers.
    fn remove_range(&self, ids: &[Uuid]) -> Result<(), Error>;

    /// A transient, not-yet-persisted instance with schema defaults applied.
    fn new_instance(&self) -> Result<Value, Error>;
}

/// Repository bound to the concrete entity type `T`.
pub struct Repository<T: Entity> {
    schema: Arc<EntitySchema>,
    store: Store,
    tree: sled::Tree,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Repository<T> {
    /// Bind a repository to `T`'s schema and data tree.
    pub fn new(store: &Store, schema: Arc<EntitySchema>) -> Result<Self, Error> {
        let tree = store.entity_tree(schema.name())?;
        Ok(Self {
            schema,
            store: store.clone(),
            tree,
            _entity: PhantomData,
        })
    }

    fn coerce(&self, payload: Value) -> Result<T, Error> {
        serde_json::from_value(payload).map_err(|e| {
            Error::Validation(format!(
                "payload is not a valid {}: {e}",
                self.schema.name()
            ))
        })
    }

    /// Canonical row shape: serialized through `T`, so every declared field
    /// is present and unhydrated navigation fields are null.
    fn canonical(&self, entity: &T) -> Result<Value, Error> {
        serde_json::to_value(entity).map_err(|e| Error::Persistence(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, Error> {
        serde_json::from_slice(bytes).map_err(|e| {
            Error::Persistence(format!("corrupt {} row: {e}", self.schema.name()))
        })
    }

    /// Persist an entity, stripping navigation fields from the stored row.
    /// Only key fields reference related entities on disk. Returns the
    /// canonical shape.
    fn persist(&self, entity: &T) -> Result<Value, Error> {
        let full = self.canonical(entity)?;
        let mut stored = full.clone();
        if let Value::Object(map) = &mut stored {
            for nav in self.schema.navigation_fields() {
                map.remove(nav);
            }
        }
        let bytes =
            serde_json::to_vec(&stored).map_err(|e| Error::Persistence(e.to_string()))?;
        self.tree.insert(entity.id().as_bytes(), bytes)?;
        Ok(full)
    }

    fn load(&self, id: Uuid) -> Result<Option<T>, Error> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(self.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn load_all(&self) -> Result<Vec<Value>, Error> {
        let mut rows = Vec::new();
        for item in self.tree.iter() {
            let (_, bytes) = item?;
            let entity = self.decode(&bytes)?;
            rows.push(self.canonical(&entity)?);
        }
        Ok(rows)
    }
}

impl<T: Entity> DynRepository for Repository<T> {
    fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    fn add(&self, payload: Value) -> Result<Value, Error> {
        let mut entity = self.coerce(payload)?;
        entity.set_id(Uuid::new_v4());
        let row = self.persist(&entity)?;
        debug!(data_type = %self.schema.name(), id = %entity.id(), "added entity");
        Ok(row)
    }

    fn find(&self, id: Uuid) -> Result<Option<Value>, Error> {
        match self.load(id)? {
            Some(entity) => Ok(Some(self.canonical(&entity)?)),
            None => Ok(None),
        }
    }

    fn find_for_relationship(&self, id: Uuid) -> Result<Option<Value>, Error> {
        let Some(mut row) = self.find(id)? else {
            return Ok(None);
        };
        for link in &self.schema.child_links {
            let child_id = row
                .get(&link.key_field)
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok());
            let Some(child_id) = child_id else { continue };

            let child_tree = self.store.entity_tree(&link.target)?;
            if let Some(bytes) = child_tree.get(child_id.as_bytes())? {
                let child: Value = serde_json::from_slice(&bytes).map_err(|e| {
                    Error::Persistence(format!("corrupt {} row: {e}", link.target))
                })?;
                if let Some(map) = row.as_object_mut() {
                    map.insert(link.navigation.clone(), child);
                }
            }
        }
        Ok(Some(row))
    }

    fn get_all(&self) -> Result<Vec<Value>, Error> {
        self.load_all()
    }

    fn get_page(&self, query: &PageQuery) -> Result<PageResult, Error> {
        let mut rows = self.load_all()?;

        if let Some(term) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = term.to_lowercase();
            let fields = self.schema.search_fields();
            rows.retain(|row| {
                fields
                    .iter()
                    .any(|field| field_contains(row, field, &needle))
            });
        }

        let sort_field = query
            .sort_by
            .as_deref()
            .filter(|&s| !s.is_empty() && self.schema.get_field(s).is_some())
            .unwrap_or_else(|| self.schema.fallback_sort_field());
        rows.sort_by(|a, b| compare_fields(a.get(sort_field), b.get(sort_field)));
        if query.descending {
            rows.reverse();
        }

        let total = rows.len() as u64;
        let start = query.page.saturating_mul(query.rows_per_page);
        let items: Vec<Value> = rows
            .into_iter()
            .skip(start)
            .take(query.rows_per_page)
            .collect();

        Ok(PageResult {
            items,
            total,
            search: query.search.clone(),
            sort_by: Some(sort_field.to_string()),
            descending: query.descending,
            page: query.page,
            rows_per_page: query.rows_per_page,
        })
    }

    fn get_total(&self) -> Result<u64, Error> {
        Ok(self.tree.len() as u64)
    }

    fn update(&self, payload: Value) -> Result<Value, Error> {
        let entity = self.coerce(payload)?;
        let id = entity.id();
        if id.is_nil() {
            return Err(Error::Validation("payload carries no identifier".into()));
        }
        if self.tree.get(id.as_bytes())?.is_none() {
            return Err(Error::Validation(format!(
                "no stored {} with identifier {id}",
                self.schema.name()
            )));
        }
        let row = self.persist(&entity)?;
        debug!(data_type = %self.schema.name(), %id, "updated entity");
        Ok(row)
    }

    fn remove(&self, id: Uuid) -> Result<(), Error> {
        self.tree.remove(id.as_bytes())?;
        Ok(())
    }

    fn remove_range(&self, ids: &[Uuid]) -> Result<(), Error> {
        for id in ids {
            self.remove(*id)?;
        }
        Ok(())
    }

    fn new_instance(&self) -> Result<Value, Error> {
        let mut row = self.canonical(&T::default())?;
        if let Value::Object(map) = &mut row {
            for field in &self.schema.fields {
                let Some(default) = &field.default else { continue };
                match map.get(&field.name) {
                    None | Some(Value::Null) => {
                        map.insert(field.name.clone(), default.clone());
                    }
                    _ => {}
                }
            }
        }
        Ok(row)
    }
}

/// Case-insensitive substring match against a row's text field.
fn field_contains(row: &Value, field: &str, needle: &str) -> bool {
    row.get(field)
        .and_then(Value::as_str)
        .map(|s| s.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Order two field values: numbers numerically, strings case-insensitively,
/// anything else by rendered text. Absent and null values sort first.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
