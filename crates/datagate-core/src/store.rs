//! Persistence store wrapper around sled.

use std::path::PathBuf;

use sled::{Db, Tree};

use crate::error::Error;

/// Prefix for per-entity data trees.
const DATA_TREE_PREFIX: &str = "data:";

/// Configuration for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database directory.
    pub path: PathBuf,

    /// Page cache capacity in bytes.
    pub cache_capacity: u64,

    /// Flush interval in milliseconds. None means flush on every write.
    pub flush_every_ms: Option<u64>,

    /// Enable zstd compression.
    pub compression: bool,

    /// Temporary database (deleted on drop).
    pub temporary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./datagate_data"),
            cache_capacity: 512 * 1024 * 1024,
            flush_every_ms: Some(1000),
            compression: true,
            temporary: false,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a temporary configuration for testing.
    pub fn temporary() -> Self {
        Self {
            path: PathBuf::from(""),
            temporary: true,
            ..Default::default()
        }
    }

    fn to_sled_config(&self) -> sled::Config {
        let mut config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .use_compression(self.compression);

        if self.temporary {
            config = config.temporary(true);
        } else {
            config = config.path(&self.path);
        }

        if let Some(ms) = self.flush_every_ms {
            config = config.flush_every_ms(Some(ms));
        }

        config
    }
}

/// Handle to the shared persistence store.
///
/// One sled tree holds the rows of one registered entity type, keyed by the
/// entity's 16-byte identifier. Cloning is cheap; clones share the same
/// underlying database.
#[derive(Clone)]
pub struct Store {
    db: Db,
}

impl Store {
    /// Open or create a store with the given configuration.
    pub fn open(config: StoreConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        Ok(Self { db })
    }

    /// Open the data tree for a registered entity type.
    pub fn entity_tree(&self, type_name: &str) -> Result<Tree, Error> {
        Ok(self.db.open_tree(format!("{DATA_TREE_PREFIX}{type_name}"))?)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_temporary() {
        let store = Store::open(StoreConfig::temporary()).unwrap();
        let tree = store.entity_tree("Country").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_entity_trees_are_isolated() {
        let store = Store::open(StoreConfig::temporary()).unwrap();
        let countries = store.entity_tree("Country").unwrap();
        let leaders = store.entity_tree("Leader").unwrap();

        countries.insert(b"a", b"1").unwrap();
        assert!(leaders.is_empty());
        assert_eq!(countries.len(), 1);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Store::open(StoreConfig::new(dir.path())).unwrap();
            store.entity_tree("Country").unwrap().insert(b"a", b"1").unwrap();
            store.flush().unwrap();
        }
        {
            let store = Store::open(StoreConfig::new(dir.path())).unwrap();
            assert_eq!(store.entity_tree("Country").unwrap().len(), 1);
        }
    }
}
