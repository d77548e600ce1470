//! TypeRegistry - insertion-ordered store of export records.
//!
//! # Storage Model
//!
//! - **Records**: stored in a `Vec` in first-insertion order, so emission is
//!   deterministic and follows registration order.
//! - **Index**: an `FxHashMap` from qualified name to position for O(1)
//!   lookup.
//!
//! Records are never replaced, merged or removed. Inserting a name that is
//! already present keeps the original record and drops the new one.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is owned by a single lowering pass and threaded through it
//! by `&mut`. It performs no locking.
//!
//! # Example
//!
//! ```
//! use flatbind_core::{ExportRecord, QualifiedName};
//! use flatbind_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! let name = QualifiedName::parse("engine::Texture");
//! registry.insert(name.clone(), ExportRecord::Handle { exported_name: "Texture".into() });
//!
//! assert_eq!(registry.exported_name(&name), Some("Texture"));
//! ```

use rustc_hash::FxHashMap;

use flatbind_core::{ExportRecord, QualifiedName};

/// Registry of export records keyed by qualified source name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Records in first-insertion order.
    entries: Vec<(QualifiedName, ExportRecord)>,
    /// Name -> position in `entries`.
    index: FxHashMap<QualifiedName, usize>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a record by qualified name.
    pub fn lookup(&self, name: &QualifiedName) -> Option<&ExportRecord> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    /// Check if a record exists.
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.index.contains_key(name)
    }

    /// Exported name of a registered record.
    pub fn exported_name(&self, name: &QualifiedName) -> Option<&str> {
        self.lookup(name).map(ExportRecord::exported_name)
    }

    /// Insert a record, keeping any record already stored under `name`.
    ///
    /// Returns the stored record, which is the existing one when `name` was
    /// already registered.
    pub fn insert(&mut self, name: QualifiedName, record: ExportRecord) -> &ExportRecord {
        let pos = match self.index.get(&name) {
            Some(&pos) => {
                tracing::trace!(%name, "record already registered, keeping the first");
                pos
            }
            None => {
                tracing::debug!(%name, exported = record.exported_name(), "registering record");
                let pos = self.entries.len();
                self.index.insert(name.clone(), pos);
                self.entries.push((name, record));
                pos
            }
        };
        &self.entries[pos].1
    }

    /// Iterate over records in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &ExportRecord)> {
        self.entries.iter().map(|(name, record)| (name, record))
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
