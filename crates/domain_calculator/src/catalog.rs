//! Schema catalog
//!
//! Loads calculator schemas from JSON and caches them by schema id. The
//! three schemas shipped with the engine are available through
//! [`SchemaCatalog::bundled`].
//!
//! # Example
//!
//! ```rust
//! use domain_calculator::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::bundled().unwrap();
//! let schema = catalog.get("merchandise").unwrap();
//! assert_eq!(schema.schema_type, "merchandise");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use core_kernel::SchemaId;

use crate::error::CatalogError;
use crate::schema::Schema;

const BUNDLED: [(&str, &str); 3] = [
    ("merchandise.json", include_str!("../schemas/merchandise.json")),
    ("productions.json", include_str!("../schemas/productions.json")),
    ("scope_builder.json", include_str!("../schemas/scope_builder.json")),
];

/// Cache of parsed schemas by id
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: HashMap<SchemaId, Arc<Schema>>,
}

impl SchemaCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the bundled schemas
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled schema fails to parse
    pub fn bundled() -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for (name, json) in BUNDLED {
            catalog.register(Self::parse(name, json)?);
        }
        Ok(catalog)
    }

    /// Parses a schema from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON is not a valid schema
    pub fn load_from_str(json: &str) -> Result<Schema, CatalogError> {
        Self::parse("<string>", json)
    }

    /// Reads and parses a schema file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Schema, CatalogError> {
        let content = fs::read_to_string(path).map_err(|error| CatalogError::io(path, error))?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Registers every `*.json` schema in a directory
    ///
    /// Files are loaded in name order; a later schema replaces an earlier
    /// one with the same id.
    ///
    /// # Returns
    ///
    /// The number of schemas loaded
    ///
    /// # Errors
    ///
    /// Returns the first read or parse failure
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, CatalogError> {
        let entries = fs::read_dir(dir).map_err(|error| CatalogError::io(dir, error))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|error| CatalogError::io(dir, error))?.path();
            if path.extension().is_some_and(|extension| extension == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.register(Self::load_from_file(path)?);
        }

        tracing::info!(dir = %dir.display(), schemas = paths.len(), "Loaded schema directory");
        Ok(paths.len())
    }

    /// Caches a schema under its id, replacing any previous one
    pub fn register(&mut self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        if self
            .schemas
            .insert(schema.id.clone(), Arc::clone(&schema))
            .is_some()
        {
            tracing::debug!(schema_id = %schema.id, "Replaced cached schema");
        }
        schema
    }

    /// Looks up a cached schema
    pub fn get(&self, id: &str) -> Option<Arc<Schema>> {
        self.schemas.get(id).cloned()
    }

    /// Looks up a cached schema, failing if it is absent
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no schema has the id
    pub fn require(&self, id: &str) -> Result<Arc<Schema>, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Cached schema ids in sorted order
    pub fn ids(&self) -> Vec<&SchemaId> {
        let mut ids: Vec<&SchemaId> = self.schemas.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn parse(origin: &str, json: &str) -> Result<Schema, CatalogError> {
        serde_json::from_str(json).map_err(|error| CatalogError::parse(origin, error))
    }
}
