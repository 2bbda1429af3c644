//! Schema loader for loading definitions from disk at startup
//!
//! - One definition per `*.json` file in the schema directory
//! - Files are read in path order, so loading is deterministic
//! - A missing directory or a malformed file fails the whole load (FATAL)
//! - Schema names are unique; registering a name twice is rejected

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::model::Model;
use crate::observability::{log_event_with_fields, Event};
use crate::registry::Registry;

use super::compiled::CompiledSchema;
use super::definition::SchemaDefinition;
use super::errors::{SchemaError, SchemaResult};

/// Reads definition files and keeps a model per compiled schema.
#[derive(Debug)]
pub struct SchemaLoader {
    /// Directory containing definition files
    schema_dir: PathBuf,
    /// Names referenced by definitions resolve here
    registry: Registry,
    /// Models indexed by schema name
    models: BTreeMap<String, Model>,
}

impl SchemaLoader {
    /// Creates a loader for `schema_dir` that resolves names against `registry`.
    pub fn new(schema_dir: &Path, registry: Registry) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            registry,
            models: BTreeMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Returns the registry definitions are compiled against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Loads every definition file in the schema directory.
    ///
    /// Returns the number of schemas loaded by this call.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let dir = self.schema_dir.display().to_string();

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_definition(&dir, format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_definition(&dir, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        log_event_with_fields(
            Event::SchemasLoaded,
            &[
                ("count", paths.len().to_string().as_str()),
                ("schema_dir", dir.as_str()),
            ],
        );
        Ok(paths.len())
    }

    /// Loads and registers a single definition file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_definition(&source, format!("Failed to read file: {}", e))
        })?;

        let definition = SchemaDefinition::from_json(&source, &content)?;
        self.register_definition(&definition)
    }

    /// Compiles a definition and registers the result.
    pub fn register_definition(&mut self, definition: &SchemaDefinition) -> SchemaResult<()> {
        if self.exists(&definition.name) {
            return Err(SchemaError::schema_immutable(&definition.name));
        }
        let schema = definition.compile(&self.registry)?;
        self.register(schema)
    }

    /// Registers an already compiled schema.
    pub fn register(&mut self, schema: CompiledSchema) -> SchemaResult<()> {
        if self.exists(schema.name()) {
            return Err(SchemaError::schema_immutable(schema.name()));
        }
        let name = schema.name().to_string();
        self.models.insert(name, Model::from_shared(Arc::new(schema)));
        Ok(())
    }

    /// Gets the model for a schema name.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Returns a shareable handle to the model for a schema name.
    pub fn model(&self, name: &str) -> Option<Model> {
        self.models.get(name).cloned()
    }

    /// Checks if a schema exists.
    pub fn exists(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Loaded schema names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.models.len()
    }

    /// Writes a definition to `<schema_dir>/<name>.json`.
    ///
    /// An existing file is never overwritten.
    pub fn save_definition(&self, definition: &SchemaDefinition) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("{}.json", definition.name));
        let source = path.display().to_string();

        if path.exists() {
            return Err(SchemaError::schema_immutable(&definition.name));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_definition(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(definition).map_err(|e| {
            SchemaError::malformed_definition(&source, format!("Failed to serialize definition: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_definition(&source, format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}
