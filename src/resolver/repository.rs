//! Metadata repository seam and an in-memory implementation

use rustc_hash::FxHashMap;

use super::error::{RepositoryError, RepositoryResult};
use crate::model::{Definition, DefinitionKind};

/// Stores and retrieves named definitions by kind and identifier
pub trait MetadataRepository: Send + Sync {
    /// Fetch the definition of `kind` whose identifier is `id`
    fn get(&self, kind: DefinitionKind, id: &str) -> RepositoryResult<Definition>;
}

/// Repository backed by a hash map, loaded up front
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    definitions: FxHashMap<(DefinitionKind, String), Definition>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every definition in an iterator; later duplicates replace earlier ones
    pub fn from_definitions(definitions: impl IntoIterator<Item = Definition>) -> Self {
        let mut repository = Self::new();
        for definition in definitions {
            repository.insert(definition);
        }
        repository
    }

    /// Load a JSON array of kind-tagged definitions
    pub fn from_json_str(json: &str) -> RepositoryResult<Self> {
        let definitions: Vec<Definition> = serde_json::from_str(json)?;
        Ok(Self::from_definitions(definitions))
    }

    /// Register a definition, returning the one it replaced
    pub fn insert(&mut self, definition: Definition) -> Option<Definition> {
        let key = (definition.kind(), definition.id().to_string());
        self.definitions.insert(key, definition)
    }

    /// Builder-style registration
    pub fn with(mut self, definition: Definition) -> Self {
        self.insert(definition);
        self
    }

    /// Number of stored definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the repository holds no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl MetadataRepository for InMemoryRepository {
    fn get(&self, kind: DefinitionKind, id: &str) -> RepositoryResult<Definition> {
        self.definitions
            .get(&(kind, id.to_string()))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                kind,
                id: id.to_string(),
            })
    }
}
