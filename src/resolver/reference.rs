//! Reference resolution: replaces placeholders with deep copies of their targets

use super::error::ResolveError;
use super::repository::MetadataRepository;
use crate::error::BiError;
use crate::model::{BiDefinition, DefinitionKind, DefinitionRef};

/// Resolves definition graphs against a metadata repository
///
/// Resolution never mutates its input: it returns a new graph in which every
/// reachable placeholder has been replaced by its resolved target. Views are
/// returned as they are.
#[derive(Clone, Copy)]
pub struct ReferenceResolver<'r> {
    repository: &'r dyn MetadataRepository,
    max_depth: usize,
}

impl<'r> ReferenceResolver<'r> {
    /// Default bound on nesting and reference-chain depth
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Create a resolver over a repository
    pub fn new(repository: &'r dyn MetadataRepository) -> Self {
        Self {
            repository,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the depth bound
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve an optional definition; `None` resolves to `None`
    pub fn resolve<T: BiDefinition>(&self, definition: Option<&T>) -> Result<Option<T>, BiError> {
        definition.map(|d| self.resolve_definition(d)).transpose()
    }

    /// Resolve a definition into a fully materialized copy
    pub fn resolve_definition<T: BiDefinition>(&self, definition: &T) -> Result<T, BiError> {
        let mut pass = ResolutionPass::new(self.repository, self.max_depth);
        pass.resolve_definition(definition)
    }

    /// Fetch a definition by identifier and resolve it
    pub fn resolve_by_id<T: BiDefinition>(&self, id: &str) -> Result<T, BiError> {
        let origin = DefinitionRef {
            kind: T::KIND,
            id: id.to_string(),
            name: None,
        };
        let fetched = self
            .repository
            .get(T::KIND, id)
            .map_err(|e| BiError::new(origin.clone(), e.into()))?;
        let actual = fetched.kind();
        let definition = T::from_definition(fetched).ok_or_else(|| {
            BiError::new(
                origin,
                ResolveError::KindMismatch {
                    id: id.to_string(),
                    expected: T::KIND,
                    actual,
                },
            )
        })?;
        self.resolve_definition(&definition)
    }
}

/// State of one resolution: the reference trail and current nesting depth
///
/// Definition kinds hand their child fields to the pass through
/// [`BiDefinition::resolve_children`].
pub struct ResolutionPass<'r> {
    repository: &'r dyn MetadataRepository,
    max_depth: usize,
    depth: usize,
    trail: Vec<(DefinitionKind, String)>,
}

impl<'r> ResolutionPass<'r> {
    fn new(repository: &'r dyn MetadataRepository, max_depth: usize) -> Self {
        Self {
            repository,
            max_depth,
            depth: 0,
            trail: Vec::new(),
        }
    }

    /// Replace a definition-valued field with its resolved counterpart
    pub fn resolve_field<T: BiDefinition>(&mut self, field: &mut T) -> Result<(), BiError> {
        *field = self.resolve_definition(field)?;
        Ok(())
    }

    /// Resolve an optional definition-valued field
    pub fn resolve_optional<T: BiDefinition>(
        &mut self,
        field: &mut Option<T>,
    ) -> Result<(), BiError> {
        match field {
            Some(definition) => self.resolve_field(definition),
            None => Ok(()),
        }
    }

    /// Resolve every element of a definition sequence in place, keeping order
    pub fn resolve_sequence<T: BiDefinition>(&mut self, items: &mut [T]) -> Result<(), BiError> {
        for item in items.iter_mut() {
            self.resolve_field(item)?;
        }
        Ok(())
    }

    fn resolve_definition<T: BiDefinition>(&mut self, definition: &T) -> Result<T, BiError> {
        if T::KIND == DefinitionKind::View {
            return Ok(definition.clone());
        }
        if self.depth >= self.max_depth {
            log::debug!(
                "resolution of {} exceeded depth {}",
                DefinitionRef::of(definition),
                self.max_depth
            );
            return Err(self.cycle_error(definition, &definition.header().id));
        }

        self.depth += 1;
        let result = self.resolve_at_depth(definition);
        self.depth -= 1;
        result
    }

    fn resolve_at_depth<T: BiDefinition>(&mut self, definition: &T) -> Result<T, BiError> {
        let Some(target_id) = definition.header().reference_target() else {
            let mut copy = definition.clone();
            copy.resolve_children(self)?;
            return Ok(copy);
        };

        if self
            .trail
            .iter()
            .any(|(kind, id)| *kind == T::KIND && id == target_id)
        {
            return Err(self.cycle_error(definition, target_id));
        }

        log::trace!(
            "following {} reference '{}' from '{}'",
            T::KIND,
            target_id,
            definition.header().id
        );

        let fetched = self
            .repository
            .get(T::KIND, target_id)
            .map_err(|e| BiError::new(DefinitionRef::of(definition), e.into()))?;
        let actual = fetched.kind();
        let target = T::from_definition(fetched).ok_or_else(|| {
            BiError::new(
                DefinitionRef::of(definition),
                ResolveError::KindMismatch {
                    id: target_id.to_string(),
                    expected: T::KIND,
                    actual,
                },
            )
        })?;

        self.trail.push((T::KIND, target_id.to_string()));
        let resolved = self.resolve_definition(&target);
        self.trail.pop();
        resolved
    }

    fn cycle_error<T: BiDefinition>(&self, definition: &T, revisited: &str) -> BiError {
        let mut chain: Vec<String> = self.trail.iter().map(|(_, id)| id.clone()).collect();
        chain.push(revisited.to_string());
        BiError::new(
            DefinitionRef::of(definition),
            ResolveError::CycleDetected { chain },
        )
    }
}
