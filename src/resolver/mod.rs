//! Reference resolution for BI definitions
//!
//! Walks a definition graph and replaces every placeholder (a definition
//! carrying a `ref`) with a deep copy of the definition it points at, fetched
//! from a [`MetadataRepository`].

#![warn(missing_docs)]

mod error;
mod reference;
mod repository;

pub use error::{RepositoryError, RepositoryResult, ResolveError};
pub use reference::{ReferenceResolver, ResolutionPass};
pub use repository::{InMemoryRepository, MetadataRepository};
