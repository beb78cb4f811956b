//! Object template generation: validates an [`ObjectSpec`], assembles the
//! category's node trees, and persists each tree through a [`TemplateStore`].
//!
//! ```text
//! ObjectSpec -> Generator -> StructureAssembler -> GeneratedTree -> TemplateStore
//!                              |-> NodeBuilder
//!                              |-> forge_lod::plan
//!                              '-> MaterialResolver
//! ```

pub mod assembler;
mod artifact;
mod error;
mod orchestrator;
mod spec;
mod store;

pub use artifact::{Artifact, GeneratedTree, Role};
pub use assembler::{
    AssemblyContext, AssemblyError, StructureAssembler, TreeMaterials, assembler_for,
};
pub use error::GenerationError;
pub use orchestrator::{DefaultGenerator, GenerationReport, Generator, TEMPLATE_EXTENSION};
pub use spec::{Category, LodSettings, ObjectSpec, SizeClass, TreeModelPair, ValidationError};
pub use store::{MemoryTemplateStore, RonTemplateStore, StoreError, TemplateHandle, TemplateStore};
