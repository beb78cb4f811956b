use std::path::PathBuf;

use thiserror::Error;

use crate::assembler::AssemblyError;
use crate::spec::ValidationError;
use crate::store::StoreError;

/// Errors that can occur during object generation.
///
/// Each variant names the stage that failed. Templates saved before a failure
/// are left in place.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The object spec was refused; nothing was touched.
    #[error("invalid object spec")]
    Validation(#[from] ValidationError),

    /// The folder structure could not be prepared.
    #[error("failed to prepare folder {}", .path.display())]
    Folder {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    /// Node tree assembly failed.
    #[error("failed to assemble templates for {}", .path.display())]
    Assembly {
        path: PathBuf,
        #[source]
        source: AssemblyError,
    },

    /// A template could not be persisted.
    #[error("failed to save {artifact} to {}", .path.display())]
    Store {
        artifact: String,
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}
