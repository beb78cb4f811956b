//! One generation run: read the object spec, pick a store, generate.

use std::error::Error as _;
use std::path::{Path, PathBuf};

use forge_config::{CliArgs, Config};
use forge_generator::{
    DefaultGenerator, GenerationError, GenerationReport, MemoryTemplateStore, ObjectSpec,
    RonTemplateStore, TemplateStore,
};
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the `forge` command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read object spec {}", .path.display())]
    ReadSpec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse object spec {}", .path.display())]
    ParseSpec {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Read an [`ObjectSpec`] from a RON file.
pub fn read_spec(path: &Path) -> Result<ObjectSpec, AppError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AppError::ReadSpec {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| AppError::ParseSpec {
        path: path.to_path_buf(),
        source,
    })
}

/// Generate the object spec named by `args`, in memory on `--dry-run`.
pub fn run(config: &Config, args: &CliArgs) -> Result<GenerationReport, AppError> {
    let spec = read_spec(&args.spec)?;
    info!(
        spec = %args.spec.display(),
        category = %spec.category,
        output = %config.output.base_folder.display(),
        "generating object"
    );
    if args.dry_run {
        generate(config, MemoryTemplateStore::new(), &spec)
    } else {
        generate(config, RonTemplateStore::new("."), &spec)
    }
}

fn generate<S: TemplateStore>(
    config: &Config,
    store: S,
    spec: &ObjectSpec,
) -> Result<GenerationReport, AppError> {
    Ok(DefaultGenerator::from_config(config, store).generate(spec)?)
}

/// `outer: cause: cause` rendering of an error and its sources.
pub fn error_chain(err: &AppError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
