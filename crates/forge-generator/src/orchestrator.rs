//! The generation entry point: validate, prepare folders, assemble, persist.

use std::fmt;
use std::path::{Path, PathBuf};

use forge_config::{Config, OutputConfig};
use forge_materials::{MaterialFallbackResolver, MaterialResolver, StaticShaderRegistry};
use forge_scene::{LayerCache, StaticLayerRegistry, TagLayerRegistry};
use tracing::{debug, info, warn};

use crate::assembler::{AssemblyContext, TreeMaterials, assembler_for};
use crate::error::GenerationError;
use crate::spec::{Category, ObjectSpec, SizeClass};
use crate::store::{TemplateHandle, TemplateStore};

/// File extension of persisted templates.
pub const TEMPLATE_EXTENSION: &str = "ron";

/// What a successful generation produced.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    /// Category that was generated.
    pub category: Category,
    /// Folder the templates were saved in.
    pub folder: PathBuf,
    /// Saved templates, in save order.
    pub handles: Vec<TemplateHandle>,
}

impl GenerationReport {
    /// Artifact names, in save order.
    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().filter_map(TemplateHandle::name).collect()
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} templates in {}:",
            self.category,
            self.folder.display()
        )?;
        for handle in &self.handles {
            writeln!(f, "  {}", handle.path().display())?;
        }
        Ok(())
    }
}

/// Turns object specs into persisted templates.
pub struct Generator<S, L, M> {
    output: OutputConfig,
    store: S,
    layers: L,
    materials: M,
}

/// Generator wired from [`Config`].
pub type DefaultGenerator<S> =
    Generator<S, LayerCache<StaticLayerRegistry>, MaterialFallbackResolver<StaticShaderRegistry>>;

impl<S: TemplateStore> DefaultGenerator<S> {
    /// Build layer and shader lookups from the config tables.
    pub fn from_config(config: &Config, store: S) -> Self {
        let layers = LayerCache::new(StaticLayerRegistry::new(
            config
                .layers
                .layers
                .iter()
                .map(|(name, id)| (name.as_str(), *id)),
        ));
        let shaders =
            StaticShaderRegistry::new(config.shaders.available.iter().map(String::as_str));
        let materials = MaterialFallbackResolver::new(
            shaders,
            config.shaders.foliage.as_str(),
            config.shaders.default.as_str(),
        );
        Generator::new(config.output.clone(), store, layers, materials)
    }
}

impl<S, L, M> Generator<S, L, M>
where
    S: TemplateStore,
    L: TagLayerRegistry,
    M: MaterialResolver,
{
    /// Create a generator.
    pub fn new(output: OutputConfig, store: S, layers: L, materials: M) -> Self {
        Self {
            output,
            store,
            layers,
            materials,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Folder templates for `spec` are saved in:
    /// `<base>/<category folder>[/<name>]`.
    pub fn target_folder(&self, spec: &ObjectSpec) -> PathBuf {
        let output = &self.output;
        let category_folder = match spec.category {
            Category::Standard => match spec.size {
                SizeClass::Small => &output.small_folder,
                SizeClass::Medium => &output.medium_folder,
                SizeClass::Large => &output.large_folder,
            },
            Category::Resource => &output.resource_folder,
            Category::Tree => &output.tree_folder,
            Category::Bush => &output.bush_folder,
        };
        let folder = output.base_folder.join(category_folder);
        if spec.name.is_empty() {
            folder
        } else {
            folder.join(&spec.name)
        }
    }

    /// Create the base folder and every category folder. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Folder`] naming the folder that failed.
    pub fn ensure_folder_structure(&self) -> Result<(), GenerationError> {
        self.ensure_folder(&self.output.base_folder)?;
        for category_folder in self.output.category_folders() {
            self.ensure_folder(&self.output.base_folder.join(category_folder))?;
        }
        Ok(())
    }

    fn ensure_folder(&self, folder: &Path) -> Result<(), GenerationError> {
        self.store
            .ensure_folder(folder)
            .map_err(|source| GenerationError::Folder {
                path: folder.to_path_buf(),
                source,
            })
    }

    /// Generate and persist every template for `spec`.
    ///
    /// Stops at the first failure; templates saved before it stay in place.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Validation`] before anything is touched.
    /// - [`GenerationError::Folder`] if folders cannot be prepared.
    /// - [`GenerationError::Assembly`] if a node tree cannot be built.
    /// - [`GenerationError::Store`] naming the artifact that failed to save.
    pub fn generate(&self, spec: &ObjectSpec) -> Result<GenerationReport, GenerationError> {
        if let Err(err) = spec.validate() {
            warn!(category = %spec.category, error = %err, "refusing object spec");
            return Err(err.into());
        }

        let folder = self.target_folder(spec);
        self.ensure_folder_structure()?;
        self.ensure_folder(&folder)?;

        let tree_materials = (spec.category == Category::Tree)
            .then(|| TreeMaterials::resolve(&self.materials, spec));
        let ctx = AssemblyContext {
            spec,
            layers: &self.layers,
            materials: &self.materials,
            tree_materials: tree_materials.as_ref(),
        };
        let generated = assembler_for(spec.category)
            .assemble(&ctx)
            .map_err(|source| GenerationError::Assembly {
                path: folder.clone(),
                source,
            })?;
        debug!(
            category = %spec.category,
            artifacts = generated.artifacts.len(),
            "assembled node trees"
        );

        let mut handles = Vec::with_capacity(generated.artifacts.len());
        for artifact in &generated.artifacts {
            let name = generated.artifact_name(artifact.role);
            let path = folder.join(format!("{name}.{TEMPLATE_EXTENSION}"));
            match self.store.save(artifact, &path) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    return Err(GenerationError::Store {
                        artifact: name,
                        path,
                        source,
                    });
                }
            }
        }

        info!(
            category = %spec.category,
            folder = %folder.display(),
            templates = handles.len(),
            "generated object templates"
        );
        Ok(GenerationReport {
            category: spec.category,
            folder,
            handles,
        })
    }
}
