//! Category-specific tree assembly.
//!
//! One [`StructureAssembler`] per [`Category`]; [`assembler_for`] selects it.
//! Every assembler is a single pass over an already validated spec, but none
//! of them assumes validation happened: a missing input is reported as
//! [`AssemblyError::MissingInput`].

mod bush;
mod resource;
mod standard;
mod tree;

pub use bush::BushAssembler;
pub use resource::ResourceAssembler;
pub use standard::StandardAssembler;
pub use tree::TreeAssembler;

use forge_lod::PlanError;
use forge_materials::{MaterialKind, MaterialRef, MaterialResolver, PhysicsMaterialRef};
use forge_scene::{MeshRef, NodeBuilder, NodeId, NodeTree, ResourceDrop, TagLayerRegistry};
use thiserror::Error;

use crate::artifact::GeneratedTree;
use crate::spec::{Category, ObjectSpec};

/// Tag and layer name of navigation proxies.
pub const NAV_TAG: &str = "Navmesh";
/// Tag and layer name of forage nodes.
pub const FORAGE_TAG: &str = "Forage";

/// Culling radius of fixed single-band groups.
const FIXED_GROUP_SIZE: f32 = 100.0;
/// Shadow distance of fixed single-band groups.
const FIXED_GROUP_SHADOW: f32 = 50.0;

/// Harvest metadata of resources.
pub const RESOURCE_DROP: ResourceDrop = ResourceDrop::new(100, 5);
/// Harvest metadata of bushes.
pub const BUSH_DROP: ResourceDrop = ResourceDrop::new(50, 3);

/// Internal invariant failures during assembly.
#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    /// LOD band derivation failed.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A required input was absent.
    #[error("required input `{field}` is missing")]
    MissingInput {
        /// Spec field name.
        field: &'static str,
    },
}

/// Pre-resolved tree materials.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeMaterials {
    /// Bark, used by trunks and stumps.
    pub trunk: MaterialRef,
    /// Leaves.
    pub leaves: MaterialRef,
}

impl TreeMaterials {
    /// Resolve both tree materials, falling back to flat colors.
    pub fn resolve(materials: &dyn MaterialResolver, spec: &ObjectSpec) -> Self {
        Self {
            trunk: materials.resolve(MaterialKind::Trunk, spec.trunk_texture.as_ref()),
            leaves: materials.resolve(MaterialKind::Leaves, spec.leaves_texture.as_ref()),
        }
    }
}

/// Everything an assembler reads.
pub struct AssemblyContext<'a> {
    /// The object being generated.
    pub spec: &'a ObjectSpec,
    /// Layer lookup.
    pub layers: &'a dyn TagLayerRegistry,
    /// Material resolution for generated materials.
    pub materials: &'a dyn MaterialResolver,
    /// Tree materials resolved ahead of assembly, if any.
    pub tree_materials: Option<&'a TreeMaterials>,
}

impl AssemblyContext<'_> {
    /// Root builder tagged with the object's tag and layer.
    fn object_root(&self, name: &str) -> NodeBuilder {
        let tag = self.spec.object_tag();
        NodeBuilder::new(name).tag_layer(tag, self.layers.resolve(tag))
    }

    /// Collider-only navigation proxy.
    fn nav_tree(&self, mesh: &MeshRef) -> NodeTree {
        NodeTree::new(
            NodeBuilder::new("Nav")
                .tag_layer(NAV_TAG, self.layers.resolve(NAV_TAG))
                .collider(Some(mesh.clone()), None),
        )
    }

    /// Companion stump: collider root plus one renderer child.
    fn stump_tree(
        &self,
        mesh: &MeshRef,
        material: &MaterialRef,
        physics: Option<&PhysicsMaterialRef>,
        with_lod_group: bool,
    ) -> NodeTree {
        let mut tree = NodeTree::new(
            self.object_root("Stump")
                .collider(Some(mesh.clone()), physics.cloned()),
        );
        let model = tree.add_child(
            NodeId::ROOT,
            NodeBuilder::new("Model_0")
                .geometry(mesh.clone())
                .renderer(material.clone()),
        );
        if with_lod_group {
            tree.root_mut().lod_group = Some(fixed_group(vec![model]));
        }
        tree
    }
}

/// Builds the full set of trees for one category.
pub trait StructureAssembler {
    /// Category handled by this assembler.
    fn category(&self) -> Category;

    /// Assemble every top-level tree, in save order.
    fn assemble(&self, ctx: &AssemblyContext<'_>) -> Result<GeneratedTree, AssemblyError>;
}

/// The assembler for `category`.
pub fn assembler_for(category: Category) -> &'static dyn StructureAssembler {
    match category {
        Category::Standard => &StandardAssembler,
        Category::Resource => &ResourceAssembler,
        Category::Tree => &TreeAssembler,
        Category::Bush => &BushAssembler,
    }
}

fn required<'a, T>(value: Option<&'a T>, field: &'static str) -> Result<&'a T, AssemblyError> {
    value.ok_or(AssemblyError::MissingInput { field })
}

fn fixed_group(renderers: Vec<NodeId>) -> forge_scene::LodGroup {
    forge_lod::LodPlan::fixed(
        forge_lod::VERY_NEAR_THRESHOLD,
        renderers,
        FIXED_GROUP_SIZE,
        FIXED_GROUP_SHADOW,
    )
}
