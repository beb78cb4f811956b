//! Trees: trunk, leaves and stump plus any additional trunk/leaves pairs, all
//! permanently visible, with a foliage marker over the leaves.

use forge_materials::MaterialRef;
use forge_scene::{FoliageMarker, MeshRef, NodeBuilder, NodeId, NodeTree};
use tracing::debug;

use super::{AssemblyContext, AssemblyError, StructureAssembler, TreeMaterials, required};
use crate::artifact::{GeneratedTree, Role};
use crate::spec::Category;

/// Name prefix identifying foliage renderers.
const LEAVES_PREFIX: &str = "Leaves";

/// Assembler for [`Category::Tree`]. No distance LOD.
pub struct TreeAssembler;

impl StructureAssembler for TreeAssembler {
    fn category(&self) -> Category {
        Category::Tree
    }

    fn assemble(&self, ctx: &AssemblyContext<'_>) -> Result<GeneratedTree, AssemblyError> {
        let spec = ctx.spec;
        let trunk = required(spec.trunk_mesh.as_ref(), "trunk_mesh")?;
        let leaves = required(spec.leaves_mesh.as_ref(), "leaves_mesh")?;
        let stump = required(spec.stump_mesh.as_ref(), "stump_mesh")?;

        let resolved;
        let materials = match ctx.tree_materials {
            Some(materials) => materials,
            None => {
                resolved = TreeMaterials::resolve(ctx.materials, spec);
                &resolved
            }
        };

        let mut generated = GeneratedTree::new(Category::Tree);
        generated.push(Role::Nav, ctx.nav_tree(trunk));

        let mut object = NodeTree::new(
            ctx.object_root("Tree")
                .collider(Some(trunk.clone()), spec.physics_material.clone()),
        );
        let base = [
            ("Trunk_0".to_string(), trunk, &materials.trunk),
            (format!("{LEAVES_PREFIX}_0"), leaves, &materials.leaves),
            ("Stump_0".to_string(), stump, &materials.trunk),
        ];
        for (name, mesh, material) in base {
            object.add_child(NodeId::ROOT, model(name, mesh, material));
        }

        for (i, pair) in spec.additional_models.iter().enumerate() {
            match (&pair.trunk, &pair.leaves) {
                (Some(extra_trunk), Some(extra_leaves)) => {
                    let n = i + 1;
                    object.add_child(
                        NodeId::ROOT,
                        model(format!("Trunk_{n}"), extra_trunk, &materials.trunk),
                    );
                    object.add_child(
                        NodeId::ROOT,
                        model(format!("{LEAVES_PREFIX}_{n}"), extra_leaves, &materials.leaves),
                    );
                }
                (None, None) => {}
                _ => {
                    return Err(AssemblyError::MissingInput {
                        field: "additional_models",
                    });
                }
            }
        }

        let foliage: Vec<NodeId> = object
            .children(NodeId::ROOT)
            .filter(|n| n.name.starts_with(LEAVES_PREFIX))
            .map(|n| n.id)
            .collect();
        debug!(
            nodes = object.len(),
            foliage = foliage.len(),
            "assembled tree object"
        );
        object.root_mut().foliage = Some(FoliageMarker { renderers: foliage });
        generated.push(Role::Object, object);

        generated.push(
            Role::Stump,
            ctx.stump_tree(stump, &materials.trunk, spec.physics_material.as_ref(), false),
        );

        Ok(generated)
    }
}

fn model(name: String, mesh: &MeshRef, material: &MaterialRef) -> NodeBuilder {
    NodeBuilder::new(name)
        .geometry(mesh.clone())
        .renderer(material.clone())
}
