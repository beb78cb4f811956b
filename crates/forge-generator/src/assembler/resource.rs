//! Harvestable resources: main, metal and stump meshes in one fixed group,
//! plus a detached stump tree.

use forge_scene::{NodeBuilder, NodeId, NodeTree};

use super::{
    AssemblyContext, AssemblyError, RESOURCE_DROP, StructureAssembler, fixed_group, required,
};
use crate::artifact::{GeneratedTree, Role};
use crate::spec::Category;

/// Assembler for [`Category::Resource`]. Bypasses LOD planning.
pub struct ResourceAssembler;

impl StructureAssembler for ResourceAssembler {
    fn category(&self) -> Category {
        Category::Resource
    }

    fn assemble(&self, ctx: &AssemblyContext<'_>) -> Result<GeneratedTree, AssemblyError> {
        let spec = ctx.spec;
        let main = required(spec.main_mesh.as_ref(), "main_mesh")?;
        let metal = required(spec.metal_mesh.as_ref(), "metal_mesh")?;
        let stump = required(spec.stump_mesh.as_ref(), "stump_mesh")?;
        let material = required(spec.main_material.as_ref(), "main_material")?;

        let mut generated = GeneratedTree::new(Category::Resource);
        generated.push(Role::Nav, ctx.nav_tree(main));

        let mut object = NodeTree::new(
            ctx.object_root("Resource")
                .collider(Some(main.clone()), spec.physics_material.clone()),
        );
        let renderers = [("Model_0", main), ("Metal_0", metal), ("Stump_0", stump)]
            .into_iter()
            .map(|(name, mesh)| {
                object.add_child(
                    NodeId::ROOT,
                    NodeBuilder::new(name)
                        .geometry(mesh.clone())
                        .renderer(material.clone()),
                )
            })
            .collect();
        let root = object.root_mut();
        root.lod_group = Some(fixed_group(renderers));
        root.resource = Some(RESOURCE_DROP);
        generated.push(Role::Object, object);

        generated.push(
            Role::Stump,
            ctx.stump_tree(stump, material, spec.physics_material.as_ref(), true),
        );

        Ok(generated)
    }
}
