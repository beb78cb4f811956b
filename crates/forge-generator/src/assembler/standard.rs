//! Standard objects: nav proxy, LOD'd object, optional skybox variant.

use forge_scene::{NodeBuilder, NodeId, NodeTree};
use tracing::debug;

use super::{AssemblyContext, AssemblyError, StructureAssembler, required};
use crate::artifact::{GeneratedTree, Role};
use crate::spec::Category;

/// Assembler for [`Category::Standard`].
pub struct StandardAssembler;

impl StructureAssembler for StandardAssembler {
    fn category(&self) -> Category {
        Category::Standard
    }

    fn assemble(&self, ctx: &AssemblyContext<'_>) -> Result<GeneratedTree, AssemblyError> {
        let spec = ctx.spec;
        let main = required(spec.main_mesh.as_ref(), "main_mesh")?;
        let material = required(spec.main_material.as_ref(), "main_material")?;

        let mut generated = GeneratedTree::new(Category::Standard);
        generated.push(Role::Nav, ctx.nav_tree(main));

        let mut object = NodeTree::new(
            ctx.object_root("Object")
                .collider(Some(main.clone()), spec.physics_material.clone()),
        );

        let plan = forge_lod::plan(
            &spec.lod_config(),
            &spec.size.lod_profile(),
            Some(main),
            &spec.child_meshes,
        )?;
        let shadows: Vec<(bool, bool)> = plan
            .bands()
            .iter()
            .map(|b| (b.casts_shadow, b.receives_shadow))
            .collect();
        let group = plan.map_renderers(|band, mesh| {
            let (casts, receives) = shadows[band];
            object.add_child(
                NodeId::ROOT,
                NodeBuilder::new(format!("Model_{band}"))
                    .geometry(mesh)
                    .renderer(material.clone())
                    .shadows(casts, receives),
            )
        });
        debug!(
            bands = group.bands().len(),
            size = group.size(),
            "attached LOD group to standard object"
        );
        object.root_mut().lod_group = Some(group);
        generated.push(Role::Object, object);

        if spec.create_skybox {
            let mut skybox = NodeTree::new(ctx.object_root("Skybox"));
            skybox.add_child(
                NodeId::ROOT,
                NodeBuilder::new("Model_0")
                    .geometry(spec.skybox_mesh.as_ref().unwrap_or(main).clone())
                    .renderer(material.clone())
                    .shadows(false, false),
            );
            generated.push(Role::Skybox, skybox);
        }

        Ok(generated)
    }
}
