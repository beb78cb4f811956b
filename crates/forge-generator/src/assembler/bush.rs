//! Bushes: one sibling per supplied model under a drop-carrying root, with an
//! optional forage child on its own tag and layer.

use forge_materials::MaterialKind;
use forge_scene::{FoliageMarker, MeshRef, NodeBuilder, NodeId, NodeTree};
use tracing::debug;

use super::{AssemblyContext, AssemblyError, BUSH_DROP, FORAGE_TAG, StructureAssembler};
use crate::artifact::{GeneratedTree, Role};
use crate::spec::Category;

/// Assembler for [`Category::Bush`].
pub struct BushAssembler;

impl StructureAssembler for BushAssembler {
    fn category(&self) -> Category {
        Category::Bush
    }

    fn assemble(&self, ctx: &AssemblyContext<'_>) -> Result<GeneratedTree, AssemblyError> {
        let spec = ctx.spec;
        let models: Vec<&MeshRef> = spec.bush_models.iter().flatten().collect();
        let Some(&first) = models.first() else {
            return Err(AssemblyError::MissingInput {
                field: "bush_models",
            });
        };
        let material = ctx
            .materials
            .resolve(MaterialKind::Bush, spec.bush_texture.as_ref());

        let mut generated = GeneratedTree::new(Category::Bush);
        generated.push(Role::Nav, ctx.nav_tree(first));

        let mut object = NodeTree::new(ctx.object_root("Bush"));
        let mut foliage = Vec::with_capacity(models.len());
        for (i, mesh) in models.iter().enumerate() {
            let mut node = NodeBuilder::new(format!("Bush_{i}"))
                .geometry((*mesh).clone())
                .renderer(material.clone());
            if i == 0 {
                node = node.collider(Some((*mesh).clone()), spec.physics_material.clone());
            }
            foliage.push(object.add_child(NodeId::ROOT, node));
        }

        if spec.has_forage {
            let mesh = spec.forage_mesh.as_ref().unwrap_or(first);
            object.add_child(
                NodeId::ROOT,
                NodeBuilder::new("Forage")
                    .tag_layer(FORAGE_TAG, ctx.layers.resolve(FORAGE_TAG))
                    .geometry(mesh.clone())
                    .renderer(material.clone()),
            );
        }

        debug!(
            models = models.len(),
            forage = spec.has_forage,
            "assembled bush object"
        );
        let root = object.root_mut();
        root.foliage = Some(FoliageMarker { renderers: foliage });
        root.resource = Some(BUSH_DROP);
        generated.push(Role::Object, object);

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, mesh};
    use super::super::AssemblyError;
    use crate::artifact::Role;
    use crate::spec::{Category, ObjectSpec};
    use forge_materials::{FALLBACK_GREEN, PhysicsMaterialRef, TextureRef};
    use forge_scene::{LayerId, NodeId};

    fn spec() -> ObjectSpec {
        ObjectSpec {
            category: Category::Bush,
            bush_models: vec![mesh("b0"), None, mesh("b1"), mesh("b2")],
            bush_texture: Some(TextureRef("bush.png".to_string())),
            physics_material: Some(PhysicsMaterialRef("Leafy".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_one_sibling_per_model_and_collider_on_first() {
        let generated = Fixture::new().assemble(&spec()).unwrap();
        assert_eq!(generated.roles(), vec![Role::Nav, Role::Object]);

        let object = generated.get(Role::Object).unwrap();
        let children: Vec<_> = object.children(NodeId::ROOT).collect();
        assert_eq!(children.len(), 3);
        assert_eq!(children[2].geometry, mesh("b2"));
        assert!(children[0].collider.is_some());
        assert!(children[1..].iter().all(|n| n.collider.is_none()));
        assert_eq!(
            children[0].collider.as_ref().unwrap().physics_material,
            Some(PhysicsMaterialRef("Leafy".to_string()))
        );
        assert!(object.root().collider.is_none());

        let marker = object.root().foliage.as_ref().unwrap();
        assert_eq!(marker.renderers.len(), 3);
    }

    #[test]
    fn test_bush_drop_metadata() {
        let generated = Fixture::new().assemble(&spec()).unwrap();
        let drop = generated.get(Role::Object).unwrap().root().resource.unwrap();
        assert_eq!((drop.health, drop.max_health, drop.drop_count), (50, 50, 3));
        assert!(drop.dropable);
    }

    #[test]
    fn test_forage_child_has_own_tag_and_falls_back_to_first_model() {
        let spec = ObjectSpec {
            has_forage: true,
            ..spec()
        };
        let generated = Fixture::new().assemble(&spec).unwrap();
        let object = generated.get(Role::Object).unwrap();
        let forage = object.find("Forage").unwrap();
        assert_eq!(forage.tag, "Forage");
        assert_eq!(forage.layer, LayerId(15));
        assert!(forage.tag_overridden);
        assert_eq!(forage.geometry, mesh("b0"));
        assert_eq!(object.root().foliage.as_ref().unwrap().renderers.len(), 3);
        assert_eq!(object.root().tag, "Bush");
    }

    #[test]
    fn test_forage_mesh_preferred_when_given() {
        let spec = ObjectSpec {
            has_forage: true,
            forage_mesh: mesh("berries"),
            ..spec()
        };
        let generated = Fixture::new().assemble(&spec).unwrap();
        let forage = generated.get(Role::Object).unwrap().find("Forage").unwrap();
        assert_eq!(forage.geometry, mesh("berries"));
    }

    #[test]
    fn test_missing_bush_texture_uses_green_fallback() {
        let spec = ObjectSpec {
            bush_texture: None,
            ..spec()
        };
        let generated = Fixture::new().assemble(&spec).unwrap();
        let bush = generated.get(Role::Object).unwrap().find("Bush_0").unwrap();
        let material = bush.renderer.as_ref().unwrap().material.as_inline().unwrap();
        assert_eq!(material.albedo, FALLBACK_GREEN);
    }

    #[test]
    fn test_all_null_models_is_missing_input() {
        let spec = ObjectSpec {
            bush_models: vec![None, None],
            ..spec()
        };
        assert_eq!(
            Fixture::new().assemble(&spec).unwrap_err(),
            AssemblyError::MissingInput {
                field: "bush_models"
            }
        );
    }
}
