//! [`NodeBuilder`]: assembles one node value at a time.

use forge_materials::{MaterialRef, PhysicsMaterialRef};
use tracing::trace;

use crate::layers::LayerId;
use crate::node::{ColliderPolicy, MeshRef, Node, NodeId, RendererPolicy};

const UNTAGGED: &str = "Untagged";

/// Describes a node before it is placed in a [`crate::NodeTree`].
///
/// Tag and layer are inherited from the parent unless
/// [`tag_layer`](Self::tag_layer) is called. Renderers cast and receive
/// shadows unless [`shadows`](Self::shadows) says otherwise.
#[derive(Clone, Debug)]
pub struct NodeBuilder {
    name: String,
    geometry: Option<MeshRef>,
    material: Option<MaterialRef>,
    casts_shadow: bool,
    receives_shadow: bool,
    collider: Option<ColliderPolicy>,
    tag_layer: Option<(String, LayerId)>,
}

impl NodeBuilder {
    /// Start a node with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: None,
            material: None,
            casts_shadow: true,
            receives_shadow: true,
            collider: None,
            tag_layer: None,
        }
    }

    /// Geometry drawn by the node's renderer.
    pub fn geometry(mut self, mesh: MeshRef) -> Self {
        self.geometry = Some(mesh);
        self
    }

    /// Attach a renderer drawing with `material`.
    pub fn renderer(mut self, material: MaterialRef) -> Self {
        self.material = Some(material);
        self
    }

    /// Shadow flags of the renderer.
    pub fn shadows(mut self, casts: bool, receives: bool) -> Self {
        self.casts_shadow = casts;
        self.receives_shadow = receives;
        self
    }

    /// Attach a mesh collider using the generated cooking configuration.
    pub fn collider(mut self, mesh: Option<MeshRef>, material: Option<PhysicsMaterialRef>) -> Self {
        self.collider = Some(ColliderPolicy::new(mesh, material));
        self
    }

    /// Set tag and layer explicitly instead of inheriting them.
    pub fn tag_layer(mut self, tag: impl Into<String>, layer: LayerId) -> Self {
        self.tag_layer = Some((tag.into(), layer));
        self
    }

    /// Produce the node. Has no effect on any tree; the caller links it.
    pub fn build(self, id: NodeId, parent: Option<&Node>) -> Node {
        let tag_overridden = self.tag_layer.is_some() && parent.is_some();
        let (tag, layer) = match (self.tag_layer, parent) {
            (Some(explicit), _) => explicit,
            (None, Some(parent)) => (parent.tag.clone(), parent.layer),
            (None, None) => (UNTAGGED.to_string(), LayerId::DEFAULT),
        };

        let renderer = self.material.map(|material| RendererPolicy {
            material,
            casts_shadow: self.casts_shadow,
            receives_shadow: self.receives_shadow,
        });

        trace!(
            name = %self.name,
            tag = %tag,
            layer = layer.0,
            renderer = renderer.is_some(),
            collider = self.collider.is_some(),
            "built node"
        );

        Node {
            id,
            name: self.name,
            parent: parent.map(|p| p.id),
            tag,
            layer,
            tag_overridden,
            geometry: self.geometry,
            collider: self.collider,
            renderer,
            children: Vec::new(),
            lod_group: None,
            resource: None,
            foliage: None,
        }
    }
}
