//! [`Node`] and [`NodeTree`]: one persisted template is one tree.

use bitflags::bitflags;
use forge_lod::LodPlan;
use forge_materials::{MaterialRef, PhysicsMaterialRef};
use serde::{Deserialize, Serialize};

use crate::builder::NodeBuilder;
use crate::layers::LayerId;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Path of an imported mesh asset. Borrowed by nodes; the asset store owns it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshRef(pub String);

/// Index of a node inside its [`NodeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

bitflags! {
    /// Mesh collider cooking flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CookingOptions: u8 {
        /// Spend cooking time to make simulation cheaper.
        const COOK_FOR_FASTER_SIMULATION = 1 << 0;
        /// Remove degenerate triangles.
        const ENABLE_MESH_CLEANING = 1 << 1;
        /// Merge vertices sharing a position.
        const WELD_COLOCATED_VERTICES = 1 << 2;
        /// Faster midphase acceleration structure.
        const USE_FAST_MIDPHASE = 1 << 3;
        /// The cooking configuration every generated collider uses.
        const GENERATED = Self::COOK_FOR_FASTER_SIMULATION.bits()
            | Self::ENABLE_MESH_CLEANING.bits()
            | Self::WELD_COLOCATED_VERTICES.bits()
            | Self::USE_FAST_MIDPHASE.bits();
    }
}

/// Mesh collider attached to a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderPolicy {
    /// Collision mesh.
    pub mesh: Option<MeshRef>,
    /// Friction/bounce material.
    pub physics_material: Option<PhysicsMaterialRef>,
    /// Cooking flags; always [`CookingOptions::GENERATED`] for generated nodes.
    pub cooking: CookingOptions,
}

impl ColliderPolicy {
    /// Collider with the generated cooking configuration.
    pub fn new(mesh: Option<MeshRef>, physics_material: Option<PhysicsMaterialRef>) -> Self {
        Self {
            mesh,
            physics_material,
            cooking: CookingOptions::GENERATED,
        }
    }
}

/// Mesh renderer attached to a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RendererPolicy {
    /// Material drawn with.
    pub material: MaterialRef,
    /// Whether the renderer casts shadows.
    pub casts_shadow: bool,
    /// Whether the renderer receives shadows.
    pub receives_shadow: bool,
}

// ---------------------------------------------------------------------------
// Root attachments
// ---------------------------------------------------------------------------

/// LOD group whose bands reference renderer nodes of the same tree.
pub type LodGroup = LodPlan<NodeId>;

/// Harvest metadata read by gameplay code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDrop {
    /// Current health.
    pub health: u32,
    /// Health when fully grown.
    pub max_health: u32,
    /// Whether harvesting drops items.
    pub dropable: bool,
    /// Items dropped when depleted.
    pub drop_count: u32,
}

impl ResourceDrop {
    /// Full-health, droppable resource.
    pub const fn new(health: u32, drop_count: u32) -> Self {
        Self {
            health,
            max_health: health,
            dropable: true,
            drop_count,
        }
    }
}

/// Renderers that receive wind-sway animation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FoliageMarker {
    /// Foliage renderer nodes.
    pub renderers: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single named node. Built by [`NodeBuilder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Position in the owning tree.
    pub id: NodeId,
    /// Local name, unique among siblings by convention.
    pub name: String,
    /// Parent node; `None` for the root.
    pub parent: Option<NodeId>,
    /// Classification tag.
    pub tag: String,
    /// Collision/query layer.
    pub layer: LayerId,
    /// `true` when tag/layer were set explicitly instead of inherited.
    pub tag_overridden: bool,
    /// Rendered geometry.
    pub geometry: Option<MeshRef>,
    /// Mesh collider.
    pub collider: Option<ColliderPolicy>,
    /// Mesh renderer.
    pub renderer: Option<RendererPolicy>,
    /// Children in creation order.
    pub children: Vec<NodeId>,
    /// LOD group (roots only).
    pub lod_group: Option<LodGroup>,
    /// Harvest metadata (roots only).
    pub resource: Option<ResourceDrop>,
    /// Foliage animation marker (roots only).
    pub foliage: Option<FoliageMarker>,
}

// ---------------------------------------------------------------------------
// NodeTree
// ---------------------------------------------------------------------------

/// Arena of nodes; index 0 is the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Create a tree from its root.
    pub fn new(root: NodeBuilder) -> Self {
        Self {
            nodes: vec![root.build(NodeId::ROOT, None)],
        }
    }

    /// Append a child under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeBuilder) -> NodeId {
        let id = NodeId(self.nodes.len());
        let node = child.build(id, Some(&self.nodes[parent.0]));
        self.nodes[parent.0].children.push(id);
        self.nodes.push(node);
        id
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Mutable root, for attaching group metadata.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.nodes[0]
    }

    /// Node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Children of `id`, in creation order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|c| self.get(*c))
    }

    /// All nodes, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Returns `true` if every node that did not override its tag/layer
    /// carries its parent's.
    pub fn tags_inherited(&self) -> bool {
        self.nodes.iter().all(|node| match node.parent {
            Some(parent) if !node.tag_overridden => self
                .get(parent)
                .is_some_and(|p| p.tag == node.tag && p.layer == node.layer),
            _ => true,
        })
    }
}
