//! Template node model: named nodes carrying geometry, collision, rendering and
//! LOD metadata, arranged in an arena-backed tree.

mod builder;
mod layers;
mod node;

pub use builder::NodeBuilder;
pub use layers::{LayerCache, LayerId, StaticLayerRegistry, TagLayerRegistry};
pub use node::{
    ColliderPolicy, CookingOptions, FoliageMarker, LodGroup, MeshRef, Node, NodeId, NodeTree,
    RendererPolicy, ResourceDrop,
};
