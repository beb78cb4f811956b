//! Material system: material definitions, shader lookup, and fallback resolution
//! for generated foliage and bark materials.

mod fallback;
mod material;
mod shader;

pub use fallback::{
    FALLBACK_BROWN, FALLBACK_GREEN, FOLIAGE_ALPHA_CUTOFF, FOLIAGE_QUEUE_OFFSET, FOLIAGE_WIND_SWAY,
    MaterialFallbackResolver, MaterialKind, MaterialResolver,
};
pub use material::{MaterialDef, MaterialRef, PhysicsMaterialRef, ShaderRef, TextureRef};
pub use shader::{ShaderRegistry, StaticShaderRegistry};
