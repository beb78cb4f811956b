//! Core material types: [`MaterialDef`], [`MaterialRef`] and the asset handles
//! materials are built from.

use glam::Vec4;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Path of an imported texture asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureRef(pub String);

/// Name of a shader known to the [`crate::ShaderRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaderRef(pub String);

/// Path of a physics (friction/bounce) material asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicsMaterialRef(pub String);

/// A material a renderer can use: either an existing asset or one generated
/// alongside the template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MaterialRef {
    /// Path of an existing material asset.
    Asset(String),
    /// Material defined inline in the template.
    Inline(MaterialDef),
}

impl MaterialRef {
    /// The inline definition, if this material was generated.
    pub fn as_inline(&self) -> Option<&MaterialDef> {
        match self {
            Self::Inline(def) => Some(def),
            Self::Asset(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MaterialDef
// ---------------------------------------------------------------------------

/// Generated material definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Human-readable name (e.g., "Leaves_Material").
    pub name: String,

    /// Shader the material renders with.
    pub shader: ShaderRef,

    /// Base color in linear RGBA.
    pub albedo: [f32; 4],

    /// Main texture, if any.
    pub main_texture: Option<TextureRef>,

    /// Alpha-test cutoff. `None` disables alpha testing.
    pub alpha_cutoff: Option<f32>,

    /// Wind sway parameters: x = strength, y = speed, z = turbulence, w unused.
    pub wind_sway: Option<Vec4>,

    /// Offset added to the transparent render queue.
    pub queue_offset: i32,
}

impl MaterialDef {
    /// Opaque, untextured material with the given color.
    pub fn flat(name: impl Into<String>, shader: ShaderRef, albedo: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            shader,
            albedo,
            main_texture: None,
            alpha_cutoff: None,
            wind_sway: None,
            queue_offset: 0,
        }
    }

    /// Returns `true` if the material carries foliage animation parameters.
    pub fn is_foliage(&self) -> bool {
        self.wind_sway.is_some()
    }
}
