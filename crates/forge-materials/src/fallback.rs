//! Material resolution for generated foliage and bark, with flat-colored
//! fallbacks when an artist texture is missing.

use glam::Vec4;
use tracing::{debug, warn};

use crate::material::{MaterialDef, MaterialRef, ShaderRef, TextureRef};
use crate::shader::ShaderRegistry;

/// Alpha-test cutoff of foliage materials.
pub const FOLIAGE_ALPHA_CUTOFF: f32 = 0.5;
/// Wind sway parameters of foliage materials (strength, speed, turbulence, unused).
pub const FOLIAGE_WIND_SWAY: Vec4 = Vec4::new(0.5, 1.0, 0.1, 0.0);
/// Transparent-queue offset of foliage materials.
pub const FOLIAGE_QUEUE_OFFSET: i32 = 10;
/// Flat color substituted for a missing bark texture.
pub const FALLBACK_BROWN: [f32; 4] = [0.40, 0.26, 0.13, 1.0];
/// Flat color substituted for a missing foliage texture.
pub const FALLBACK_GREEN: [f32; 4] = [0.20, 0.55, 0.20, 1.0];

/// Which surface a generated material is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Bark of trunks and stumps.
    Trunk,
    /// Tree leaves.
    Leaves,
    /// Bush foliage.
    Bush,
}

impl MaterialKind {
    /// Leaves and bushes are foliage; trunks are not.
    pub fn is_foliage(self) -> bool {
        matches!(self, Self::Leaves | Self::Bush)
    }

    /// Name prefix of materials generated for this kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trunk => "Trunk",
            Self::Leaves => "Leaves",
            Self::Bush => "Bush",
        }
    }

    /// Flat color used when the texture is missing.
    pub fn fallback_color(self) -> [f32; 4] {
        if self.is_foliage() {
            FALLBACK_GREEN
        } else {
            FALLBACK_BROWN
        }
    }
}

/// Supplies a usable material for a surface kind and optional texture.
pub trait MaterialResolver {
    /// Resolve a material. Never fails: missing inputs yield a fallback.
    fn resolve(&self, kind: MaterialKind, texture: Option<&TextureRef>) -> MaterialRef;
}

/// [`MaterialResolver`] backed by a [`ShaderRegistry`].
pub struct MaterialFallbackResolver<S> {
    shaders: S,
    foliage_shader: String,
    default_shader: String,
}

impl<S: ShaderRegistry> MaterialFallbackResolver<S> {
    /// Create a resolver. `default_shader` is assumed to always exist.
    pub fn new(
        shaders: S,
        foliage_shader: impl Into<String>,
        default_shader: impl Into<String>,
    ) -> Self {
        Self {
            shaders,
            foliage_shader: foliage_shader.into(),
            default_shader: default_shader.into(),
        }
    }

    fn default_shader(&self) -> ShaderRef {
        ShaderRef(self.default_shader.clone())
    }

    fn foliage_shader(&self) -> ShaderRef {
        match self.shaders.find(&self.foliage_shader) {
            Some(shader) => shader,
            None => {
                warn!(
                    shader = %self.foliage_shader,
                    fallback = %self.default_shader,
                    "foliage shader not found, using default shader"
                );
                self.default_shader()
            }
        }
    }

    fn textured(&self, kind: MaterialKind, texture: &TextureRef) -> MaterialDef {
        let name = format!("{}_Material", kind.label());
        if kind.is_foliage() {
            MaterialDef {
                main_texture: Some(texture.clone()),
                alpha_cutoff: Some(FOLIAGE_ALPHA_CUTOFF),
                wind_sway: Some(FOLIAGE_WIND_SWAY),
                queue_offset: FOLIAGE_QUEUE_OFFSET,
                ..MaterialDef::flat(name, self.foliage_shader(), [1.0; 4])
            }
        } else {
            MaterialDef {
                main_texture: Some(texture.clone()),
                ..MaterialDef::flat(name, self.default_shader(), [1.0; 4])
            }
        }
    }
}

impl<S: ShaderRegistry> MaterialResolver for MaterialFallbackResolver<S> {
    fn resolve(&self, kind: MaterialKind, texture: Option<&TextureRef>) -> MaterialRef {
        let def = match texture {
            Some(texture) => {
                debug!(kind = kind.label(), texture = %texture.0, "building textured material");
                self.textured(kind, texture)
            }
            None => {
                warn!(
                    kind = kind.label(),
                    "texture missing, substituting flat-colored fallback material"
                );
                MaterialDef::flat(
                    format!("{}_Fallback", kind.label()),
                    self.default_shader(),
                    kind.fallback_color(),
                )
            }
        };
        MaterialRef::Inline(def)
    }
}
