//! Shader lookup by name.

use rustc_hash::FxHashSet;

use crate::material::ShaderRef;

/// Nullable shader lookup. A missing shader never aborts generation.
pub trait ShaderRegistry {
    /// Find a shader by name.
    fn find(&self, name: &str) -> Option<ShaderRef>;
}

/// Registry over a fixed set of shader names.
#[derive(Clone, Debug, Default)]
pub struct StaticShaderRegistry {
    names: FxHashSet<String>,
}

impl StaticShaderRegistry {
    /// Build a registry from shader names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of registered shaders.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no shaders are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ShaderRegistry for StaticShaderRegistry {
    fn find(&self, name: &str) -> Option<ShaderRef> {
        self.names.get(name).map(|n| ShaderRef(n.clone()))
    }
}
