//! Tag/layer name resolution with a process-lifetime memo cache.

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Numeric collision/query layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub i32);

impl LayerId {
    /// The built-in default layer.
    pub const DEFAULT: LayerId = LayerId(0);
    /// Sentinel for names the registry does not know.
    pub const NONE: LayerId = LayerId(-1);
}

/// Resolves layer names. Unknown names yield [`LayerId::NONE`]; layering
/// never blocks generation.
pub trait TagLayerRegistry {
    /// Layer id for `name`, or [`LayerId::NONE`].
    fn resolve(&self, name: &str) -> LayerId;
}

/// Registry over a fixed name table.
#[derive(Clone, Debug, Default)]
pub struct StaticLayerRegistry {
    layers: FxHashMap<String, LayerId>,
}

impl StaticLayerRegistry {
    /// Build from `(name, id)` pairs.
    pub fn new<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self {
            layers: layers
                .into_iter()
                .map(|(name, id)| (name.into(), LayerId(id)))
                .collect(),
        }
    }
}

impl TagLayerRegistry for StaticLayerRegistry {
    fn resolve(&self, name: &str) -> LayerId {
        match self.layers.get(name) {
            Some(id) => *id,
            None => {
                warn!(layer = name, "unknown layer, using no-layer sentinel");
                LayerId::NONE
            }
        }
    }
}

/// Memoizing wrapper: each name is resolved against the inner registry at
/// most once per cache lifetime. Safe to share between callers.
pub struct LayerCache<R> {
    registry: R,
    cache: DashMap<String, LayerId>,
}

impl<R: TagLayerRegistry> LayerCache<R> {
    /// Wrap a registry.
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            cache: DashMap::new(),
        }
    }

    /// Number of memoized names.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<R: TagLayerRegistry> TagLayerRegistry for LayerCache<R> {
    fn resolve(&self, name: &str) -> LayerId {
        if let Some(id) = self.cache.get(name).map(|entry| *entry) {
            return id;
        }
        let id = self.registry.resolve(name);
        self.cache.insert(name.to_string(), id);
        id
    }
}
