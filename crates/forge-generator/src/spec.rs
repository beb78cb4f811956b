//! [`ObjectSpec`]: the fully-populated input of one generation run, and its
//! per-category validation.

use std::fmt;

use forge_lod::{LodConfig, LodDistances, LodMode, LodProfile};
use forge_materials::{MaterialRef, PhysicsMaterialRef, TextureRef};
use forge_scene::MeshRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preset thresholds shared by every size class, in percent.
const PRESET_THRESHOLDS: &[f32] = &[1.0];

// ---------------------------------------------------------------------------
// Category / SizeClass
// ---------------------------------------------------------------------------

/// Structural object kind. Each has a fixed node-tree shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Plain object: nav proxy, LOD'd object, optional skybox variant.
    #[default]
    Standard,
    /// Harvestable resource with metal and stump meshes.
    Resource,
    /// Tree with trunk, leaves and stump.
    Tree,
    /// One or more bush models sharing a foliage material.
    Bush,
}

impl Category {
    /// Name used in tags, layers and artifact names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Resource => "Resource",
            Self::Tree => "Tree",
            Self::Bush => "Bush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Size of a standard object. Selects folder, tag and LOD defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    /// Props: short culling and shadow distances.
    Small,
    /// Default size.
    #[default]
    Medium,
    /// Buildings and landmarks.
    Large,
}

impl SizeClass {
    /// Name used as tag and layer of standard objects.
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    /// Preset table and default distances for this size.
    pub fn lod_profile(self) -> LodProfile {
        let (default_culling, default_shadow) = match self {
            Self::Small => (50.0, 25.0),
            Self::Medium => (100.0, 50.0),
            Self::Large => (200.0, 100.0),
        };
        LodProfile {
            preset: PRESET_THRESHOLDS,
            default_culling,
            default_shadow,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// LOD settings of a standard object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodSettings {
    /// Use the size class preset (scaled by `bias`) instead of `transitions`.
    pub use_preset: bool,
    /// Preset multiplier in `[0.1, 2.0]`.
    pub bias: f32,
    /// Custom transition thresholds in percent of screen height.
    pub transitions: Vec<f32>,
    /// Use `culling_distance`/`shadow_distance` instead of the size defaults.
    pub custom_distances: bool,
    /// Custom culling radius.
    pub culling_distance: f32,
    /// Custom shadow distance.
    pub shadow_distance: f32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            use_preset: true,
            bias: 1.0,
            transitions: vec![10.0],
            custom_distances: false,
            culling_distance: 100.0,
            shadow_distance: 50.0,
        }
    }
}

/// An additional trunk + leaves model of a tree. Either both or neither.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeModelPair {
    /// Trunk mesh.
    pub trunk: Option<MeshRef>,
    /// Leaves mesh.
    pub leaves: Option<MeshRef>,
}

/// Everything needed to generate one object. Which fields are required
/// depends on `category`; see [`ObjectSpec::validate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSpec {
    /// Structural kind.
    pub category: Category,
    /// Size of standard objects.
    pub size: SizeClass,
    /// Object name; when non-empty, templates go to a subfolder of this name.
    pub name: String,

    /// Primary mesh (Standard, Resource).
    pub main_mesh: Option<MeshRef>,
    /// Metal deposit mesh (Resource).
    pub metal_mesh: Option<MeshRef>,
    /// Stump mesh (Resource, Tree).
    pub stump_mesh: Option<MeshRef>,
    /// Skybox variant mesh; the main mesh is used when absent (Standard).
    pub skybox_mesh: Option<MeshRef>,
    /// Lower-detail meshes for LOD bands 1.. (Standard).
    pub child_meshes: Vec<Option<MeshRef>>,
    /// Trunk mesh (Tree).
    pub trunk_mesh: Option<MeshRef>,
    /// Leaves mesh (Tree).
    pub leaves_mesh: Option<MeshRef>,
    /// Extra trunk + leaves models (Tree).
    pub additional_models: Vec<TreeModelPair>,
    /// Bush models in order; `None` entries are skipped (Bush).
    pub bush_models: Vec<Option<MeshRef>>,
    /// Forage mesh; the first bush model is used when absent (Bush).
    pub forage_mesh: Option<MeshRef>,

    /// Material of standard objects and resources.
    pub main_material: Option<MaterialRef>,
    /// Physics material of the object collider.
    pub physics_material: Option<PhysicsMaterialRef>,
    /// Bark texture (Tree).
    pub trunk_texture: Option<TextureRef>,
    /// Leaves texture (Tree).
    pub leaves_texture: Option<TextureRef>,
    /// Bush texture (Bush). A flat fallback is used when absent.
    pub bush_texture: Option<TextureRef>,

    /// Also generate the skybox variant (Standard).
    pub create_skybox: bool,
    /// Configure LOD bands from `lod` instead of the single default band.
    pub configure_lod: bool,
    /// Add a forage node (Bush).
    pub has_forage: bool,
    /// LOD settings (Standard).
    pub lod: LodSettings,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Why a spec was refused before any node was built.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A field the category needs is unset.
    #[error("{category} objects require `{field}`")]
    MissingField {
        /// Selected category.
        category: Category,
        /// Missing field.
        field: &'static str,
    },

    /// An additional tree model has only one of its two meshes.
    #[error("additional tree model {index} has a {present} mesh but no {missing} mesh")]
    IncompletePair {
        /// Position in `additional_models`.
        index: usize,
        /// The mesh that is set.
        present: &'static str,
        /// The mesh that is not.
        missing: &'static str,
    },

    /// A custom LOD transition is not a positive finite percentage.
    #[error("LOD transition {index} must be a positive percentage, got {value}")]
    InvalidTransition {
        /// Position in `lod.transitions`.
        index: usize,
        /// Offending value.
        value: f32,
    },

    /// A LOD bias or custom distance is unusable.
    #[error("LOD setting `{field}` must be a positive finite number, got {value}")]
    InvalidLodSetting {
        /// Field of `lod`.
        field: &'static str,
        /// Offending value.
        value: f32,
    },

    /// The name would escape the category folder.
    #[error("object name {0:?} must be a single folder name")]
    InvalidName(String),
}

impl ObjectSpec {
    /// Check the category's required-field set.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_name()?;
        match self.category {
            Category::Standard => {
                self.require(self.main_mesh.is_some(), "main_mesh")?;
                self.require(self.main_material.is_some(), "main_material")?;
                self.validate_lod()
            }
            Category::Resource => {
                self.require(self.main_mesh.is_some(), "main_mesh")?;
                self.require(self.metal_mesh.is_some(), "metal_mesh")?;
                self.require(self.stump_mesh.is_some(), "stump_mesh")?;
                self.require(self.main_material.is_some(), "main_material")
            }
            Category::Tree => {
                self.require(self.trunk_mesh.is_some(), "trunk_mesh")?;
                self.require(self.leaves_mesh.is_some(), "leaves_mesh")?;
                self.require(self.stump_mesh.is_some(), "stump_mesh")?;
                self.require(self.trunk_texture.is_some(), "trunk_texture")?;
                self.require(self.leaves_texture.is_some(), "leaves_texture")?;
                self.validate_pairs()
            }
            Category::Bush => {
                self.require(self.bush_models.iter().any(Option::is_some), "bush_models")?;
                self.require(self.physics_material.is_some(), "physics_material")
            }
        }
    }

    /// `true` when [`validate`](Self::validate) succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Tag and layer name of the main object.
    pub fn object_tag(&self) -> &'static str {
        match self.category {
            Category::Standard => self.size.label(),
            other => other.label(),
        }
    }

    /// Planner input for a standard object.
    ///
    /// Custom distances only apply to custom (non-preset) LOD configurations.
    pub fn lod_config(&self) -> LodConfig {
        if !self.configure_lod {
            return LodConfig::fixed();
        }
        if self.lod.use_preset {
            return LodConfig {
                mode: LodMode::Preset {
                    bias: self.lod.bias,
                },
                custom_distances: None,
            };
        }
        LodConfig {
            mode: LodMode::Custom {
                transitions: self.lod.transitions.clone(),
            },
            custom_distances: self.lod.custom_distances.then_some(LodDistances {
                culling: self.lod.culling_distance,
                shadow: self.lod.shadow_distance,
            }),
        }
    }

    fn require(&self, present: bool, field: &'static str) -> Result<(), ValidationError> {
        if present {
            Ok(())
        } else {
            Err(ValidationError::MissingField {
                category: self.category,
                field,
            })
        }
    }

    fn validate_name(&self) -> Result<(), ValidationError> {
        let name = self.name.as_str();
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ValidationError::InvalidName(self.name.clone()));
        }
        Ok(())
    }

    fn validate_pairs(&self) -> Result<(), ValidationError> {
        for (index, pair) in self.additional_models.iter().enumerate() {
            match (&pair.trunk, &pair.leaves) {
                (Some(_), None) => {
                    return Err(ValidationError::IncompletePair {
                        index,
                        present: "trunk",
                        missing: "leaves",
                    });
                }
                (None, Some(_)) => {
                    return Err(ValidationError::IncompletePair {
                        index,
                        present: "leaves",
                        missing: "trunk",
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate_lod(&self) -> Result<(), ValidationError> {
        if !self.configure_lod {
            return Ok(());
        }
        let lod = &self.lod;
        if lod.use_preset {
            return check_lod_setting("bias", lod.bias);
        }
        if lod.custom_distances {
            check_lod_setting("culling_distance", lod.culling_distance)?;
            check_lod_setting("shadow_distance", lod.shadow_distance)?;
        }
        match self
            .lod
            .transitions
            .iter()
            .enumerate()
            .find(|(_, t)| !t.is_finite() || **t <= 0.0)
        {
            Some((index, &value)) => Err(ValidationError::InvalidTransition { index, value }),
            None => Ok(()),
        }
    }
}

fn check_lod_setting(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidLodSetting { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(name: &str) -> Option<MeshRef> {
        Some(MeshRef(name.to_string()))
    }

    fn texture(name: &str) -> Option<TextureRef> {
        Some(TextureRef(name.to_string()))
    }

    fn standard() -> ObjectSpec {
        ObjectSpec {
            main_mesh: mesh("crate"),
            main_material: Some(MaterialRef::Asset("Crate.mat".to_string())),
            ..Default::default()
        }
    }

    fn tree() -> ObjectSpec {
        ObjectSpec {
            category: Category::Tree,
            trunk_mesh: mesh("oak_trunk"),
            leaves_mesh: mesh("oak_leaves"),
            stump_mesh: mesh("oak_stump"),
            trunk_texture: texture("bark.png"),
            leaves_texture: texture("leaves.png"),
            ..Default::default()
        }
    }

    #[test]
    fn test_standard_requires_mesh_and_material() {
        assert!(standard().is_valid());
        let no_material = ObjectSpec {
            main_material: None,
            ..standard()
        };
        assert_eq!(
            no_material.validate(),
            Err(ValidationError::MissingField {
                category: Category::Standard,
                field: "main_material"
            })
        );
    }

    #[test]
    fn test_resource_requires_all_three_meshes() {
        let full = ObjectSpec {
            category: Category::Resource,
            metal_mesh: mesh("iron"),
            stump_mesh: mesh("rock_stump"),
            ..standard()
        };
        assert!(full.is_valid());
        for field in ["main_mesh", "metal_mesh", "stump_mesh"] {
            let mut spec = full.clone();
            match field {
                "main_mesh" => spec.main_mesh = None,
                "metal_mesh" => spec.metal_mesh = None,
                _ => spec.stump_mesh = None,
            }
            assert!(!spec.is_valid(), "{field} should be required");
        }
    }

    #[test]
    fn test_tree_requires_both_textures() {
        assert!(tree().is_valid());
        let spec = ObjectSpec {
            leaves_texture: None,
            ..tree()
        };
        assert!(!spec.is_valid());
    }

    #[test]
    fn test_partial_additional_pairs_are_invalid() {
        let trunk_only = ObjectSpec {
            additional_models: vec![TreeModelPair {
                trunk: mesh("t1"),
                leaves: None,
            }],
            ..tree()
        };
        assert_eq!(
            trunk_only.validate(),
            Err(ValidationError::IncompletePair {
                index: 0,
                present: "trunk",
                missing: "leaves"
            })
        );

        let leaves_only = ObjectSpec {
            additional_models: vec![TreeModelPair {
                trunk: None,
                leaves: mesh("l1"),
            }],
            ..tree()
        };
        assert!(!leaves_only.is_valid());
    }

    #[test]
    fn test_complete_or_empty_pairs_are_valid() {
        let spec = ObjectSpec {
            additional_models: vec![
                TreeModelPair {
                    trunk: mesh("t1"),
                    leaves: mesh("l1"),
                },
                TreeModelPair::default(),
            ],
            ..tree()
        };
        assert!(spec.is_valid());
    }

    #[test]
    fn test_bush_requires_a_model_and_physics_material() {
        let spec = ObjectSpec {
            category: Category::Bush,
            bush_models: vec![None, None],
            physics_material: Some(PhysicsMaterialRef("Leaves.physic".to_string())),
            ..Default::default()
        };
        assert!(!spec.is_valid());

        let with_model = ObjectSpec {
            bush_models: vec![None, mesh("bush_a")],
            ..spec.clone()
        };
        assert!(with_model.is_valid());

        let no_physics = ObjectSpec {
            physics_material: None,
            ..with_model
        };
        assert!(!no_physics.is_valid());
    }

    #[test]
    fn test_custom_transitions_must_be_positive() {
        let mut spec = standard();
        spec.configure_lod = true;
        spec.lod.use_preset = false;
        spec.lod.transitions = vec![20.0, -1.0];
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::InvalidTransition { index: 1, .. })
        ));

        // Ignored while the preset is in use.
        spec.lod.use_preset = true;
        assert!(spec.is_valid());
    }

    #[test]
    fn test_non_finite_bias_is_invalid() {
        let spec: ObjectSpec = ron::from_str(
            r#"(
                main_mesh: Some("m"),
                main_material: Some(Asset("M.mat")),
                configure_lod: true,
                lod: (use_preset: true, bias: NaN),
            )"#,
        )
        .unwrap();
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::InvalidLodSetting { field: "bias", .. })
        ));

        // Ignored while LOD is not configured.
        let spec = ObjectSpec {
            configure_lod: false,
            ..spec
        };
        assert!(spec.is_valid());
    }

    #[test]
    fn test_custom_distances_must_be_positive_and_finite() {
        let mut spec = standard();
        spec.configure_lod = true;
        spec.lod.use_preset = false;
        spec.lod.custom_distances = true;
        spec.lod.shadow_distance = f32::INFINITY;
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::InvalidLodSetting {
                field: "shadow_distance",
                ..
            })
        ));

        spec.lod.shadow_distance = 50.0;
        spec.lod.culling_distance = -5.0;
        assert_eq!(
            spec.validate(),
            Err(ValidationError::InvalidLodSetting {
                field: "culling_distance",
                value: -5.0
            })
        );

        // Unused distances are not checked.
        spec.lod.custom_distances = false;
        assert!(spec.is_valid());
    }

    #[test]
    fn test_name_must_not_escape_folder() {
        for name in ["..", "a/b", "a\\b"] {
            let spec = ObjectSpec {
                name: name.to_string(),
                ..standard()
            };
            assert!(matches!(spec.validate(), Err(ValidationError::InvalidName(_))));
        }
    }

    #[test]
    fn test_lod_config_modes() {
        let mut spec = standard();
        assert_eq!(spec.lod_config(), LodConfig::fixed());

        spec.configure_lod = true;
        assert!(matches!(spec.lod_config().mode, LodMode::Preset { .. }));

        spec.lod.use_preset = false;
        spec.lod.custom_distances = true;
        spec.lod.culling_distance = 300.0;
        let config = spec.lod_config();
        assert!(matches!(config.mode, LodMode::Custom { .. }));
        assert_eq!(config.custom_distances.map(|d| d.culling), Some(300.0));
    }

    #[test]
    fn test_size_class_profiles() {
        assert_eq!(SizeClass::Small.lod_profile().default_culling, 50.0);
        assert_eq!(SizeClass::Medium.lod_profile().default_shadow, 50.0);
        assert_eq!(SizeClass::Large.lod_profile().default_culling, 200.0);
    }

    #[test]
    fn test_object_tag() {
        let spec = ObjectSpec {
            size: SizeClass::Large,
            ..standard()
        };
        assert_eq!(spec.object_tag(), "Large");
        assert_eq!(tree().object_tag(), "Tree");
    }

    #[test]
    fn test_spec_from_terse_ron() {
        let spec: ObjectSpec = ron::from_str(
            r#"(
                category: Resource,
                name: "IronRock",
                main_mesh: Some("Meshes/rock.fbx"),
                metal_mesh: Some("Meshes/iron.fbx"),
                stump_mesh: Some("Meshes/rock_stump.fbx"),
                main_material: Some(Asset("Materials/Rock.mat")),
            )"#,
        )
        .unwrap();
        assert_eq!(spec.category, Category::Resource);
        assert_eq!(spec.metal_mesh, mesh("Meshes/iron.fbx"));
        assert!(spec.is_valid());
    }
}
