//! Band derivation: preset or custom transition thresholds to a [`LodPlan`].

use thiserror::Error;
use tracing::debug;

use crate::band::{LodBand, LodPlan};

/// Smallest legal band threshold, in percent of screen height.
pub const MIN_THRESHOLD_PERCENT: f32 = 0.01;
/// Largest legal band threshold, in percent of screen height.
pub const MAX_THRESHOLD_PERCENT: f32 = 100.0;
/// Threshold of the single band used when LOD is not configured.
pub const DEFAULT_NEAR_THRESHOLD: f32 = 10.0;
/// Threshold of fixed single-band groups (resources, stumps).
pub const VERY_NEAR_THRESHOLD: f32 = 1.0;
/// Bands with an index up to and including this one cast and receive shadows.
pub const SHADOWED_BAND_LIMIT: usize = 2;
/// Lower bound of the preset bias.
pub const MIN_LOD_BIAS: f32 = 0.1;
/// Upper bound of the preset bias.
pub const MAX_LOD_BIAS: f32 = 2.0;

/// Seed used when a custom transition list is empty.
const SEED_TRANSITION: f32 = 1.0;

/// Errors returned by [`plan`].
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    /// No primary geometry to put in the first band.
    #[error("no primary geometry for the first LOD band")]
    NoGeometry,

    /// A custom threshold is NaN or infinite.
    #[error("LOD transition {index} is not a finite number: {value}")]
    InvalidThreshold {
        /// Position in the caller-supplied list.
        index: usize,
        /// The offending value.
        value: f32,
    },

    /// The preset bias is NaN or infinite.
    #[error("LOD bias is not a finite number: {0}")]
    InvalidBias(f32),

    /// A custom culling or shadow distance is not a positive finite number.
    #[error("{name} distance must be positive, got {value}")]
    InvalidDistance {
        /// `"culling"` or `"shadow"`.
        name: &'static str,
        /// The offending value.
        value: f32,
    },
}

/// Where band thresholds come from.
#[derive(Clone, Debug, PartialEq)]
pub enum LodMode {
    /// LOD not configured: one band at [`DEFAULT_NEAR_THRESHOLD`].
    Fixed,
    /// The profile's preset table, scaled by `bias`.
    Preset {
        /// Multiplier applied to each preset threshold. Clamped to
        /// `[MIN_LOD_BIAS, MAX_LOD_BIAS]`.
        bias: f32,
    },
    /// Caller-supplied thresholds in percent, in any order.
    Custom {
        /// Transition thresholds.
        transitions: Vec<f32>,
    },
}

/// Explicit culling and shadow distances overriding the profile defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodDistances {
    /// Culling radius.
    pub culling: f32,
    /// Shadow distance.
    pub shadow: f32,
}

/// Per-category planning defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodProfile {
    /// Preset thresholds in percent.
    pub preset: &'static [f32],
    /// Culling radius when no custom distances are given.
    pub default_culling: f32,
    /// Shadow distance when no custom distances are given.
    pub default_shadow: f32,
}

/// Planner input.
#[derive(Clone, Debug, PartialEq)]
pub struct LodConfig {
    /// Threshold source.
    pub mode: LodMode,
    /// Custom distances, if enabled.
    pub custom_distances: Option<LodDistances>,
}

impl LodConfig {
    /// LOD not configured, profile distances.
    pub fn fixed() -> Self {
        Self {
            mode: LodMode::Fixed,
            custom_distances: None,
        }
    }
}

/// Build the band list for one LOD group.
///
/// Thresholds are sorted largest first (stable, so equal thresholds keep
/// their input order). Band 0 renders `primary`; band `i >= 1` renders
/// `children[i - 1]` when that slot is present and is left empty otherwise.
/// A culled band with threshold 0 is always appended.
///
/// # Errors
///
/// Returns [`PlanError::NoGeometry`] if `primary` is `None`,
/// [`PlanError::InvalidThreshold`] for non-finite custom thresholds,
/// [`PlanError::InvalidBias`] for a non-finite preset bias and
/// [`PlanError::InvalidDistance`] for unusable custom distances.
pub fn plan<G: Clone>(
    config: &LodConfig,
    profile: &LodProfile,
    primary: Option<&G>,
    children: &[Option<G>],
) -> Result<LodPlan<G>, PlanError> {
    let primary = primary.ok_or(PlanError::NoGeometry)?;
    let thresholds = resolve_thresholds(&config.mode, profile)?;

    let mut bands: Vec<LodBand<G>> = thresholds
        .iter()
        .enumerate()
        .map(|(i, &threshold_percent)| {
            let renderers = if i == 0 {
                vec![primary.clone()]
            } else {
                children
                    .get(i - 1)
                    .and_then(Option::as_ref)
                    .cloned()
                    .into_iter()
                    .collect()
            };
            let shadowed = i <= SHADOWED_BAND_LIMIT;
            LodBand {
                threshold_percent,
                renderers,
                casts_shadow: shadowed,
                receives_shadow: shadowed,
            }
        })
        .collect();
    bands.push(LodBand::terminal());

    let (size, shadow_distance) = match config.custom_distances {
        Some(d) => (
            checked_distance("culling", d.culling)?,
            checked_distance("shadow", d.shadow)?,
        ),
        None => (profile.default_culling, profile.default_shadow),
    };

    debug!(
        bands = bands.len(),
        size, shadow_distance, "planned LOD bands: {thresholds:?}"
    );

    Ok(LodPlan::new(bands, size, shadow_distance))
}

/// Next threshold to offer when a new custom level is appended after `last`.
pub fn suggest_next_threshold(last: f32) -> f32 {
    (last / 2.0).max(MIN_THRESHOLD_PERCENT)
}

fn resolve_thresholds(mode: &LodMode, profile: &LodProfile) -> Result<Vec<f32>, PlanError> {
    let mut thresholds = match mode {
        LodMode::Fixed => vec![DEFAULT_NEAR_THRESHOLD],
        LodMode::Preset { bias } => {
            if !bias.is_finite() {
                return Err(PlanError::InvalidBias(*bias));
            }
            let bias = bias.clamp(MIN_LOD_BIAS, MAX_LOD_BIAS);
            let scaled: Vec<f32> = profile
                .preset
                .iter()
                .map(|t| clamp_threshold(t * bias))
                .collect();
            if scaled.is_empty() {
                vec![clamp_threshold(SEED_TRANSITION * bias)]
            } else {
                scaled
            }
        }
        LodMode::Custom { transitions } => {
            if transitions.is_empty() {
                vec![SEED_TRANSITION]
            } else {
                transitions
                    .iter()
                    .enumerate()
                    .map(|(index, &value)| {
                        if value.is_finite() {
                            Ok(clamp_threshold(value))
                        } else {
                            Err(PlanError::InvalidThreshold { index, value })
                        }
                    })
                    .collect::<Result<_, _>>()?
            }
        }
    };

    // `sort_by` is stable: ties keep their original order.
    thresholds.sort_by(|a, b| b.total_cmp(a));
    Ok(thresholds)
}

fn checked_distance(name: &'static str, value: f32) -> Result<f32, PlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlanError::InvalidDistance { name, value })
    }
}

fn clamp_threshold(t: f32) -> f32 {
    t.clamp(MIN_THRESHOLD_PERCENT, MAX_THRESHOLD_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: LodProfile = LodProfile {
        preset: &[1.0],
        default_culling: 100.0,
        default_shadow: 50.0,
    };

    fn custom(transitions: &[f32]) -> LodConfig {
        LodConfig {
            mode: LodMode::Custom {
                transitions: transitions.to_vec(),
            },
            custom_distances: None,
        }
    }

    fn thresholds<R>(plan: &LodPlan<R>) -> Vec<f32> {
        plan.bands().iter().map(|b| b.threshold_percent).collect()
    }

    #[test]
    fn test_fixed_mode_single_default_band() {
        let plan = plan(&LodConfig::fixed(), &PROFILE, Some(&"main"), &[]).unwrap();
        assert_eq!(plan.visible_bands().len(), 1);
        assert_eq!(plan.bands()[0].threshold_percent, DEFAULT_NEAR_THRESHOLD);
        assert_eq!(plan.bands()[0].renderers, vec!["main"]);
        assert!(plan.bands()[1].is_terminal());
    }

    #[test]
    fn test_custom_thresholds_sorted_descending_regardless_of_input_order() {
        let inputs: [&[f32]; 4] = [
            &[1.0, 50.0, 10.0],
            &[50.0, 10.0, 1.0],
            &[10.0, 1.0, 50.0],
            &[1.0, 10.0, 50.0],
        ];
        for input in inputs {
            let plan = plan(&custom(input), &PROFILE, Some(&0u32), &[]).unwrap();
            assert_eq!(thresholds(&plan), vec![50.0, 10.0, 1.0, 0.0], "input {input:?}");
        }
    }

    #[test]
    fn test_equal_thresholds_are_kept() {
        let plan = plan(&custom(&[5.0, 20.0, 5.0]), &PROFILE, Some(&0u32), &[]).unwrap();
        assert_eq!(thresholds(&plan), vec![20.0, 5.0, 5.0, 0.0]);
    }

    #[test]
    fn test_terminal_band_always_last() {
        for input in [&[][..], &[3.0][..], &[80.0, 40.0, 20.0, 10.0, 5.0][..]] {
            let plan = plan(&custom(input), &PROFILE, Some(&0u32), &[]).unwrap();
            let last = plan.bands().last().unwrap();
            assert!(last.is_terminal());
            assert_eq!(
                plan.bands().iter().filter(|b| b.threshold_percent == 0.0).count(),
                1
            );
        }
    }

    #[test]
    fn test_empty_custom_list_is_seeded() {
        let plan = plan(&custom(&[]), &PROFILE, Some(&0u32), &[]).unwrap();
        assert_eq!(thresholds(&plan), vec![1.0, 0.0]);
    }

    #[test]
    fn test_preset_thresholds_clamped_for_every_bias() {
        const WIDE: LodProfile = LodProfile {
            preset: &[0.001, 0.02, 1.0, 60.0, 99.0, 150.0],
            default_culling: 100.0,
            default_shadow: 50.0,
        };
        for step in 0..=19 {
            let bias = 0.1 + step as f32 * 0.1;
            let config = LodConfig {
                mode: LodMode::Preset { bias },
                custom_distances: None,
            };
            let plan = plan(&config, &WIDE, Some(&0u32), &[]).unwrap();
            for band in plan.visible_bands() {
                assert!(
                    (MIN_THRESHOLD_PERCENT..=MAX_THRESHOLD_PERCENT)
                        .contains(&band.threshold_percent),
                    "bias {bias}: threshold {} out of range",
                    band.threshold_percent
                );
            }
        }
    }

    #[test]
    fn test_preset_scaled_by_bias() {
        let config = LodConfig {
            mode: LodMode::Preset { bias: 1.5 },
            custom_distances: None,
        };
        let plan = plan(&config, &PROFILE, Some(&0u32), &[]).unwrap();
        assert!((plan.bands()[0].threshold_percent - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_bias_is_clamped() {
        let config = LodConfig {
            mode: LodMode::Preset { bias: 10.0 },
            custom_distances: None,
        };
        let plan = plan(&config, &PROFILE, Some(&0u32), &[]).unwrap();
        assert!((plan.bands()[0].threshold_percent - MAX_LOD_BIAS).abs() < 1e-6);
    }

    #[test]
    fn test_custom_thresholds_clamped() {
        let plan = plan(&custom(&[250.0, 0.0001]), &PROFILE, Some(&0u32), &[]).unwrap();
        assert_eq!(
            thresholds(&plan),
            vec![MAX_THRESHOLD_PERCENT, MIN_THRESHOLD_PERCENT, 0.0]
        );
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let result = plan(&custom(&[10.0, f32::NAN]), &PROFILE, Some(&0u32), &[]);
        assert!(matches!(
            result,
            Err(PlanError::InvalidThreshold { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_bias_rejected() {
        for bias in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let config = LodConfig {
                mode: LodMode::Preset { bias },
                custom_distances: None,
            };
            let result = plan(&config, &PROFILE, Some(&0u32), &[]);
            assert!(
                matches!(result, Err(PlanError::InvalidBias(_))),
                "bias {bias}"
            );
        }
    }

    #[test]
    fn test_unusable_custom_distances_rejected() {
        let mut config = custom(&[10.0]);
        config.custom_distances = Some(LodDistances {
            culling: f32::NAN,
            shadow: 50.0,
        });
        assert!(matches!(
            plan(&config, &PROFILE, Some(&0u32), &[]),
            Err(PlanError::InvalidDistance { name: "culling", .. })
        ));

        config.custom_distances = Some(LodDistances {
            culling: 100.0,
            shadow: 0.0,
        });
        assert_eq!(
            plan(&config, &PROFILE, Some(&0u32), &[]),
            Err(PlanError::InvalidDistance {
                name: "shadow",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_missing_primary_is_an_error() {
        let result = plan::<u32>(&LodConfig::fixed(), &PROFILE, None, &[]);
        assert_eq!(result, Err(PlanError::NoGeometry));
    }

    #[test]
    fn test_shadow_policy_by_band_index() {
        let children: Vec<Option<u32>> = (1..=5).map(Some).collect();
        let plan = plan(
            &custom(&[60.0, 40.0, 20.0, 10.0, 5.0, 2.0]),
            &PROFILE,
            Some(&0u32),
            &children,
        )
        .unwrap();
        for (i, band) in plan.visible_bands().iter().enumerate() {
            let expected = i <= SHADOWED_BAND_LIMIT;
            assert_eq!(band.casts_shadow, expected, "band {i}");
            assert_eq!(band.receives_shadow, expected, "band {i}");
        }
    }

    #[test]
    fn test_child_geometry_mapping_with_gaps() {
        let children = vec![Some("lod1"), None];
        let plan = plan(
            &custom(&[30.0, 15.0, 5.0, 1.0]),
            &PROFILE,
            Some(&"lod0"),
            &children,
        )
        .unwrap();
        let renderers: Vec<Vec<&str>> = plan.bands().iter().map(|b| b.renderers.clone()).collect();
        assert_eq!(
            renderers,
            vec![vec!["lod0"], vec!["lod1"], vec![], vec![], vec![]]
        );
    }

    #[test]
    fn test_size_uses_custom_distances_when_enabled() {
        let mut config = custom(&[10.0]);
        let default_plan = plan(&config, &PROFILE, Some(&0u32), &[]).unwrap();
        assert_eq!(default_plan.size(), 100.0);
        assert_eq!(default_plan.shadow_distance(), 50.0);

        config.custom_distances = Some(LodDistances {
            culling: 333.0,
            shadow: 44.0,
        });
        let custom_plan = plan(&config, &PROFILE, Some(&0u32), &[]).unwrap();
        assert_eq!(custom_plan.size(), 333.0);
        assert_eq!(custom_plan.shadow_distance(), 44.0);
    }

    #[test]
    fn test_suggest_next_threshold() {
        assert_eq!(suggest_next_threshold(10.0), 5.0);
        assert_eq!(suggest_next_threshold(0.015), MIN_THRESHOLD_PERCENT);
    }
}
