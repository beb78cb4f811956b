//! [`LodBand`] and [`LodPlan`]: the output of the planner.
//!
//! Both are generic over the renderer handle so the same plan can first be
//! expressed in terms of geometry and later re-keyed to the nodes that render
//! that geometry.

use serde::{Deserialize, Serialize};

/// How the runtime blends between adjacent bands. Generated groups always
/// switch hard at the threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeMode {
    /// Hard switch at the threshold.
    #[default]
    None,
}

/// One distance band: the renderers visible while the object covers at least
/// `threshold_percent` of the screen height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodBand<R> {
    /// Screen-height percentage in `(0, 100]`, or exactly 0 for the culled band.
    pub threshold_percent: f32,
    /// Renderers active in this band. May be empty.
    pub renderers: Vec<R>,
    /// Whether renderers in this band cast shadows.
    pub casts_shadow: bool,
    /// Whether renderers in this band receive shadows.
    pub receives_shadow: bool,
}

impl<R> LodBand<R> {
    /// The culled band: beyond every configured distance nothing is drawn.
    pub fn terminal() -> Self {
        Self {
            threshold_percent: 0.0,
            renderers: Vec::new(),
            casts_shadow: false,
            receives_shadow: false,
        }
    }

    /// Returns `true` for the synthetic culled band.
    pub fn is_terminal(&self) -> bool {
        self.threshold_percent == 0.0 && self.renderers.is_empty()
    }

    /// Re-key the band's renderers.
    pub fn map_renderers<T>(self, f: impl FnMut(R) -> T) -> LodBand<T> {
        LodBand {
            threshold_percent: self.threshold_percent,
            renderers: self.renderers.into_iter().map(f).collect(),
            casts_shadow: self.casts_shadow,
            receives_shadow: self.receives_shadow,
        }
    }
}

/// A finished set of bands, largest threshold first.
///
/// Immutable once built; [`LodPlan::map_renderers`] consumes the plan and
/// produces a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodPlan<R> {
    bands: Vec<LodBand<R>>,
    size: f32,
    shadow_distance: f32,
    fade_mode: FadeMode,
}

impl<R> LodPlan<R> {
    pub(crate) fn new(bands: Vec<LodBand<R>>, size: f32, shadow_distance: f32) -> Self {
        Self {
            bands,
            size,
            shadow_distance,
            fade_mode: FadeMode::None,
        }
    }

    /// A single shadowed band with no culled band after it.
    ///
    /// Used for fixed groups whose renderers stay visible until the object
    /// falls below `threshold_percent` of the screen.
    pub fn fixed(
        threshold_percent: f32,
        renderers: Vec<R>,
        size: f32,
        shadow_distance: f32,
    ) -> Self {
        let band = LodBand {
            threshold_percent,
            renderers,
            casts_shadow: true,
            receives_shadow: true,
        };
        Self::new(vec![band], size, shadow_distance)
    }

    /// Every band, including the culled band when present.
    pub fn bands(&self) -> &[LodBand<R>] {
        &self.bands
    }

    /// Bands that draw something, i.e. all bands except a trailing culled band.
    pub fn visible_bands(&self) -> &[LodBand<R>] {
        match self.bands.split_last() {
            Some((last, rest)) if last.is_terminal() => rest,
            _ => &self.bands,
        }
    }

    /// Culling radius of the group.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Distance beyond which the group's renderers stop casting shadows.
    pub fn shadow_distance(&self) -> f32 {
        self.shadow_distance
    }

    /// Band blending mode.
    pub fn fade_mode(&self) -> FadeMode {
        self.fade_mode
    }

    /// Re-key every band's renderers. `f` receives the band index.
    pub fn map_renderers<T>(self, mut f: impl FnMut(usize, R) -> T) -> LodPlan<T> {
        let bands = self
            .bands
            .into_iter()
            .enumerate()
            .map(|(i, band)| band.map_renderers(|r| f(i, r)))
            .collect();
        LodPlan {
            bands,
            size: self.size,
            shadow_distance: self.shadow_distance,
            fade_mode: self.fade_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_band_is_empty_and_unshadowed() {
        let band = LodBand::<u32>::terminal();
        assert!(band.is_terminal());
        assert_eq!(band.threshold_percent, 0.0);
        assert!(!band.casts_shadow);
        assert!(!band.receives_shadow);
    }

    #[test]
    fn test_fixed_plan_has_no_terminal_band() {
        let plan = LodPlan::fixed(1.0, vec!["a", "b"], 100.0, 50.0);
        assert_eq!(plan.bands().len(), 1);
        assert_eq!(plan.visible_bands().len(), 1);
        assert!(plan.bands()[0].casts_shadow);
        assert_eq!(plan.fade_mode(), FadeMode::None);
    }

    #[test]
    fn test_visible_bands_drop_terminal() {
        let bands = vec![
            LodBand {
                threshold_percent: 10.0,
                renderers: vec![0u32],
                casts_shadow: true,
                receives_shadow: true,
            },
            LodBand::terminal(),
        ];
        let plan = LodPlan::new(bands, 100.0, 50.0);
        assert_eq!(plan.bands().len(), 2);
        assert_eq!(plan.visible_bands().len(), 1);
    }

    #[test]
    fn test_map_renderers_passes_band_index() {
        let plan = LodPlan::new(
            vec![
                LodBand {
                    threshold_percent: 50.0,
                    renderers: vec!["lod0"],
                    casts_shadow: true,
                    receives_shadow: true,
                },
                LodBand {
                    threshold_percent: 5.0,
                    renderers: vec!["lod1"],
                    casts_shadow: true,
                    receives_shadow: true,
                },
                LodBand::terminal(),
            ],
            200.0,
            100.0,
        );
        let mapped = plan.map_renderers(|i, name| format!("{name}@{i}"));
        assert_eq!(mapped.bands()[0].renderers, vec!["lod0@0".to_string()]);
        assert_eq!(mapped.bands()[1].renderers, vec!["lod1@1".to_string()]);
        assert!(mapped.bands()[2].is_terminal());
        assert_eq!(mapped.size(), 200.0);
        assert_eq!(mapped.shadow_distance(), 100.0);
    }
}
