//! Level-of-detail planning: transition thresholds to ordered, shadow-tagged LOD bands.

mod band;
mod planner;

pub use band::{FadeMode, LodBand, LodPlan};
pub use planner::{
    DEFAULT_NEAR_THRESHOLD, LodConfig, LodDistances, LodMode, LodProfile, MAX_LOD_BIAS,
    MAX_THRESHOLD_PERCENT, MIN_LOD_BIAS, MIN_THRESHOLD_PERCENT, PlanError, SHADOWED_BAND_LIMIT,
    VERY_NEAR_THRESHOLD, plan, suggest_next_threshold,
};
