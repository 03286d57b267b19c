//! Effect coefficients derived from upgrade state
//!
//! Always recomputed from the current levels; nothing here is cached.

use super::{PermanentUpgrades, TemporaryUpgrades};
use crate::consts::*;

/// Combined modifiers for the current run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeEffects {
    pub parry_size_multiplier: f32,
    pub parry_duration_multiplier: f32,
    pub parry_cooldown_multiplier: f32,
    /// Chance that a frame's collected sparks are doubled
    pub double_spark_chance: f64,
    /// Health a fresh run starts with
    pub start_health: u32,
    /// Interval between permanent regen heals (ms), if any
    pub permanent_regen_interval_ms: Option<f32>,
    /// Interval between temporary regen heals (ms), if any
    pub temporary_regen_interval_ms: Option<f32>,
    /// Sparks within this distance are pulled toward the player
    pub magnet_range: f32,
    /// Pull speed (units/s); zero without magnet stacks
    pub magnet_pull_speed: f32,
    /// Pickups dropped per killed enemy
    pub kill_spark_count: u32,
}

impl UpgradeEffects {
    pub fn compute(temporary: &TemporaryUpgrades, permanent: &PermanentUpgrades) -> Self {
        let cooldown = 1.0 - 0.15 * temporary.parry_cooldown as f32;
        let yield_multiplier = 1.0 + permanent.spark_yield as f32 * 1.5;

        Self {
            parry_size_multiplier: 1.0 + 0.05 * temporary.parry_size as f32,
            parry_duration_multiplier: (1.0 + 0.3 * permanent.shield_duration as f32)
                * (1.0 + 0.1 * temporary.parry_duration as f32),
            parry_cooldown_multiplier: cooldown.max(MIN_COOLDOWN_MULTIPLIER),
            double_spark_chance: (0.1 * f64::from(temporary.double_sparks)).min(1.0),
            start_health: BASE_PLAYER_HEALTH
                + (0.75 * permanent.start_health as f32).floor() as u32
                + temporary.extra_health,
            permanent_regen_interval_ms: regen_interval(3000.0, permanent.health_regen),
            temporary_regen_interval_ms: regen_interval(5000.0, temporary.health_regen),
            magnet_range: SPARK_COLLECT_RADIUS
                + MAGNET_RANGE_PER_STACK * temporary.spark_magnet as f32,
            magnet_pull_speed: MAGNET_PULL_PER_STACK * temporary.spark_magnet as f32,
            kill_spark_count: (BASE_KILL_SPARKS as f32 * yield_multiplier).floor() as u32,
        }
    }
}

fn regen_interval(base_ms: f32, level: u32) -> Option<f32> {
    (level > 0).then(|| base_ms / level as f32)
}
