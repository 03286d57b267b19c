//! Data-driven game balance
//!
//! Values a host may override from JSON without recompiling. Anything missing
//! from the document keeps its default.

use serde::{Deserialize, Serialize};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    /// Canvas width in world units
    pub canvas_width: f32,
    /// Canvas height in world units
    pub canvas_height: f32,

    // === Player ===
    /// Collision radius of the player
    pub player_radius: f32,
    /// Nominal player speed (pointer snapping ignores it, kept for HUD/AI hosts)
    pub player_speed: f32,

    // === Parry ===
    /// Shield radius before size upgrades
    pub parry_radius: f32,
    /// Shield duration before duration upgrades (ms)
    pub parry_duration_ms: f32,
    /// Cooldown armed on activation before cooldown upgrades (ms)
    pub parry_cooldown_ms: f32,

    // === Flow ===
    /// Time the arena stays live after a wave clears, before upgrade selection (ms)
    pub clear_linger_ms: f64,

    // === Cosmetics ===
    /// Particle cap (oldest evicted first)
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,

            player_radius: 12.0,
            player_speed: 200.0,

            parry_radius: 40.0,
            parry_duration_ms: 250.0,
            parry_cooldown_ms: 500.0,

            clear_linger_ms: 1500.0,

            max_particles: 512,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Invalid tuning document ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Load tuning from a file (native only); missing file means defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded tuning from {}", path.display());
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Canvas centre, where a fresh player spawns
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }
}
