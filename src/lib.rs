//! Licht-Käfer - simulation core of a parry-and-collect arcade roguelite
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, enemy AI, combat, wave progression)
//! - `upgrades`: Temporary (run) and permanent (meta) upgrade economy
//! - `persistence`: Profile record load/save boundary
//! - `tuning`: Data-driven game balance
//! - `game`: Session surface consumed by menus/HUD

pub mod game;
pub mod persistence;
pub mod sim;
pub mod tuning;
pub mod upgrades;

pub use game::{Game, Screen};
pub use persistence::{MemoryStore, Profile, ProfileStore, StoreError};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Extra slack added to entity radii when testing projectile hits
    pub const HIT_PADDING: f32 = 4.0;
    /// Projectiles further than this outside the canvas are pruned
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 50.0;

    /// Enemy shot speed range (units/s)
    pub const ENEMY_SHOT_SPEED_MIN: f32 = 120.0;
    pub const ENEMY_SHOT_SPEED_MAX: f32 = 180.0;
    /// Enemy shot angular jitter (radians, ±)
    pub const ENEMY_SHOT_JITTER: f32 = 0.1;
    /// Wander targets stay this far from the canvas edge
    pub const WANDER_MARGIN: f32 = 100.0;
    /// Seconds between wander re-targets (uniform in [min, max))
    pub const WANDER_INTERVAL_MIN: f32 = 2.0;
    pub const WANDER_INTERVAL_MAX: f32 = 4.0;
    /// Enemies stop moving when this close to their wander target
    pub const WANDER_ARRIVE_DIST: f32 = 5.0;
    /// Enemies enter from this far outside the canvas
    pub const SPAWN_EDGE_OFFSET: f32 = 50.0;

    /// Reflected projectiles leave the shield this much faster
    pub const REFLECT_SPEED_BOOST: f32 = 1.2;

    /// Spark pickup radius
    pub const SPARK_COLLECT_RADIUS: f32 = 20.0;
    /// Extra magnet reach per magnet stack
    pub const MAGNET_RANGE_PER_STACK: f32 = 15.0;
    /// Magnet pull speed per stack (units/s)
    pub const MAGNET_PULL_PER_STACK: f32 = 100.0;
    /// Pickups dropped by a killed enemy before yield upgrades
    pub const BASE_KILL_SPARKS: u32 = 2;

    /// Score awards
    pub const SCORE_PARRY: u64 = 10;
    pub const SCORE_KILL: u64 = 25;
    pub const SCORE_PER_SPARK: u64 = 5;
    pub const SCORE_WAVE_BONUS: u64 = 50;

    /// Wave sizing
    pub const WAVE_MAX_ENEMIES: u32 = 15;
    pub const SPAWN_INTERVAL_BASE_MS: f64 = 2000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 500.0;

    /// Elite speed growth per generation
    pub const ELITE_SPEED_GROWTH: f32 = 1.3;

    /// Base player health before upgrades
    pub const BASE_PLAYER_HEALTH: u32 = 3;
    /// Parry cooldown can never be reduced below this fraction
    pub const MIN_COOLDOWN_MULTIPLIER: f32 = 0.1;
}

/// RGB colour carried by entities for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const CYAN: Color = Color::from_hex(0x00ffff);
    pub const RED: Color = Color::from_hex(0xff3333);

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Build from hue (degrees), saturation and lightness (percent)
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);
        let h = hue.rem_euclid(360.0) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let to_byte = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }

    /// CSS-style `#rrggbb`
    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let len = delta.length();
    if len > 0.0 && len.is_finite() {
        Some(delta / len)
    } else {
        None
    }
}

/// Check if a point lies inside the canvas extended by `margin` on every side
#[inline]
pub fn in_bounds(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x >= -margin && pos.x <= width + margin && pos.y >= -margin && pos.y <= height + margin
}

/// Unit vector for an angle (radians)
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
