//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the caller, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod pickup;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CombatOutcome, reflect_velocity, resolve_combat};
pub use enemy::{Enemy, EnemyKind, EnemyStats};
pub use pickup::collect_sparks;
pub use snapshot::FrameSnapshot;
pub use state::{GameEvent, GamePhase, GameState, Parry, Particle, Player, Projectile, Spark};
pub use tick::{TickInput, tick};
pub use wave::{WaveState, select_upgrade, skip_upgrade, spawn_wave, wave_composition};
