//! Read-only view of a frame for presentation hosts
//!
//! Renderers and UIs never touch `GameState` directly; they receive a
//! `FrameSnapshot` built after the frame has been resolved.

use glam::Vec2;
use serde::Serialize;

use super::state::{GameEvent, GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    pub parry_active: bool,
    pub parry_radius: f32,
    /// 0 when the parry is ready, 1 right after activation
    pub cooldown_fraction: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub color: String,
    pub health: u32,
    pub max_health: u32,
    pub health_fraction: f32,
    pub elite: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileView {
    pub pos: Vec2,
    pub color: String,
    pub from_player: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub color: String,
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SparkView {
    pub pos: Vec2,
    pub pulse: f32,
}

/// Everything needed to draw one frame and its HUD
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub wave: u32,
    pub wave_complete: bool,
    pub score: u64,
    pub run_sparks: u64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub sparks: Vec<SparkView>,
    pub events: Vec<GameEvent>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let full_cooldown = state.tuning.parry_cooldown_ms * state.effects().parry_cooldown_multiplier;
        let cooldown_fraction = if full_cooldown > 0.0 {
            (player.parry.cooldown_remaining_ms / full_cooldown).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            phase: state.phase,
            wave: state.wave.number,
            wave_complete: state.wave.complete,
            score: state.score,
            run_sparks: state.run_sparks,
            player: PlayerView {
                pos: player.pos,
                radius: player.radius,
                health: player.health,
                max_health: player.max_health,
                parry_active: player.parry.active,
                parry_radius: state.effective_parry_radius(),
                cooldown_fraction,
            },
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    size: e.size,
                    color: e.color.to_hex_string(),
                    health: e.health,
                    max_health: e.max_health,
                    health_fraction: e.health as f32 / e.max_health.max(1) as f32,
                    elite: e.is_elite(),
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    color: p.color.to_hex_string(),
                    from_player: p.from_player,
                })
                .collect(),
            particles: state
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: p.size,
                    color: p.color.to_hex_string(),
                    alpha: p.alpha(),
                })
                .collect(),
            sparks: state
                .sparks
                .iter()
                .map(|s| SparkView {
                    pos: s.pos,
                    pulse: s.pulse,
                })
                .collect(),
            events: state.events.clone(),
        }
    }

    /// Serialize for a JS host
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
