//! Combat and collision resolution
//!
//! Runs once per frame on post-integration positions. The three passes run in
//! a fixed order and each sees the result of the previous one:
//! 1. shield reflection of enemy shots
//! 2. player-owned shots against enemies
//! 3. remaining enemy shots against the player

use glam::Vec2;

use super::state::{GameEvent, GameState, Projectile, drop_sparks, emit_particles};
use crate::consts::*;
use crate::{Color, direction};

/// Particles per effect burst
const PARRY_PARTICLES: usize = 5;
const ENEMY_HIT_PARTICLES: usize = 6;
const PLAYER_HIT_PARTICLES: usize = 8;

/// Summary of one combat pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatOutcome {
    pub reflected: u32,
    pub kills: u32,
    /// At least one enemy shot reached the player this frame
    pub player_hit: bool,
    /// Player health reached zero this frame
    pub player_died: bool,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a projectile off a shield centred at `center`
///
/// The normal points from the centre to the projectile. The reflected shot is
/// 1.2× faster, player-owned and deals 1 damage. A projectile sitting exactly
/// on the centre has no normal and is left untouched (returns false).
pub fn reflect_off_shield(projectile: &mut Projectile, center: Vec2) -> bool {
    let Some(normal) = direction(center, projectile.pos) else {
        return false;
    };
    let reflected = reflect_velocity(projectile.vel, normal) * REFLECT_SPEED_BOOST;
    if !reflected.is_finite() || reflected == Vec2::ZERO {
        return false;
    }
    projectile.vel = reflected;
    projectile.from_player = true;
    projectile.damage = 1;
    true
}

/// Circle overlap test with strict inequality
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Resolve all projectile interactions for the frame
pub fn resolve_combat(state: &mut GameState) -> CombatOutcome {
    let effects = state.effects();
    let shield_radius = state.player.parry.radius * effects.parry_size_multiplier;
    let cap = state.tuning.max_particles;
    let mut outcome = CombatOutcome::default();

    let GameState {
        player,
        enemies,
        projectiles,
        particles,
        sparks,
        rng,
        score,
        wave,
        events,
        ..
    } = state;

    let mut destroyed = vec![false; projectiles.len()];

    // --- Pass 1: shield reflection ---
    if player.parry.active {
        for projectile in projectiles.iter_mut().filter(|p| !p.from_player) {
            if !within(projectile.pos, player.pos, shield_radius) {
                continue;
            }
            let incoming = projectile.vel;
            if !reflect_off_shield(projectile, player.pos) {
                continue;
            }
            let impact = projectile.pos;
            emit_particles(particles, cap, rng, impact, Color::CYAN, incoming * 0.1, PARRY_PARTICLES);
            drop_sparks(sparks, rng, impact, 1);
            *score += SCORE_PARRY;
            outcome.reflected += 1;
            events.push(GameEvent::ParryReflected { pos: impact });
        }
    }

    // --- Pass 2: player-owned shots against enemies ---
    for (idx, projectile) in projectiles.iter().enumerate() {
        if !projectile.from_player || destroyed[idx] {
            continue;
        }
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.alive && within(projectile.pos, e.pos, e.size + HIT_PADDING))
        else {
            continue;
        };

        destroyed[idx] = true;
        emit_particles(particles, cap, rng, enemy.pos, enemy.color, Vec2::ZERO, ENEMY_HIT_PARTICLES);

        if enemy.take_damage(projectile.damage) {
            wave.enemies_killed += 1;
            *score += SCORE_KILL;
            drop_sparks(sparks, rng, enemy.pos, effects.kill_spark_count);
            outcome.kills += 1;
            events.push(GameEvent::EnemyKilled {
                pos: enemy.pos,
                elite: enemy.is_elite(),
            });
        }
    }
    enemies.retain(|e| e.alive);

    // --- Pass 3: enemy shots against the player ---
    if !player.parry.active {
        let reach = player.radius + HIT_PADDING;
        for (idx, projectile) in projectiles.iter().enumerate() {
            if projectile.from_player || destroyed[idx] {
                continue;
            }
            if within(projectile.pos, player.pos, reach) {
                destroyed[idx] = true;
                outcome.player_hit = true;
                emit_particles(particles, cap, rng, player.pos, Color::RED, Vec2::ZERO, PLAYER_HIT_PARTICLES);
            }
        }
    }

    // One point of damage per frame, however many shots landed
    if outcome.player_hit {
        player.health = player.health.saturating_sub(1);
        outcome.player_died = player.health == 0;
        events.push(GameEvent::PlayerHit {
            health: player.health,
        });
    }

    let mut flags = destroyed.into_iter();
    projectiles.retain(|_| !flags.next().unwrap_or(false));

    outcome
}
