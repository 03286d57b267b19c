//! Enemy types, stat scaling and per-frame AI

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Projectile;
use crate::consts::*;
use crate::{Color, direction, unit_from_angle};

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Low tier: fast, fragile
    ShadowMoth,
    /// Mid tier: slower, tougher
    DarkCrawler,
    /// High tier: slow, tanky, rapid fire
    VoidSpitter,
    /// Escalating elite; scales by generation
    Elite,
}

/// Stats of one enemy at its assigned wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: u32,
    pub speed: f32,
    pub size: f32,
    pub shoot_cooldown_ms: f64,
    pub color: Color,
}

impl EnemyKind {
    /// Stat table, scaled by the enemy's assigned wave
    pub fn stats(&self, wave: u32) -> EnemyStats {
        let w = wave as f32;
        let wf = f64::from(wave);
        match self {
            EnemyKind::ShadowMoth => EnemyStats {
                health: 1 + wave / 3,
                speed: 30.0 + w * 5.0,
                size: 10.0,
                shoot_cooldown_ms: (2500.0 - wf * 100.0).max(1000.0),
                color: Color::from_hex(0xff0066),
            },
            EnemyKind::DarkCrawler => EnemyStats {
                health: 2 + wave / 2,
                speed: 20.0 + w * 3.0,
                size: 12.0,
                shoot_cooldown_ms: (3000.0 - wf * 150.0).max(1500.0),
                color: Color::from_hex(0x8800ff),
            },
            EnemyKind::VoidSpitter => EnemyStats {
                health: 3 + wave / 2,
                speed: 15.0 + w * 2.0,
                size: 15.0,
                shoot_cooldown_ms: (2000.0 - wf * 80.0).max(800.0),
                color: Color::from_hex(0xff3300),
            },
            EnemyKind::Elite => {
                let generation = elite_generation(wave);
                let base_speed = 30.0 + w * 5.0;
                EnemyStats {
                    health: 2 + wave / 2,
                    speed: base_speed * ELITE_SPEED_GROWTH.powi(generation as i32),
                    size: 11.0,
                    shoot_cooldown_ms: (2000.0 - wf * 120.0).max(800.0),
                    color: elite_color(generation),
                }
            }
        }
    }
}

/// Elite generation for an assigned wave: 2-3 ⇒ 1, 4-5 ⇒ 2, ...
pub fn elite_generation(wave: u32) -> u32 {
    wave.saturating_sub(2) / 2 + 1
}

/// Deterministic value in [0, 1) from a seed
fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

/// Stable colour shared by every elite of a generation
pub fn elite_color(generation: u32) -> Color {
    let seed = f64::from(generation) * 12345.0;
    let hue = (seeded_random(seed) * 360.0).floor();
    let saturation = 70.0 + (seeded_random(seed + 1.0) * 30.0).floor();
    let lightness = 40.0 + (seeded_random(seed + 2.0) * 20.0).floor();
    Color::from_hsl(hue as f32, saturation as f32, lightness as f32)
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Wave the stats were scaled for (elites keep their origin wave)
    pub assigned_wave: u32,
    pub health: u32,
    pub max_health: u32,
    pub speed: f32,
    pub size: f32,
    pub color: Color,
    pub shoot_cooldown_ms: f64,
    /// Timestamp of the latest shot (ms); 0 before the first one
    pub last_shot_ms: f64,
    pub wander_target: Vec2,
    /// Seconds since the last re-target
    pub wander_timer: f32,
    /// Seconds until the next re-target
    pub wander_interval: f32,
    pub alive: bool,
    /// Delay after wave start before the enemy enters (ms)
    pub spawn_delay_ms: f64,
    pub spawned: bool,
}

impl Enemy {
    pub fn new<R: Rng>(kind: EnemyKind, pos: Vec2, wave: u32, rng: &mut R) -> Self {
        let stats = kind.stats(wave);
        Self {
            id: 0,
            pos,
            kind,
            assigned_wave: wave,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            size: stats.size,
            color: stats.color,
            shoot_cooldown_ms: stats.shoot_cooldown_ms,
            last_shot_ms: 0.0,
            wander_target: pos,
            wander_timer: 0.0,
            wander_interval: rng.random_range(WANDER_INTERVAL_MIN..WANDER_INTERVAL_MAX),
            alive: true,
            spawn_delay_ms: 0.0,
            spawned: false,
        }
    }

    /// Enter the arena
    ///
    /// `last_shot_ms` keeps its zero origin, so an enemy entering after one
    /// cooldown of game time fires on its first frame.
    pub fn activate(&mut self) {
        self.spawned = true;
    }

    pub fn is_elite(&self) -> bool {
        self.kind == EnemyKind::Elite
    }

    /// Apply damage; returns true if this hit killed the enemy
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Pick a wander target on a random edge, `WANDER_MARGIN` inside the canvas
pub fn pick_wander_target<R: Rng>(rng: &mut R, width: f32, height: f32) -> Vec2 {
    let margin = WANDER_MARGIN;
    let span_x = (width - 2.0 * margin).max(0.0);
    let span_y = (height - 2.0 * margin).max(0.0);
    let along_x = margin + rng.random::<f32>() * span_x;
    let along_y = margin + rng.random::<f32>() * span_y;
    match rng.random_range(0..4) {
        0 => Vec2::new(along_x, margin),
        1 => Vec2::new(width - margin, along_y),
        2 => Vec2::new(along_x, height - margin),
        _ => Vec2::new(margin, along_y),
    }
}

/// Advance one enemy; returns a projectile when it fires this frame
pub fn update_enemy<R: Rng>(
    enemy: &mut Enemy,
    player_pos: Vec2,
    dt: f32,
    now_ms: f64,
    bounds: Vec2,
    rng: &mut R,
) -> Option<Projectile> {
    if !enemy.alive {
        return None;
    }

    enemy.wander_timer += dt;
    if enemy.wander_timer > enemy.wander_interval {
        enemy.wander_timer = 0.0;
        enemy.wander_interval = rng.random_range(WANDER_INTERVAL_MIN..WANDER_INTERVAL_MAX);
        enemy.wander_target = pick_wander_target(rng, bounds.x, bounds.y);
    }

    let to_target = enemy.wander_target - enemy.pos;
    let dist = to_target.length();
    if dist > WANDER_ARRIVE_DIST {
        let step = (enemy.speed * dt).min(dist);
        enemy.pos += to_target / dist * step;
    }

    if now_ms - enemy.last_shot_ms >= enemy.shoot_cooldown_ms {
        enemy.last_shot_ms = now_ms;
        return aim_shot(enemy, player_pos, rng);
    }
    None
}

/// Shot toward `target` with angular jitter; `None` when stacked on the target
pub fn aim_shot<R: Rng>(enemy: &Enemy, target: Vec2, rng: &mut R) -> Option<Projectile> {
    let aim = direction(enemy.pos, target)?;
    let speed = rng.random_range(ENEMY_SHOT_SPEED_MIN..ENEMY_SHOT_SPEED_MAX);
    let angle = aim.y.atan2(aim.x) + rng.random_range(-ENEMY_SHOT_JITTER..ENEMY_SHOT_JITTER);
    Some(Projectile {
        pos: enemy.pos,
        vel: unit_from_angle(angle) * speed,
        from_player: false,
        damage: 1,
        color: enemy.color,
    })
}
