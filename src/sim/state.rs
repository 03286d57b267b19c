//! Game state and core simulation types
//!
//! Everything a run mutates lives in `GameState`. The frame driver in `tick`
//! owns it exclusively; presentation reads it through `FrameSnapshot`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::wave::{self, WaveState};
use crate::tuning::Tuning;
use crate::upgrades::{PermanentUpgrades, TemporaryUpgrades, UpgradeEffects, UpgradeOption};
use crate::Color;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Wave started, some enemies still waiting for their spawn delay
    Spawning,
    /// Every enemy of the wave has entered the arena
    Active,
    /// No enemies alive or pending; arena stays live for the linger time
    Cleared,
    /// Waiting for the player to pick a temporary upgrade
    UpgradeSelection,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// Phases in which frames advance the simulation
    pub fn is_live(&self) -> bool {
        matches!(self, GamePhase::Spawning | GamePhase::Active | GamePhase::Cleared)
    }
}

/// Timed, cooldown-gated reflecting shield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parry {
    pub active: bool,
    pub cooldown_remaining_ms: f32,
    /// Duration armed at the last activation (ms)
    pub duration_ms: f32,
    /// Base radius before size upgrades
    pub radius: f32,
    pub activated_at_ms: f64,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub speed: f32,
    pub radius: f32,
    pub parry: Parry,
    /// Elapsed wounded time toward the next permanent regen heal (ms)
    pub permanent_regen_ms: f32,
    /// Elapsed wounded time toward the next temporary regen heal (ms)
    pub temporary_regen_ms: f32,
}

impl Player {
    pub fn new(tuning: &Tuning, health: u32) -> Self {
        Self {
            pos: tuning.center(),
            health,
            max_health: health,
            speed: tuning.player_speed,
            radius: tuning.player_radius,
            parry: Parry {
                active: false,
                cooldown_remaining_ms: 0.0,
                duration_ms: tuning.parry_duration_ms,
                radius: tuning.parry_radius,
                activated_at_ms: 0.0,
            },
            permanent_regen_ms: 0.0,
            temporary_regen_ms: 0.0,
        }
    }

    pub fn is_wounded(&self) -> bool {
        self.health < self.max_health
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Raise both current and max health (extra-health upgrade)
    pub fn grow(&mut self, amount: u32) {
        self.max_health += amount;
        self.health += amount;
    }
}

/// A projectile; player and enemy shots share the shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// True for shots owned by the player (reflected shots)
    pub from_player: bool,
    pub damage: u32,
    pub color: Color,
}

/// A cosmetic decaying particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Color,
    /// 1 at birth, removed at or below 0
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
}

impl Particle {
    pub fn new<R: Rng>(rng: &mut R, pos: Vec2, color: Color, base_vel: Vec2) -> Self {
        let jitter = Vec2::new(
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
        );
        Self {
            pos,
            vel: base_vel + jitter,
            size: rng.random_range(1.0..4.0),
            color,
            life: 1.0,
            decay: rng.random_range(0.6..1.8),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.life.max(0.0)
    }

    /// Integrate and decay; returns false once the particle is spent
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.life -= self.decay * dt;
        self.size *= 0.99f32.powf(dt * 60.0);
        self.life > 0.0
    }
}

/// A light-spark currency pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    pub collected: bool,
    /// Visual pulse phase (radians)
    pub pulse: f32,
}

impl Spark {
    pub fn new<R: Rng>(rng: &mut R, pos: Vec2) -> Self {
        Self {
            pos: pos + Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)),
            collected: false,
            pulse: rng.random_range(0.0..std::f32::consts::TAU),
        }
    }
}

/// Things that happened during a frame, for audio/UI hosts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ParryActivated,
    ParryReflected { pos: Vec2 },
    EnemyKilled { pos: Vec2, elite: bool },
    PlayerHit { health: u32 },
    SparksCollected { count: u32, doubled: bool },
    WaveCleared { wave: u32 },
    GameOver { wave: u32, score: u64 },
}

/// Push a burst of particles, evicting the oldest past `cap`
pub fn emit_particles<R: Rng>(
    particles: &mut Vec<Particle>,
    cap: usize,
    rng: &mut R,
    pos: Vec2,
    color: Color,
    base_vel: Vec2,
    count: usize,
) {
    for _ in 0..count {
        particles.push(Particle::new(rng, pos, color, base_vel));
    }
    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }
}

/// Drop `count` spark pickups around `pos`
pub fn drop_sparks<R: Rng>(sparks: &mut Vec<Spark>, rng: &mut R, pos: Vec2, count: u32) {
    sparks.extend((0..count).map(|_| Spark::new(rng, pos)));
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The run's only random source
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Timestamp of the latest frame (ms)
    pub now_ms: f64,
    /// Timestamp delta time is measured from (ms)
    pub last_frame_ms: f64,
    pub score: u64,
    /// Sparks collected this run (banked at game over)
    pub run_sparks: u64,
    pub wave: WaveState,
    pub player: Player,
    /// Enemies in the arena (alive only between frames)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub sparks: Vec<Spark>,
    pub temporary: TemporaryUpgrades,
    /// Snapshot of the meta levels taken at run start
    pub permanent: PermanentUpgrades,
    /// Options offered at the latest wave clear
    pub upgrade_options: Vec<UpgradeOption>,
    /// Events produced by the latest frame
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a fresh run at wave 1
    pub fn new(seed: u64, tuning: Tuning, permanent: PermanentUpgrades, now_ms: f64) -> Self {
        let temporary = TemporaryUpgrades::default();
        let start_health = UpgradeEffects::compute(&temporary, &permanent).start_health;
        let player = Player::new(&tuning, start_health);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Spawning,
            now_ms,
            last_frame_ms: now_ms,
            score: 0,
            run_sparks: 0,
            wave: WaveState::empty(),
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            sparks: Vec::new(),
            temporary,
            permanent,
            upgrade_options: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        wave::begin_wave(&mut state, 1, now_ms);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Effect coefficients for the current upgrade state
    pub fn effects(&self) -> UpgradeEffects {
        UpgradeEffects::compute(&self.temporary, &self.permanent)
    }

    /// Shield radius including size upgrades
    pub fn effective_parry_radius(&self) -> f32 {
        self.player.parry.radius * self.effects().parry_size_multiplier
    }
}
