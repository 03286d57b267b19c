//! Wave composition, spawn scheduling and wave progression

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::upgrades::{TemporaryUpgradeKind, apply_upgrade, generate_options};

/// Progress of the current wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// Wave number (1-based)
    pub number: u32,
    pub start_ms: f64,
    /// Enemies whose spawn delay has not elapsed yet
    pub pending: Vec<Enemy>,
    pub enemies_killed: u32,
    /// True from the clear until the next wave begins
    pub complete: bool,
    pub cleared_at_ms: Option<f64>,
}

impl WaveState {
    pub fn empty() -> Self {
        Self {
            number: 0,
            start_ms: 0.0,
            pending: Vec::new(),
            enemies_killed: 0,
            complete: false,
            cleared_at_ms: None,
        }
    }

    /// Remove and return the pending enemies whose delay has elapsed
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Enemy> {
        let elapsed = now_ms - self.start_ms;
        let (due, waiting): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|enemy| elapsed >= enemy.spawn_delay_ms);
        self.pending = waiting;
        due
    }
}

/// Time between staggered spawns for a wave
pub fn spawn_interval_ms(wave: u32) -> f64 {
    (SPAWN_INTERVAL_BASE_MS - SPAWN_INTERVAL_STEP_MS * f64::from(wave)).max(SPAWN_INTERVAL_MIN_MS)
}

/// Split `remaining` regular slots into low/mid/high tier counts
///
/// Integer forms of ceil(0.6r), ceil(0.4r) and floor(0.3r) avoid float rounding.
fn tier_split(remaining: u32, wave: u32) -> [u32; 3] {
    match wave {
        0..=2 => [remaining, 0, 0],
        3..=5 => {
            let low = ((6 * remaining).div_ceil(10)).min(remaining);
            [low, remaining - low, 0]
        }
        _ => {
            let mut low = (4 * remaining).div_ceil(10);
            let mid = 3 * remaining / 10;
            if low + mid > remaining {
                low = remaining - mid;
            }
            [low, mid, remaining - low - mid]
        }
    }
}

/// Ordered `(kind, assigned wave)` list for a wave: elites first, then tiers low to high
pub fn wave_composition(wave: u32) -> Vec<(EnemyKind, u32)> {
    let base_count = (2 + wave).min(WAVE_MAX_ENEMIES);

    // One elite per even wave so far, each scaled for the wave that introduced it
    let mut roster: Vec<(EnemyKind, u32)> = (2..=wave)
        .step_by(2)
        .map(|origin| (EnemyKind::Elite, origin))
        .collect();

    let remaining = base_count.saturating_sub(roster.len() as u32);
    let [low, mid, high] = tier_split(remaining, wave);
    let tiers = [
        (EnemyKind::ShadowMoth, low),
        (EnemyKind::DarkCrawler, mid),
        (EnemyKind::VoidSpitter, high),
    ];
    for (kind, count) in tiers {
        roster.extend(std::iter::repeat_n((kind, wave), count as usize));
    }
    roster
}

/// Random point on a canvas edge, `SPAWN_EDGE_OFFSET` outside the visible area
pub fn random_edge_position<R: Rng>(rng: &mut R, width: f32, height: f32) -> Vec2 {
    let offset = SPAWN_EDGE_OFFSET;
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * width, -offset),
        1 => Vec2::new(width + offset, rng.random::<f32>() * height),
        2 => Vec2::new(rng.random::<f32>() * width, height + offset),
        _ => Vec2::new(-offset, rng.random::<f32>() * height),
    }
}

/// Build a wave's enemies with staggered spawn delays, all still pending
pub fn spawn_wave<R: Rng>(wave: u32, rng: &mut R, width: f32, height: f32) -> Vec<Enemy> {
    let interval = spawn_interval_ms(wave);
    wave_composition(wave)
        .into_iter()
        .enumerate()
        .map(|(i, (kind, assigned_wave))| {
            let pos = random_edge_position(rng, width, height);
            let mut enemy = Enemy::new(kind, pos, assigned_wave, rng);
            enemy.spawn_delay_ms = i as f64 * interval;
            enemy.spawned = false;
            enemy
        })
        .collect()
}

/// Initialise wave `number`; clears the active set and the completion flag
pub fn begin_wave(state: &mut GameState, number: u32, now_ms: f64) {
    let (width, height) = (state.tuning.canvas_width, state.tuning.canvas_height);
    let mut pending = spawn_wave(number, &mut state.rng, width, height);
    for enemy in &mut pending {
        enemy.id = state.next_entity_id();
    }

    log::info!(
        "Wave {}: {} enemies ({} elite), spawn interval {}ms",
        number,
        pending.len(),
        pending.iter().filter(|e| e.is_elite()).count(),
        spawn_interval_ms(number)
    );

    state.wave = WaveState {
        number,
        start_ms: now_ms,
        pending,
        enemies_killed: 0,
        complete: false,
        cleared_at_ms: None,
    };
    state.enemies.clear();
    state.upgrade_options.clear();
    state.phase = GamePhase::Spawning;
    state.last_frame_ms = now_ms;
}

/// Promote pending enemies whose delay has elapsed into the arena
pub fn promote_due(state: &mut GameState) {
    let now = state.now_ms;
    for mut enemy in state.wave.take_due(now) {
        enemy.activate();
        state.enemies.push(enemy);
    }
}

/// Drive SPAWNING → ACTIVE → CLEARED → UPGRADE_SELECTION for the current frame
pub fn update_progression(state: &mut GameState) {
    match state.phase {
        GamePhase::Spawning | GamePhase::Active => {
            if state.wave.pending.is_empty() {
                state.phase = GamePhase::Active;
            }
            if state.wave.pending.is_empty() && state.enemies.is_empty() && !state.wave.complete {
                clear_wave(state);
            }
        }
        GamePhase::Cleared => {
            let cleared_at = state.wave.cleared_at_ms.unwrap_or(state.now_ms);
            if state.now_ms - cleared_at >= state.tuning.clear_linger_ms {
                state.phase = GamePhase::UpgradeSelection;
            }
        }
        GamePhase::UpgradeSelection | GamePhase::GameOver => {}
    }
}

fn clear_wave(state: &mut GameState) {
    let number = state.wave.number;
    state.wave.complete = true;
    state.wave.cleared_at_ms = Some(state.now_ms);
    state.score += SCORE_WAVE_BONUS * u64::from(number);
    state.upgrade_options = generate_options(&state.temporary, number, &mut state.rng);
    state.phase = GamePhase::Cleared;
    state.events.push(GameEvent::WaveCleared { wave: number });
    log::info!(
        "Wave {} cleared ({} killed), score {}",
        number,
        state.wave.enemies_killed,
        state.score
    );
}

/// Accept one of the offered upgrades and start the next wave
///
/// No-op (returns false) outside upgrade selection or for a kind that was not offered.
pub fn select_upgrade(state: &mut GameState, kind: TemporaryUpgradeKind, now_ms: f64) -> bool {
    if state.phase != GamePhase::UpgradeSelection
        || !state.upgrade_options.iter().any(|o| o.kind == kind)
    {
        return false;
    }

    let next = apply_upgrade(&state.temporary, kind);
    let applied = next != state.temporary;
    state.temporary = next;
    if applied && kind == TemporaryUpgradeKind::ExtraHealth {
        state.player.grow(1);
    }
    log::info!("Upgrade chosen: {} (level {})", kind.id(), state.temporary.level(kind));

    begin_wave(state, state.wave.number + 1, now_ms);
    true
}

/// Start the next wave without taking an upgrade
pub fn skip_upgrade(state: &mut GameState, now_ms: f64) -> bool {
    if state.phase != GamePhase::UpgradeSelection {
        return false;
    }
    begin_wave(state, state.wave.number + 1, now_ms);
    true
}
