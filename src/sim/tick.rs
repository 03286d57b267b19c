//! Frame driver
//!
//! One pass per display refresh, in a fixed order. Later steps always see the
//! fully updated output of earlier ones:
//! input → player → spawner/enemy AI → integration → combat → sparks → wave check

use glam::Vec2;

use super::collision::resolve_combat;
use super::enemy::update_enemy;
use super::pickup::collect_sparks;
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::{promote_due, update_progression};
use crate::consts::*;
use crate::in_bounds;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position in canvas space
    pub pointer: Option<Vec2>,
    /// Parry trigger latched since the previous frame
    pub parry: bool,
}

/// Advance the run to timestamp `now_ms`
///
/// Delta time is the gap to the previous frame's timestamp, never negative.
/// Frames outside the live phases are ignored.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if !state.phase.is_live() {
        return;
    }

    let dt = (((now_ms - state.last_frame_ms) / 1000.0) as f32).max(0.0);
    state.last_frame_ms = now_ms;
    state.now_ms = now_ms;
    state.events.clear();

    // 1. Input
    if let Some(pointer) = input.pointer {
        state.player.pos = pointer;
    }
    let activated = input.parry && try_activate_parry(state);

    // 2. Player timers
    update_player(state, dt, activated);

    // 3. Spawner + enemy AI
    promote_due(state);
    let bounds = Vec2::new(state.tuning.canvas_width, state.tuning.canvas_height);
    let player_pos = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        if let Some(shot) = update_enemy(enemy, player_pos, dt, now_ms, bounds, &mut state.rng) {
            state.projectiles.push(shot);
        }
    }
    state.enemies.retain(|e| e.alive);

    // 4. Integration
    integrate(state, dt);

    // 5. Combat
    let outcome = resolve_combat(state);

    // 6. Sparks
    collect_sparks(state, dt);

    // 7. Game over overrides any pending clear
    if outcome.player_died {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            wave: state.wave.number,
            score: state.score,
        });
        log::info!(
            "Game over on wave {} (score {}, sparks {})",
            state.wave.number,
            state.score,
            state.run_sparks
        );
        return;
    }

    // 8. Wave progression
    update_progression(state);
}

/// Arm the shield if the cooldown has run out
fn try_activate_parry(state: &mut GameState) -> bool {
    if state.player.parry.cooldown_remaining_ms > 0.0 {
        return false;
    }
    let effects = state.effects();
    let parry = &mut state.player.parry;
    parry.active = true;
    parry.activated_at_ms = state.now_ms;
    parry.duration_ms = state.tuning.parry_duration_ms * effects.parry_duration_multiplier;
    parry.cooldown_remaining_ms = state.tuning.parry_cooldown_ms * effects.parry_cooldown_multiplier;
    state.events.push(GameEvent::ParryActivated);
    true
}

/// Expire the shield, run down the cooldown and apply regeneration
fn update_player(state: &mut GameState, dt: f32, just_activated: bool) {
    let effects = state.effects();
    let now = state.now_ms;
    let player = &mut state.player;

    if player.parry.active && now - player.parry.activated_at_ms >= f64::from(player.parry.duration_ms) {
        player.parry.active = false;
    }
    if !just_activated {
        player.parry.cooldown_remaining_ms = (player.parry.cooldown_remaining_ms - dt * 1000.0).max(0.0);
    }

    let dt_ms = dt * 1000.0;
    if let Some(interval) = effects.permanent_regen_interval_ms {
        let wounded = player.is_wounded();
        let heals = run_accumulator(&mut player.permanent_regen_ms, dt_ms, interval, wounded);
        player.heal(heals);
    }
    if let Some(interval) = effects.temporary_regen_interval_ms {
        let wounded = player.is_wounded();
        let heals = run_accumulator(&mut player.temporary_regen_ms, dt_ms, interval, wounded);
        player.heal(heals);
    }
}

/// Advance a periodic-effect accumulator; returns how many periods elapsed
///
/// The accumulator only runs while `running` and is reset otherwise, so a
/// full-health player never banks heals.
fn run_accumulator(acc: &mut f32, dt_ms: f32, interval_ms: f32, running: bool) -> u32 {
    if !running || interval_ms <= 0.0 {
        *acc = 0.0;
        return 0;
    }
    *acc += dt_ms;
    let mut fired = 0;
    while *acc >= interval_ms {
        *acc -= interval_ms;
        fired += 1;
    }
    fired
}

/// Move projectiles, particles and sparks; prune what left the arena
fn integrate(state: &mut GameState, dt: f32) {
    let (width, height) = (state.tuning.canvas_width, state.tuning.canvas_height);

    for projectile in state.projectiles.iter_mut() {
        projectile.pos += projectile.vel * dt;
    }
    state
        .projectiles
        .retain(|p| in_bounds(p.pos, width, height, OUT_OF_BOUNDS_MARGIN));

    state.particles.retain_mut(|p| p.update(dt));

    for spark in state.sparks.iter_mut() {
        spark.pulse += dt * 5.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Projectile;
    use crate::tuning::Tuning;
    use crate::upgrades::PermanentUpgrades;
    use crate::Color;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Tuning::default(), PermanentUpgrades::default(), 0.0)
    }

    fn run_frames(state: &mut GameState, from_ms: f64, frames: u32, input: &TickInput) -> f64 {
        let mut now = from_ms;
        for _ in 0..frames {
            now += FRAME_MS;
            tick(state, input, now);
        }
        now
    }

    #[test]
    fn test_pointer_snaps_player() {
        let mut state = new_state(1);
        let input = TickInput {
            pointer: Some(Vec2::new(123.0, 456.0)),
            parry: false,
        };
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.player.pos, Vec2::new(123.0, 456.0));
    }

    #[test]
    fn test_first_enemy_spawns_immediately() {
        let mut state = new_state(1);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.wave.pending.len(), 2);
        assert_eq!(state.phase, GamePhase::Spawning);
    }

    #[test]
    fn test_parry_cycle() {
        let mut state = new_state(2);
        let press = TickInput {
            parry: true,
            ..Default::default()
        };
        tick(&mut state, &press, 100.0);
        assert!(state.player.parry.active);
        assert_eq!(state.player.parry.cooldown_remaining_ms, 500.0);
        assert!(state.events.contains(&GameEvent::ParryActivated));

        // Pressing during cooldown does nothing
        tick(&mut state, &press, 200.0);
        assert_eq!(state.player.parry.activated_at_ms, 100.0);
        assert!((state.player.parry.cooldown_remaining_ms - 400.0).abs() < 1e-3);

        // Shield expires after 250ms
        tick(&mut state, &TickInput::default(), 350.0);
        assert!(!state.player.parry.active);

        // Cooldown drained: can parry again
        tick(&mut state, &TickInput::default(), 450.0);
        tick(&mut state, &TickInput::default(), 550.0);
        tick(&mut state, &TickInput::default(), 650.0);
        assert_eq!(state.player.parry.cooldown_remaining_ms, 0.0);
        tick(&mut state, &press, 700.0);
        assert!(state.player.parry.active);
        assert_eq!(state.player.parry.activated_at_ms, 700.0);
    }

    #[test]
    fn test_parry_upgrades_scale_timers() {
        let perm = PermanentUpgrades {
            shield_duration: 1,
            ..Default::default()
        };
        let mut state = GameState::new(3, Tuning::default(), perm, 0.0);
        state.temporary.parry_cooldown = 2;
        state.temporary.parry_duration = 1;
        let press = TickInput {
            parry: true,
            ..Default::default()
        };
        tick(&mut state, &press, 10.0);
        assert!((state.player.parry.duration_ms - 250.0 * 1.3 * 1.1).abs() < 1e-3);
        assert!((state.player.parry.cooldown_remaining_ms - 350.0).abs() < 1e-3);
    }

    #[test]
    fn test_regen_accumulator_is_frame_rate_independent() {
        let mut coarse = 0.0;
        let mut fine = 0.0;
        let mut coarse_heals = 0;
        let mut fine_heals = 0;
        for _ in 0..30 {
            coarse_heals += run_accumulator(&mut coarse, 100.0, 1000.0, true);
        }
        for _ in 0..300 {
            fine_heals += run_accumulator(&mut fine, 10.0, 1000.0, true);
        }
        assert_eq!(coarse_heals, 3);
        assert_eq!(fine_heals, 3);
        // Multiple periods in one long step
        let mut acc = 0.0;
        assert_eq!(run_accumulator(&mut acc, 2500.0, 1000.0, true), 2);
        assert_eq!(run_accumulator(&mut acc, 0.0, 1000.0, false), 0);
        assert_eq!(acc, 0.0);
    }

    #[test]
    fn test_regen_heals_wounded_player() {
        let perm = PermanentUpgrades {
            health_regen: 1,
            ..Default::default()
        };
        let mut state = GameState::new(4, Tuning::default(), perm, 0.0);
        state.wave.pending.clear();
        state.tuning.clear_linger_ms = 10_000.0;
        state.player.health = 1;
        // 3s of frames without enemies: the wave clears but the arena stays live
        let mut now = 0.0;
        for _ in 0..31 {
            now += 100.0;
            tick(&mut state, &TickInput::default(), now);
        }
        assert_eq!(state.player.health, 2);
    }

    #[test]
    fn test_temporary_regen_heals_wounded_player() {
        let mut state = new_state(4);
        state.wave.pending.clear();
        state.tuning.clear_linger_ms = 20_000.0;
        state.temporary.health_regen = 2; // one heal per 2500ms
        state.player.health = 1;
        let mut now = 0.0;
        for _ in 0..24 {
            now += 100.0;
            tick(&mut state, &TickInput::default(), now);
        }
        assert_eq!(state.player.health, 1);
        tick(&mut state, &TickInput::default(), now + 100.0);
        assert_eq!(state.player.health, 2);

        // At full health the accumulator does not bank time
        state.player.health = state.player.max_health;
        tick(&mut state, &TickInput::default(), now + 10_000.0);
        assert_eq!(state.player.temporary_regen_ms, 0.0);
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_long_frame_drains_full_cooldown() {
        let mut state = new_state(11);
        let press = TickInput {
            parry: true,
            ..Default::default()
        };
        tick(&mut state, &press, 100.0);
        assert_eq!(state.player.parry.cooldown_remaining_ms, 500.0);

        // A five-second stall counts in full
        tick(&mut state, &TickInput::default(), 5100.0);
        assert_eq!(state.player.parry.cooldown_remaining_ms, 0.0);
        assert!(!state.player.parry.active);

        tick(&mut state, &press, 5116.0);
        assert!(state.player.parry.active);
        assert_eq!(state.player.parry.activated_at_ms, 5116.0);
    }

    #[test]
    fn test_enemy_fires_on_entry_frame_late_in_session() {
        let mut state = GameState::new(12, Tuning::default(), PermanentUpgrades::default(), 100_000.0);
        tick(&mut state, &TickInput::default(), 100_000.0 + FRAME_MS);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.projectiles.iter().filter(|p| !p.from_player).count(), 1);
    }

    #[test]
    fn test_out_of_bounds_projectiles_pruned() {
        let mut state = new_state(5);
        state.projectiles.push(Projectile {
            pos: Vec2::new(845.0, 300.0),
            vel: Vec2::new(600.0, 0.0),
            from_player: true,
            damage: 1,
            color: Color::CYAN,
        });
        tick(&mut state, &TickInput::default(), 16.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_wave_clear_fires_once_then_selection() {
        let mut state = new_state(6);
        state.wave.pending.clear();
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::Cleared);
        assert!(state.wave.complete);
        assert_eq!(state.score, SCORE_WAVE_BONUS);
        assert!(state.events.contains(&GameEvent::WaveCleared { wave: 1 }));

        tick(&mut state, &TickInput::default(), 32.0);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::WaveCleared { .. })));
        assert_eq!(state.score, SCORE_WAVE_BONUS);

        let linger = state.tuning.clear_linger_ms;
        tick(&mut state, &TickInput::default(), 16.0 + linger);
        assert_eq!(state.phase, GamePhase::UpgradeSelection);
        assert!(!state.upgrade_options.is_empty());

        // Frames during selection are ignored
        let frozen = state.now_ms;
        tick(&mut state, &TickInput::default(), frozen + 5000.0);
        assert_eq!(state.now_ms, frozen);
    }

    #[test]
    fn test_death_overrides_clear() {
        let mut state = new_state(7);
        state.wave.pending.clear();
        state.player.health = 1;
        let center = state.player.pos;
        state.projectiles.push(Projectile {
            pos: center,
            vel: Vec2::new(1.0, 0.0),
            from_player: false,
            damage: 1,
            color: Color::RED,
        });
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.wave.complete);

        // Terminal
        tick(&mut state, &TickInput::default(), 32.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_death_during_linger_wins() {
        let mut state = new_state(9);
        state.wave.pending.clear();
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::Cleared);

        state.player.health = 1;
        let center = state.player.pos;
        state.projectiles.push(Projectile {
            pos: center,
            vel: Vec2::new(1.0, 0.0),
            from_player: false,
            damage: 1,
            color: Color::RED,
        });
        // Halfway through the linger
        let linger = state.tuning.clear_linger_ms;
        tick(&mut state, &TickInput::default(), 16.0 + linger / 2.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::GameOver { wave: 1, .. })));

        // The linger elapsing afterwards does not reopen selection
        tick(&mut state, &TickInput::default(), 16.0 + linger * 2.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);

        let inputs = [
            TickInput {
                pointer: Some(Vec2::new(300.0, 200.0)),
                ..Default::default()
            },
            TickInput {
                parry: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut now = 0.0;
        for i in 0..600 {
            now += FRAME_MS;
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, now);
            tick(&mut state2, input, now);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.health, state2.player.health);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.projectiles.len(), state2.projectiles.len());
        for (a, b) in state1.projectiles.iter().zip(&state2.projectiles) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_enemies_shoot_during_play() {
        let mut state = new_state(8);
        run_frames(&mut state, 0.0, 60 * 5, &TickInput::default());
        let shots_seen = state.projectiles.iter().any(|p| !p.from_player)
            || state.player.health < state.player.max_health;
        assert!(shots_seen);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_health_stays_in_bounds(
            seed in 0u64..1000,
            steps in proptest::collection::vec((0.0f32..800.0, 0.0f32..600.0, any::<bool>(), 1.0f64..120.0), 1..400),
        ) {
            let mut state = new_state(seed);
            let mut now = 0.0;
            for (x, y, parry, gap) in steps {
                now += gap;
                let input = TickInput { pointer: Some(Vec2::new(x, y)), parry };
                tick(&mut state, &input, now);
                prop_assert!(state.player.health <= state.player.max_health);
                for enemy in &state.enemies {
                    prop_assert!(enemy.alive);
                    prop_assert!(enemy.health <= enemy.max_health);
                    prop_assert!(enemy.health > 0);
                }
                for projectile in &state.projectiles {
                    prop_assert!(projectile.vel.is_finite());
                    prop_assert!(projectile.vel.length() > 0.0);
                }
                if state.phase == GamePhase::UpgradeSelection {
                    let kind = state.upgrade_options[0].kind;
                    prop_assert!(crate::sim::wave::select_upgrade(&mut state, kind, now));
                    prop_assert!(!state.wave.complete);
                }
            }
        }
    }
}
