//! Spark collection and magnet pull

use rand::Rng;

use super::state::{GameEvent, GameState, emit_particles};
use crate::consts::*;
use crate::{Color, direction};

const COLLECT_PARTICLES: usize = 3;

/// Collect sparks touching the player and pull nearby ones in
///
/// The double-spark roll is made once for the whole batch collected this
/// frame. Returns the number of sparks credited (after doubling).
pub fn collect_sparks(state: &mut GameState, dt: f32) -> u64 {
    let effects = state.effects();
    let cap = state.tuning.max_particles;
    let GameState {
        player,
        sparks,
        particles,
        rng,
        score,
        run_sparks,
        events,
        ..
    } = state;

    let mut collected: u64 = 0;
    for spark in sparks.iter_mut() {
        let dist = spark.pos.distance(player.pos);
        if dist < SPARK_COLLECT_RADIUS {
            spark.collected = true;
            collected += 1;
            emit_particles(particles, cap, rng, spark.pos, Color::CYAN, glam::Vec2::ZERO, COLLECT_PARTICLES);
        } else if effects.magnet_pull_speed > 0.0 && dist < effects.magnet_range {
            if let Some(pull) = direction(spark.pos, player.pos) {
                spark.pos += pull * (effects.magnet_pull_speed * dt).min(dist);
            }
        }
    }
    sparks.retain(|s| !s.collected);

    if collected == 0 {
        return 0;
    }

    let doubled = rng.random_bool(effects.double_spark_chance.clamp(0.0, 1.0));
    let credited = if doubled { collected * 2 } else { collected };
    *run_sparks += credited;
    *score += SCORE_PER_SPARK * credited;
    events.push(GameEvent::SparksCollected {
        count: credited as u32,
        doubled,
    });
    credited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Spark;
    use crate::tuning::Tuning;
    use crate::upgrades::PermanentUpgrades;
    use glam::Vec2;

    fn state_with_sparks(offsets: &[Vec2]) -> GameState {
        let mut state = GameState::new(7, Tuning::default(), PermanentUpgrades::default(), 0.0);
        let center = state.player.pos;
        state.sparks = offsets
            .iter()
            .map(|o| Spark {
                pos: center + *o,
                collected: false,
                pulse: 0.0,
            })
            .collect();
        state
    }

    #[test]
    fn test_collects_within_radius() {
        let mut state = state_with_sparks(&[Vec2::new(5.0, 0.0), Vec2::new(0.0, 19.0), Vec2::new(25.0, 0.0)]);
        let credited = collect_sparks(&mut state, 1.0 / 60.0);
        assert_eq!(credited, 2);
        assert_eq!(state.run_sparks, 2);
        assert_eq!(state.score, 10);
        assert_eq!(state.sparks.len(), 1);
        assert_eq!(state.particles.len(), 2 * COLLECT_PARTICLES);
    }

    #[test]
    fn test_no_magnet_no_pull() {
        let mut state = state_with_sparks(&[Vec2::new(25.0, 0.0)]);
        let before = state.sparks[0].pos;
        collect_sparks(&mut state, 0.1);
        assert_eq!(state.sparks[0].pos, before);
    }

    #[test]
    fn test_magnet_pulls_in_range() {
        let mut state = state_with_sparks(&[Vec2::new(30.0, 0.0), Vec2::new(60.0, 0.0)]);
        state.temporary.spark_magnet = 1; // range 35, 100 units/s
        collect_sparks(&mut state, 0.05);
        let center = state.player.pos;
        assert!((state.sparks[0].pos.x - (center.x + 25.0)).abs() < 1e-3);
        assert_eq!(state.sparks[1].pos, center + Vec2::new(60.0, 0.0));
        assert_eq!(state.run_sparks, 0);
    }

    #[test]
    fn test_guaranteed_double() {
        let mut state = state_with_sparks(&[Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0)]);
        state.temporary.double_sparks = 10;
        assert_eq!(collect_sparks(&mut state, 0.016), 6);
        assert_eq!(state.run_sparks, 6);
        assert_eq!(state.score, 30);
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::SparksCollected { count: 6, doubled: true })
        );
    }

    #[test]
    fn test_batch_doubling_is_all_or_nothing() {
        for seed in 0..20 {
            let mut state = state_with_sparks(&[Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)]);
            state.rng = rand::SeedableRng::seed_from_u64(seed);
            state.temporary.double_sparks = 5;
            let credited = collect_sparks(&mut state, 0.016);
            assert!(credited == 3 || credited == 6);
        }
    }
}
