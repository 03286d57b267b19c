//! Licht-Käfer headless demo
//!
//! Plays runs with a simple autopilot at 60 fps and logs the outcome.
//! Usage: `licht-kaefer [seed] [tuning.json] [profile.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use licht_kaefer::persistence::FileStore;
    use licht_kaefer::sim::FrameSnapshot;
    use licht_kaefer::{Game, Screen, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten minutes of game time
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const RUNS: u32 = 3;
    /// Parry when an enemy shot gets this close
    const THREAT_RANGE: f32 = 45.0;

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0x11C4_7E5E);
        let tuning = args
            .next()
            .map(|p| Tuning::load(Path::new(&p)))
            .unwrap_or_default();
        let profile_path = args.next().unwrap_or_else(|| "licht-kaefer-profile.json".to_string());

        log::info!("Licht-Käfer (headless) starting with seed {}", seed);
        let center = tuning.center();
        let mut game = Game::new(FileStore::new(profile_path), tuning, seed);

        let mut now = 0.0;
        for _ in 0..RUNS {
            game.start_run(now);
            let mut frames = 0;
            while frames < MAX_FRAMES {
                now += FRAME_MS;
                frames += 1;
                game.set_pointer(center.x, center.y);
                if game.snapshot().is_some_and(|s| threatened(&s)) {
                    game.trigger_parry();
                }
                game.frame(now);

                match game.screen() {
                    Screen::UpgradeSelection => {
                        let pick = game.upgrade_options().first().map(|o| o.kind);
                        let advanced = match pick {
                            Some(kind) => game.select_upgrade(kind, now),
                            None => game.skip_upgrade(now),
                        };
                        if !advanced {
                            break;
                        }
                    }
                    Screen::GameOver => break,
                    _ => {}
                }
            }

            match game.snapshot() {
                Some(s) => log::info!(
                    "Run finished after {} frames: wave {}, score {}, sparks {}",
                    frames,
                    s.wave,
                    s.score,
                    s.run_sparks
                ),
                None => log::warn!("Run produced no state"),
            }

            shop(&mut game);
        }

        log::info!(
            "Done: {} sparks banked, levels {:?}",
            game.profile().total_currency,
            game.profile().permanent_upgrades
        );
    }

    fn threatened(snapshot: &FrameSnapshot) -> bool {
        !snapshot.player.parry_active
            && snapshot.player.cooldown_fraction == 0.0
            && snapshot
                .projectiles
                .iter()
                .any(|p| !p.from_player && p.pos.distance(snapshot.player.pos) < THREAT_RANGE)
    }

    /// Spend banked sparks on the cheapest affordable upgrade until broke
    fn shop(game: &mut Game<FileStore>) {
        game.back_to_menu();
        if !game.open_shop() {
            return;
        }
        while let Some(offer) = game
            .purchase_table()
            .into_iter()
            .filter(|o| o.affordable)
            .min_by_key(|o| o.cost)
        {
            if !game.purchase(offer.kind) {
                break;
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `licht_kaefer::Game` directly
}
