//! Session layer: screens, run lifecycle and the persisted profile
//!
//! Hosts drive a `Game` with pointer/parry input and frame timestamps and read
//! back `FrameSnapshot`s. The profile is loaded once here and saved after every
//! purchase and every banked run.

use glam::Vec2;

use crate::persistence::{Profile, ProfileStore};
use crate::sim::{FrameSnapshot, GamePhase, GameState, TickInput, select_upgrade, skip_upgrade, tick};
use crate::tuning::Tuning;
use crate::upgrades::{PermanentUpgradeKind, PurchaseOffer, TemporaryUpgradeKind, UpgradeOption};

/// Top-level screen shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    UpgradeSelection,
    GameOver,
    PermanentUpgrades,
}

/// One player session over a profile store
pub struct Game<S: ProfileStore> {
    store: S,
    profile: Profile,
    tuning: Tuning,
    seed: u64,
    runs_started: u64,
    screen: Screen,
    state: Option<GameState>,
    input: TickInput,
}

impl<S: ProfileStore> Game<S> {
    pub fn new(store: S, tuning: Tuning, seed: u64) -> Self {
        let profile = Profile::load(&store);
        Self {
            store,
            profile,
            tuning,
            seed,
            runs_started: 0,
            screen: Screen::Menu,
            state: None,
            input: TickInput::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Current run, if one has been started
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Begin a new run from the menu, shop or game-over screen
    pub fn start_run(&mut self, now_ms: f64) {
        let seed = self.seed.wrapping_add(self.runs_started);
        self.runs_started += 1;
        log::info!(
            "Starting run {} (seed {}, {} sparks banked)",
            self.runs_started,
            seed,
            self.profile.total_currency
        );
        self.state = Some(GameState::new(
            seed,
            self.tuning.clone(),
            self.profile.permanent_upgrades,
            now_ms,
        ));
        self.input = TickInput::default();
        self.screen = Screen::Playing;
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.input.pointer = Some(Vec2::new(x, y));
    }

    /// Latch a parry request for the next frame
    pub fn trigger_parry(&mut self) {
        self.input.parry = true;
    }

    /// Advance the run to `now_ms` and follow any phase change
    pub fn frame(&mut self, now_ms: f64) {
        if self.screen != Screen::Playing {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        tick(state, &self.input, now_ms);
        self.input.parry = false;

        let phase = state.phase;
        match phase {
            GamePhase::UpgradeSelection => self.screen = Screen::UpgradeSelection,
            GamePhase::GameOver => {
                let (sparks, wave, score) = (state.run_sparks, state.wave.number, state.score);
                self.profile.bank(sparks);
                log::info!(
                    "Run ended on wave {} with score {}; banked {} sparks (total {})",
                    wave,
                    score,
                    sparks,
                    self.profile.total_currency
                );
                self.persist();
                self.screen = Screen::GameOver;
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        self.state.as_ref().map(FrameSnapshot::capture)
    }

    /// Options on offer while choosing an upgrade; empty otherwise
    pub fn upgrade_options(&self) -> &[UpgradeOption] {
        match (&self.state, self.screen) {
            (Some(state), Screen::UpgradeSelection) => &state.upgrade_options,
            _ => &[],
        }
    }

    pub fn select_upgrade(&mut self, kind: TemporaryUpgradeKind, now_ms: f64) -> bool {
        if self.screen != Screen::UpgradeSelection {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !select_upgrade(state, kind, now_ms) {
            return false;
        }
        self.screen = Screen::Playing;
        true
    }

    /// Select by catalog id; unknown ids are ignored
    pub fn select_upgrade_by_id(&mut self, id: &str, now_ms: f64) -> bool {
        match TemporaryUpgradeKind::from_id(id) {
            Some(kind) => self.select_upgrade(kind, now_ms),
            None => {
                log::debug!("Unknown upgrade id {:?}", id);
                false
            }
        }
    }

    /// Continue to the next wave without an upgrade
    pub fn skip_upgrade(&mut self, now_ms: f64) -> bool {
        if self.screen != Screen::UpgradeSelection {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !skip_upgrade(state, now_ms) {
            return false;
        }
        self.screen = Screen::Playing;
        true
    }

    pub fn purchase_table(&self) -> Vec<PurchaseOffer> {
        PurchaseOffer::table(&self.profile.permanent_upgrades, self.profile.total_currency)
    }

    /// Buy a permanent upgrade with banked sparks; saved immediately on success
    pub fn purchase(&mut self, kind: PermanentUpgradeKind) -> bool {
        if !self.profile.purchase(kind) {
            log::info!(
                "Cannot afford {} ({} needed, {} banked)",
                kind.name(),
                self.profile.permanent_upgrades.next_cost(kind),
                self.profile.total_currency
            );
            return false;
        }
        log::info!(
            "Purchased {} level {} ({} sparks left)",
            kind.name(),
            self.profile.permanent_upgrades.level(kind),
            self.profile.total_currency
        );
        self.persist();
        true
    }

    /// Enter the permanent upgrade shop (not during a live run)
    pub fn open_shop(&mut self) -> bool {
        if matches!(self.screen, Screen::Menu | Screen::GameOver) {
            self.screen = Screen::PermanentUpgrades;
            return true;
        }
        false
    }

    pub fn back_to_menu(&mut self) {
        if matches!(self.screen, Screen::Playing | Screen::UpgradeSelection) {
            // Abandoned runs are not banked
            log::info!("Run abandoned");
        }
        self.state = None;
        self.input = TickInput::default();
        self.screen = Screen::Menu;
    }

    fn persist(&self) {
        if let Err(e) = self.profile.save(&self.store) {
            log::warn!("Failed to save profile: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};
    use crate::sim::Projectile;
    use crate::Color;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn new_game(record: Option<&str>) -> Game<MemoryStore> {
        let store = match record {
            Some(json) => MemoryStore::with_record(json),
            None => MemoryStore::new(),
        };
        Game::new(store, Tuning::default(), 42)
    }

    /// Kill the player on the next frame
    fn lethal_shot(game: &mut Game<MemoryStore>) {
        let state = game.state.as_mut().unwrap();
        state.player.health = 1;
        state.projectiles.push(Projectile {
            pos: state.player.pos,
            vel: Vec2::new(1.0, 0.0),
            from_player: false,
            damage: 1,
            color: Color::RED,
        });
    }

    /// Clear the current wave and let the linger elapse
    fn finish_wave(game: &mut Game<MemoryStore>, now: f64) -> f64 {
        let state = game.state.as_mut().unwrap();
        state.wave.pending.clear();
        state.enemies.clear();
        state.projectiles.clear();
        let linger = state.tuning.clear_linger_ms;
        game.frame(now);
        game.frame(now + linger);
        now + linger
    }

    #[test]
    fn test_starts_on_menu() {
        let game = new_game(None);
        assert_eq!(game.screen(), Screen::Menu);
        assert!(game.snapshot().is_none());
        assert!(game.upgrade_options().is_empty());
    }

    #[test]
    fn test_run_lifecycle_banks_sparks() {
        let mut game = new_game(Some(r#"{"totalCurrency": 5}"#));
        game.start_run(0.0);
        assert_eq!(game.screen(), Screen::Playing);

        game.state.as_mut().unwrap().run_sparks = 12;
        lethal_shot(&mut game);
        game.frame(FRAME_MS);

        assert_eq!(game.screen(), Screen::GameOver);
        assert_eq!(game.profile().total_currency, 17);
        let saved = Profile::load(&game.store);
        assert_eq!(saved.total_currency, 17);

        // Frames after game over do not bank twice
        game.frame(2.0 * FRAME_MS);
        assert_eq!(game.profile().total_currency, 17);
    }

    #[test]
    fn test_upgrade_selection_flow() {
        let mut game = new_game(None);
        game.start_run(0.0);
        let now = finish_wave(&mut game, FRAME_MS);
        assert_eq!(game.screen(), Screen::UpgradeSelection);

        let options: Vec<_> = game.upgrade_options().iter().map(|o| o.kind).collect();
        assert!(!options.is_empty());
        assert!(!game.select_upgrade_by_id("not_an_upgrade", now));

        assert!(game.select_upgrade_by_id(options[0].id(), now));
        assert_eq!(game.screen(), Screen::Playing);
        let state = game.state().unwrap();
        assert_eq!(state.wave.number, 2);
        assert_eq!(state.temporary.level(options[0]), 1);
        assert!(!game.select_upgrade(options[0], now));
    }

    #[test]
    fn test_skip_upgrade() {
        let mut game = new_game(None);
        game.start_run(0.0);
        let now = finish_wave(&mut game, FRAME_MS);
        assert!(game.skip_upgrade(now));
        assert_eq!(game.state().unwrap().wave.number, 2);
        assert_eq!(game.state().unwrap().temporary, Default::default());
    }

    #[test]
    fn test_parry_latch_clears_after_frame() {
        let mut game = new_game(None);
        game.start_run(0.0);
        game.set_pointer(100.0, 120.0);
        game.trigger_parry();
        game.frame(FRAME_MS);
        let snap: FrameSnapshot = game.snapshot().unwrap();
        assert!(snap.player.parry_active);
        assert_eq!(snap.player.pos, Vec2::new(100.0, 120.0));
        assert!(!game.input.parry);
    }

    #[test]
    fn test_shop_purchase_persists() {
        let mut game = new_game(Some(r#"{"totalCurrency": 25}"#));
        assert!(game.open_shop());
        assert_eq!(game.screen(), Screen::PermanentUpgrades);

        let table = game.purchase_table();
        assert_eq!(table.len(), 4);
        assert!(table[0].affordable);

        assert!(game.purchase(PermanentUpgradeKind::ShieldDuration));
        assert!(!game.purchase(PermanentUpgradeKind::HealthRegen));
        assert_eq!(game.profile().total_currency, 15);
        assert_eq!(Profile::load(&game.store).permanent_upgrades.shield_duration, 1);

        game.back_to_menu();
        assert_eq!(game.screen(), Screen::Menu);
    }

    #[test]
    fn test_meta_levels_apply_to_new_run() {
        let mut game = new_game(Some(r#"{"permanentUpgrades": {"startHealth": 4}, "totalCurrency": 0}"#));
        game.start_run(0.0);
        assert_eq!(game.state().unwrap().player.health, 6);
    }

    #[test]
    fn test_shop_blocked_during_run() {
        let mut game = new_game(None);
        game.start_run(0.0);
        assert!(!game.open_shop());
        game.back_to_menu();
        assert!(game.state().is_none());
        assert!(game.open_shop());
    }

    struct BrokenStore;

    impl ProfileStore for BrokenStore {
        fn load_raw(&self) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("test".to_string()))
        }
        fn save_raw(&self, _json: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("test".to_string()))
        }
    }

    #[test]
    fn test_store_failures_are_not_fatal() {
        let mut game = Game::new(BrokenStore, Tuning::default(), 1);
        assert_eq!(game.profile().total_currency, 0);
        game.start_run(0.0);
        game.state.as_mut().unwrap().run_sparks = 3;
        let state = game.state.as_mut().unwrap();
        state.player.health = 1;
        state.projectiles.push(Projectile {
            pos: state.player.pos,
            vel: Vec2::X,
            from_player: false,
            damage: 1,
            color: Color::RED,
        });
        game.frame(FRAME_MS);
        assert_eq!(game.screen(), Screen::GameOver);
        assert_eq!(game.profile().total_currency, 3);
    }
}
