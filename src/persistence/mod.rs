//! Persisted player profile
//!
//! One JSON record holding the permanent upgrade levels and the banked spark
//! total. Loaded once at startup, saved after every mutation.

mod store;

use serde::{Deserialize, Serialize};

use crate::upgrades::{PermanentUpgradeKind, PermanentUpgrades};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
pub use store::{MemoryStore, ProfileStore, StoreError};

/// Meta-progression carried between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub permanent_upgrades: PermanentUpgrades,
    /// Banked light sparks
    pub total_currency: u64,
}

impl Profile {
    /// Load the profile; missing or corrupt records yield a fresh profile
    pub fn load<S: ProfileStore + ?Sized>(store: &S) -> Self {
        match store.load_raw() {
            Ok(Some(json)) => match serde_json::from_str::<Profile>(&json) {
                Ok(profile) => {
                    log::info!(
                        "Loaded profile: {} sparks banked",
                        profile.total_currency
                    );
                    profile
                }
                Err(e) => {
                    log::warn!("Profile record is corrupt ({}), starting fresh", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No profile found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read profile ({}), starting fresh", e);
                Self::default()
            }
        }
    }

    pub fn save<S: ProfileStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.save_raw(&json)?;
        log::debug!("Profile saved ({} sparks)", self.total_currency);
        Ok(())
    }

    /// Add a finished run's sparks to the banked total
    pub fn bank(&mut self, sparks: u64) {
        self.total_currency = self.total_currency.saturating_add(sparks);
    }

    /// Buy one level of a permanent upgrade if affordable
    pub fn purchase(&mut self, kind: PermanentUpgradeKind) -> bool {
        crate::upgrades::purchase(&mut self.permanent_upgrades, &mut self.total_currency, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_defaults() {
        let store = MemoryStore::new();
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_corrupt_record_defaults() {
        let store = MemoryStore::with_record("{not json");
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let store = MemoryStore::with_record(r#"{"totalCurrency": 42}"#);
        let profile = Profile::load(&store);
        assert_eq!(profile.total_currency, 42);
        assert_eq!(profile.permanent_upgrades, PermanentUpgrades::default());
    }

    #[test]
    fn test_save_and_reload() {
        let store = MemoryStore::new();
        let mut profile = Profile::default();
        profile.bank(30);
        assert!(profile.purchase(PermanentUpgradeKind::ShieldDuration));
        profile.save(&store).unwrap();

        let json = store.record().unwrap();
        assert!(json.contains("\"permanentUpgrades\""));
        assert!(json.contains("\"totalCurrency\":20"));

        let reloaded = Profile::load(&store);
        assert_eq!(reloaded, profile);
        assert_eq!(reloaded.permanent_upgrades.shield_duration, 1);
    }

    #[test]
    fn test_purchase_unaffordable() {
        let mut profile = Profile {
            total_currency: 9,
            ..Default::default()
        };
        assert!(!profile.purchase(PermanentUpgradeKind::ShieldDuration));
        assert_eq!(profile.total_currency, 9);
    }
}
