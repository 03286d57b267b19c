//! Upgrade economy
//!
//! - `temporary`: run-scoped, capped upgrades offered after each wave clear
//! - `permanent`: persisted, uncapped upgrades bought with banked sparks
//! - `effects`: pure coefficients derived from both

pub mod effects;
pub mod permanent;
pub mod temporary;

pub use effects::UpgradeEffects;
pub use permanent::{PermanentUpgradeKind, PermanentUpgrades, PurchaseOffer, purchase};
pub use temporary::{
    TemporaryUpgradeKind, TemporaryUpgrades, UpgradeOption, apply_upgrade, generate_options,
};
