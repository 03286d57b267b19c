//! Permanent (meta) upgrades bought between runs

use serde::{Deserialize, Serialize};

/// Permanent upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermanentUpgradeKind {
    ShieldDuration,
    SparkYield,
    StartHealth,
    HealthRegen,
}

impl PermanentUpgradeKind {
    pub const ALL: [PermanentUpgradeKind; 4] = [
        PermanentUpgradeKind::ShieldDuration,
        PermanentUpgradeKind::SparkYield,
        PermanentUpgradeKind::StartHealth,
        PermanentUpgradeKind::HealthRegen,
    ];

    /// Base cost; the n-th purchase (0-based level n) costs `(n + 1) * base`
    pub fn base_cost(&self) -> u64 {
        match self {
            PermanentUpgradeKind::ShieldDuration => 10,
            PermanentUpgradeKind::SparkYield => 15,
            PermanentUpgradeKind::StartHealth => 20,
            PermanentUpgradeKind::HealthRegen => 25,
        }
    }

    pub fn cost(&self, level: u32) -> u64 {
        (u64::from(level) + 1) * self.base_cost()
    }

    pub fn name(&self) -> &'static str {
        match self {
            PermanentUpgradeKind::ShieldDuration => "Shield Duration",
            PermanentUpgradeKind::SparkYield => "Spark Yield",
            PermanentUpgradeKind::StartHealth => "Starting Health",
            PermanentUpgradeKind::HealthRegen => "Health Regeneration",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PermanentUpgradeKind::ShieldDuration => "+30% parry duration per level",
            PermanentUpgradeKind::SparkYield => "+150% sparks from defeated enemies per level",
            PermanentUpgradeKind::StartHealth => "+0.75 starting health per level (rounded down)",
            PermanentUpgradeKind::HealthRegen => "Heal faster with every level",
        }
    }
}

/// Uncapped levels, persisted across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermanentUpgrades {
    pub shield_duration: u32,
    pub spark_yield: u32,
    pub start_health: u32,
    pub health_regen: u32,
}

impl PermanentUpgrades {
    pub fn level(&self, kind: PermanentUpgradeKind) -> u32 {
        match kind {
            PermanentUpgradeKind::ShieldDuration => self.shield_duration,
            PermanentUpgradeKind::SparkYield => self.spark_yield,
            PermanentUpgradeKind::StartHealth => self.start_health,
            PermanentUpgradeKind::HealthRegen => self.health_regen,
        }
    }

    fn level_mut(&mut self, kind: PermanentUpgradeKind) -> &mut u32 {
        match kind {
            PermanentUpgradeKind::ShieldDuration => &mut self.shield_duration,
            PermanentUpgradeKind::SparkYield => &mut self.spark_yield,
            PermanentUpgradeKind::StartHealth => &mut self.start_health,
            PermanentUpgradeKind::HealthRegen => &mut self.health_regen,
        }
    }

    /// Price of the next level of `kind`
    pub fn next_cost(&self, kind: PermanentUpgradeKind) -> u64 {
        kind.cost(self.level(kind))
    }
}

/// One row of the shop screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOffer {
    pub kind: PermanentUpgradeKind,
    pub name: &'static str,
    pub description: &'static str,
    pub level: u32,
    pub cost: u64,
    pub affordable: bool,
}

impl PurchaseOffer {
    pub fn table(upgrades: &PermanentUpgrades, total_sparks: u64) -> Vec<PurchaseOffer> {
        PermanentUpgradeKind::ALL
            .into_iter()
            .map(|kind| {
                let cost = upgrades.next_cost(kind);
                PurchaseOffer {
                    kind,
                    name: kind.name(),
                    description: kind.description(),
                    level: upgrades.level(kind),
                    cost,
                    affordable: total_sparks >= cost,
                }
            })
            .collect()
    }
}

/// Buy one level if affordable. Returns false (and changes nothing) otherwise.
pub fn purchase(
    upgrades: &mut PermanentUpgrades,
    total_sparks: &mut u64,
    kind: PermanentUpgradeKind,
) -> bool {
    let cost = upgrades.next_cost(kind);
    if *total_sparks < cost {
        return false;
    }
    *total_sparks -= cost;
    *upgrades.level_mut(kind) += 1;
    true
}
