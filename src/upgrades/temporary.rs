//! Temporary (run-scoped) upgrades

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Temporary upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporaryUpgradeKind {
    ParrySize,
    ParryDuration,
    DoubleSparks,
    HealthRegen,
    ParryCooldown,
    SparkMagnet,
    ExtraHealth,
}

impl TemporaryUpgradeKind {
    /// Catalog order
    pub const ALL: [TemporaryUpgradeKind; 7] = [
        TemporaryUpgradeKind::ParrySize,
        TemporaryUpgradeKind::ParryDuration,
        TemporaryUpgradeKind::DoubleSparks,
        TemporaryUpgradeKind::HealthRegen,
        TemporaryUpgradeKind::ParryCooldown,
        TemporaryUpgradeKind::SparkMagnet,
        TemporaryUpgradeKind::ExtraHealth,
    ];

    /// Stable identifier used by UI collaborators
    pub fn id(&self) -> &'static str {
        match self {
            TemporaryUpgradeKind::ParrySize => "parry_size",
            TemporaryUpgradeKind::ParryDuration => "parry_duration",
            TemporaryUpgradeKind::DoubleSparks => "double_sparks",
            TemporaryUpgradeKind::HealthRegen => "health_regen",
            TemporaryUpgradeKind::ParryCooldown => "parry_cooldown",
            TemporaryUpgradeKind::SparkMagnet => "spark_magnet",
            TemporaryUpgradeKind::ExtraHealth => "extra_health",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn max_stacks(&self) -> u32 {
        match self {
            TemporaryUpgradeKind::ParrySize => 8,
            TemporaryUpgradeKind::ParryDuration => 6,
            TemporaryUpgradeKind::DoubleSparks => 10,
            TemporaryUpgradeKind::HealthRegen => 3,
            TemporaryUpgradeKind::ParryCooldown => 4,
            TemporaryUpgradeKind::SparkMagnet => 3,
            TemporaryUpgradeKind::ExtraHealth => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemporaryUpgradeKind::ParrySize => "Wider Light Shield",
            TemporaryUpgradeKind::ParryDuration => "Longer Light Pulse",
            TemporaryUpgradeKind::DoubleSparks => "Spark Doubler",
            TemporaryUpgradeKind::HealthRegen => "Healing Light",
            TemporaryUpgradeKind::ParryCooldown => "Quicker Reflexes",
            TemporaryUpgradeKind::SparkMagnet => "Light Magnet",
            TemporaryUpgradeKind::ExtraHealth => "Reinforced Shell",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemporaryUpgradeKind::ParrySize => "+5% parry shield size",
            TemporaryUpgradeKind::ParryDuration => "+10% parry shield duration",
            TemporaryUpgradeKind::DoubleSparks => "+10% chance to double collected sparks",
            TemporaryUpgradeKind::HealthRegen => "Regenerate health over time",
            TemporaryUpgradeKind::ParryCooldown => "-15% parry cooldown",
            TemporaryUpgradeKind::SparkMagnet => "Pull sparks in from further away",
            TemporaryUpgradeKind::ExtraHealth => "+1 health and max health",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TemporaryUpgradeKind::ParrySize => "🛡️",
            TemporaryUpgradeKind::ParryDuration => "⏱️",
            TemporaryUpgradeKind::DoubleSparks => "✨",
            TemporaryUpgradeKind::HealthRegen => "❤️",
            TemporaryUpgradeKind::ParryCooldown => "⚡",
            TemporaryUpgradeKind::SparkMagnet => "🧲",
            TemporaryUpgradeKind::ExtraHealth => "💚",
        }
    }
}

/// Stack counts for the current run, each within `[0, max_stacks]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporaryUpgrades {
    pub parry_size: u32,
    pub parry_duration: u32,
    pub double_sparks: u32,
    pub health_regen: u32,
    pub parry_cooldown: u32,
    pub spark_magnet: u32,
    pub extra_health: u32,
}

impl TemporaryUpgrades {
    pub fn level(&self, kind: TemporaryUpgradeKind) -> u32 {
        match kind {
            TemporaryUpgradeKind::ParrySize => self.parry_size,
            TemporaryUpgradeKind::ParryDuration => self.parry_duration,
            TemporaryUpgradeKind::DoubleSparks => self.double_sparks,
            TemporaryUpgradeKind::HealthRegen => self.health_regen,
            TemporaryUpgradeKind::ParryCooldown => self.parry_cooldown,
            TemporaryUpgradeKind::SparkMagnet => self.spark_magnet,
            TemporaryUpgradeKind::ExtraHealth => self.extra_health,
        }
    }

    fn level_mut(&mut self, kind: TemporaryUpgradeKind) -> &mut u32 {
        match kind {
            TemporaryUpgradeKind::ParrySize => &mut self.parry_size,
            TemporaryUpgradeKind::ParryDuration => &mut self.parry_duration,
            TemporaryUpgradeKind::DoubleSparks => &mut self.double_sparks,
            TemporaryUpgradeKind::HealthRegen => &mut self.health_regen,
            TemporaryUpgradeKind::ParryCooldown => &mut self.parry_cooldown,
            TemporaryUpgradeKind::SparkMagnet => &mut self.spark_magnet,
            TemporaryUpgradeKind::ExtraHealth => &mut self.extra_health,
        }
    }

    pub fn is_maxed(&self, kind: TemporaryUpgradeKind) -> bool {
        self.level(kind) >= kind.max_stacks()
    }
}

/// One entry on the upgrade-selection screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeOption {
    pub kind: TemporaryUpgradeKind,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub current_level: u32,
    pub max_level: u32,
}

impl UpgradeOption {
    fn new(kind: TemporaryUpgradeKind, current: &TemporaryUpgrades) -> Self {
        Self {
            kind,
            name: kind.name(),
            description: kind.description(),
            icon: kind.icon(),
            current_level: current.level(kind),
            max_level: kind.max_stacks(),
        }
    }
}

/// Pick up to 3 distinct, not-yet-maxed kinds uniformly without replacement
pub fn generate_options<R: Rng>(
    current: &TemporaryUpgrades,
    wave: u32,
    rng: &mut R,
) -> Vec<UpgradeOption> {
    let mut eligible: Vec<TemporaryUpgradeKind> = TemporaryUpgradeKind::ALL
        .into_iter()
        .filter(|kind| !current.is_maxed(*kind))
        .collect();

    let count = eligible.len().min(3);
    let mut options = Vec::with_capacity(count);
    for _ in 0..count {
        let picked = eligible.remove(rng.random_range(0..eligible.len()));
        options.push(UpgradeOption::new(picked, current));
    }

    log::debug!(
        "Wave {} upgrade options: {:?}",
        wave,
        options.iter().map(|o| o.kind.id()).collect::<Vec<_>>()
    );
    options
}

/// Increment one stack; a maxed kind returns the mapping unchanged
pub fn apply_upgrade(current: &TemporaryUpgrades, kind: TemporaryUpgradeKind) -> TemporaryUpgrades {
    let mut next = *current;
    if !current.is_maxed(kind) {
        *next.level_mut(kind) += 1;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn maxed_except(keep: &[TemporaryUpgradeKind]) -> TemporaryUpgrades {
        let mut upgrades = TemporaryUpgrades::default();
        for kind in TemporaryUpgradeKind::ALL {
            if !keep.contains(&kind) {
                *upgrades.level_mut(kind) = kind.max_stacks();
            }
        }
        upgrades
    }

    #[test]
    fn test_apply_at_cap_is_noop() {
        let current = TemporaryUpgrades {
            extra_health: 2,
            ..Default::default()
        };
        let next = apply_upgrade(&current, TemporaryUpgradeKind::ExtraHealth);
        assert_eq!(next, current);
    }

    #[test]
    fn test_apply_increments_one_kind() {
        let next = apply_upgrade(&TemporaryUpgrades::default(), TemporaryUpgradeKind::SparkMagnet);
        assert_eq!(next.spark_magnet, 1);
        assert_eq!(
            TemporaryUpgradeKind::ALL.iter().map(|k| next.level(*k)).sum::<u32>(),
            1
        );
    }

    #[test]
    fn test_options_distinct_and_eligible() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let options = generate_options(&TemporaryUpgrades::default(), 1, &mut rng);
            assert_eq!(options.len(), 3);
            assert_ne!(options[0].kind, options[1].kind);
            assert_ne!(options[0].kind, options[2].kind);
            assert_ne!(options[1].kind, options[2].kind);
        }
    }

    #[test]
    fn test_options_shrink_when_few_eligible() {
        let mut rng = Pcg32::seed_from_u64(3);
        let current = maxed_except(&[TemporaryUpgradeKind::HealthRegen]);
        let options = generate_options(&current, 4, &mut rng);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].kind, TemporaryUpgradeKind::HealthRegen);
        assert_eq!(options[0].max_level, 3);

        let all_maxed = maxed_except(&[]);
        assert!(generate_options(&all_maxed, 9, &mut rng).is_empty());
    }

    #[test]
    fn test_option_reports_current_level() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut current = maxed_except(&[TemporaryUpgradeKind::ParrySize]);
        current.parry_size = 5;
        let options = generate_options(&current, 2, &mut rng);
        assert_eq!(options[0].current_level, 5);
        assert_eq!(options[0].max_level, 8);
    }

    #[test]
    fn test_id_round_trip() {
        for kind in TemporaryUpgradeKind::ALL {
            assert_eq!(TemporaryUpgradeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(TemporaryUpgradeKind::from_id("laser_eyes"), None);
    }

    proptest! {
        #[test]
        fn prop_stacks_never_exceed_cap(picks in proptest::collection::vec(0usize..7, 0..80)) {
            let mut upgrades = TemporaryUpgrades::default();
            for pick in picks {
                upgrades = apply_upgrade(&upgrades, TemporaryUpgradeKind::ALL[pick]);
            }
            for kind in TemporaryUpgradeKind::ALL {
                prop_assert!(upgrades.level(kind) <= kind.max_stacks());
            }
        }
    }
}
