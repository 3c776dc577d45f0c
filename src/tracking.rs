//! Run-wide combat counters: kills and per-ability damage.
//!
//! Both only grow during a run. Challenges read them through the probe and
//! diff against the value they captured at start.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Damage sources tracked separately in the damage report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Boulder,
    Fireball,
    FlyingDagger,
    ForceField,
    IceShard,
    Lightning,
    MagicRune,
    ShootingStar,
    SunRay,
    Sword,
    Wand,
}

impl AbilityKind {
    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Boulder => "Boulder",
            AbilityKind::Fireball => "Fireball",
            AbilityKind::FlyingDagger => "Flying Dagger",
            AbilityKind::ForceField => "Force Field",
            AbilityKind::IceShard => "Ice Shard",
            AbilityKind::Lightning => "Lightning",
            AbilityKind::MagicRune => "Magic Rune",
            AbilityKind::ShootingStar => "Shooting Star",
            AbilityKind::SunRay => "Sun Ray",
            AbilityKind::Sword => "Sword",
            AbilityKind::Wand => "Wand",
        }
    }
}

/// Total damage dealt per ability during a run
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    by_ability: HashMap<AbilityKind, f32>,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call whenever an enemy takes damage from an ability
    pub fn report_damage(&mut self, ability: AbilityKind, amount: f32) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        *self.by_ability.entry(ability).or_insert(0.0) += amount;
    }

    pub fn damage_by(&self, ability: AbilityKind) -> f32 {
        self.by_ability.get(&ability).copied().unwrap_or(0.0)
    }

    pub fn total_damage(&self) -> f32 {
        self.by_ability.values().sum()
    }

    /// Per-ability totals, highest first
    pub fn report(&self) -> Vec<(AbilityKind, f32)> {
        let mut rows: Vec<(AbilityKind, f32)> =
            self.by_ability.iter().map(|(k, v)| (*k, *v)).collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }

    pub fn log_report(&self) {
        info!("Damage report");
        for (ability, damage) in self.report() {
            info!("  {}: {:.0} dmg", ability.name(), damage);
        }
        info!("  TOTAL: {:.0} dmg", self.total_damage());
    }

    /// Call when starting a new run
    pub fn reset(&mut self) {
        self.by_ability.clear();
    }
}

/// Enemies killed during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillCounter {
    kills: u32,
}

impl KillCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.kills
    }

    pub fn reset(&mut self) {
        self.kills = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_accumulates_per_ability() {
        let mut tracker = DamageTracker::new();
        tracker.report_damage(AbilityKind::Fireball, 40.0);
        tracker.report_damage(AbilityKind::Fireball, 10.0);
        tracker.report_damage(AbilityKind::Sword, 25.0);

        assert_eq!(tracker.damage_by(AbilityKind::Fireball), 50.0);
        assert_eq!(tracker.damage_by(AbilityKind::Wand), 0.0);
        assert_eq!(tracker.total_damage(), 75.0);
        assert_eq!(
            tracker.report(),
            vec![(AbilityKind::Fireball, 50.0), (AbilityKind::Sword, 25.0)]
        );
    }

    #[test]
    fn test_ignores_non_positive_damage() {
        let mut tracker = DamageTracker::new();
        tracker.report_damage(AbilityKind::Lightning, -5.0);
        tracker.report_damage(AbilityKind::Lightning, f32::NAN);
        assert_eq!(tracker.total_damage(), 0.0);
    }

    #[test]
    fn test_reset_clears_run() {
        let mut tracker = DamageTracker::new();
        let mut kills = KillCounter::new();
        tracker.report_damage(AbilityKind::IceShard, 12.0);
        kills.record_kill();
        tracker.reset();
        kills.reset();
        assert_eq!(tracker.total_damage(), 0.0);
        assert_eq!(kills.total(), 0);
    }
}
