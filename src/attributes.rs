//! Modifiable player attributes and the store holding their live values.
//!
//! The store is the single source of truth every other system reads from.
//! Only the modifier ledger writes to it during play; baselines are captured
//! lazily the first time a modifier touches an attribute.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Whether an attribute scales something or adds percentage points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeNature {
    Multiplier,
    Percent,
}

/// One modifiable player stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    DamageMultiplier,
    MoveSpeedMultiplier,
    MagnetRadiusMultiplier,
    XpMultiplier,
    CooldownMultiplier,
    DamageReductionBonus,
    ProjectileSpeedMultiplier,
    SizeMultiplier,
    DurationMultiplier,
    GoldMultiplier,
    CriticalChance,
    CriticalMultiplierMin,
    CriticalMultiplierMax,
}

impl Attribute {
    pub const COUNT: usize = 13;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::DamageMultiplier,
        Attribute::MoveSpeedMultiplier,
        Attribute::MagnetRadiusMultiplier,
        Attribute::XpMultiplier,
        Attribute::CooldownMultiplier,
        Attribute::DamageReductionBonus,
        Attribute::ProjectileSpeedMultiplier,
        Attribute::SizeMultiplier,
        Attribute::DurationMultiplier,
        Attribute::GoldMultiplier,
        Attribute::CriticalChance,
        Attribute::CriticalMultiplierMin,
        Attribute::CriticalMultiplierMax,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn nature(self) -> AttributeNature {
        match self {
            Attribute::DamageReductionBonus | Attribute::CriticalChance => AttributeNature::Percent,
            _ => AttributeNature::Multiplier,
        }
    }

    /// Value an attribute holds before anything registers or modifies it
    pub fn default_value(self) -> f32 {
        match self.nature() {
            AttributeNature::Multiplier => DEFAULT_MULTIPLIER,
            AttributeNature::Percent => DEFAULT_PERCENT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::DamageMultiplier => "Damage",
            Attribute::MoveSpeedMultiplier => "Move Speed",
            Attribute::MagnetRadiusMultiplier => "Magnet Radius",
            Attribute::XpMultiplier => "XP",
            Attribute::CooldownMultiplier => "Cooldown",
            Attribute::DamageReductionBonus => "Damage Reduction",
            Attribute::ProjectileSpeedMultiplier => "Projectile Speed",
            Attribute::SizeMultiplier => "Size",
            Attribute::DurationMultiplier => "Duration",
            Attribute::GoldMultiplier => "Gold",
            Attribute::CriticalChance => "Crit Chance",
            Attribute::CriticalMultiplierMin => "Crit Multiplier Min",
            Attribute::CriticalMultiplierMax => "Crit Multiplier Max",
        }
    }
}

/// Live attribute values plus the baselines captured for modified ones.
///
/// A baseline exists for an attribute if and only if a modifier currently
/// targets it. `release_baseline` writes it back and forgets it.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    live: [f32; Attribute::COUNT],
    baselines: [Option<f32>; Attribute::COUNT],
}

impl AttributeStore {
    pub fn new() -> Self {
        Self {
            live: Attribute::ALL.map(Attribute::default_value),
            baselines: [None; Attribute::COUNT],
        }
    }

    /// Register a host-provided starting value (e.g. crit chance of 10)
    pub fn with_value(mut self, attribute: Attribute, value: f32) -> Self {
        self.live[attribute.index()] = value;
        self
    }

    pub fn get_live(&self, attribute: Attribute) -> f32 {
        self.live[attribute.index()]
    }

    pub fn set_live(&mut self, attribute: Attribute, value: f32) {
        self.live[attribute.index()] = value;
    }

    /// Record the current live value as baseline unless one is already held.
    /// Returns the baseline in effect.
    pub fn capture_baseline(&mut self, attribute: Attribute) -> f32 {
        let live = self.live[attribute.index()];
        *self.baselines[attribute.index()].get_or_insert(live)
    }

    /// Restore live = baseline and discard the baseline. No-op without one.
    pub fn release_baseline(&mut self, attribute: Attribute) {
        if let Some(baseline) = self.baselines[attribute.index()].take() {
            self.live[attribute.index()] = baseline;
        }
    }

    pub fn baseline(&self, attribute: Attribute) -> Option<f32> {
        self.baselines[attribute.index()]
    }

    pub fn has_baseline(&self, attribute: Attribute) -> bool {
        self.baselines[attribute.index()].is_some()
    }

    /// Snapshot of every live value, in `Attribute::ALL` order
    pub fn snapshot(&self) -> [(Attribute, f32); Attribute::COUNT] {
        Attribute::ALL.map(|a| (a, self.get_live(a)))
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_nature() {
        let store = AttributeStore::new();
        assert_eq!(store.get_live(Attribute::DamageMultiplier), 1.0);
        assert_eq!(store.get_live(Attribute::GoldMultiplier), 1.0);
        assert_eq!(store.get_live(Attribute::DamageReductionBonus), 0.0);
        assert_eq!(store.get_live(Attribute::CriticalChance), 0.0);
    }

    #[test]
    fn test_all_is_in_index_order() {
        for (i, attribute) in Attribute::ALL.iter().enumerate() {
            assert_eq!(attribute.index(), i);
        }
    }

    #[test]
    fn test_capture_does_not_overwrite_existing_baseline() {
        let mut store = AttributeStore::new().with_value(Attribute::CriticalChance, 10.0);
        assert_eq!(store.capture_baseline(Attribute::CriticalChance), 10.0);
        store.set_live(Attribute::CriticalChance, 25.0);
        assert_eq!(store.capture_baseline(Attribute::CriticalChance), 10.0);
        assert_eq!(store.baseline(Attribute::CriticalChance), Some(10.0));
    }

    #[test]
    fn test_release_restores_and_discards() {
        let mut store = AttributeStore::new();
        store.capture_baseline(Attribute::XpMultiplier);
        store.set_live(Attribute::XpMultiplier, 3.0);
        store.release_baseline(Attribute::XpMultiplier);
        assert_eq!(store.get_live(Attribute::XpMultiplier), 1.0);
        assert!(!store.has_baseline(Attribute::XpMultiplier));
    }

    #[test]
    fn test_release_without_baseline_keeps_live_value() {
        let mut store = AttributeStore::new();
        store.set_live(Attribute::SizeMultiplier, 2.0);
        store.release_baseline(Attribute::SizeMultiplier);
        assert_eq!(store.get_live(Attribute::SizeMultiplier), 2.0);
    }

    #[test]
    fn test_attribute_serializes_snake_case() {
        let json = serde_json::to_string(&Attribute::MoveSpeedMultiplier).unwrap();
        assert_eq!(json, "\"move_speed_multiplier\"");
    }
}
