//! Timed attribute modifiers.
//!
//! The ledger enforces two rules on top of the attribute store:
//! - replace, never stack: a new modifier on an attribute first reverts the
//!   old one, so at most one application per attribute is outstanding
//! - timed restoration: when the countdown runs out (or the modifier is
//!   cancelled) the value captured right before the modifier comes back

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attributes::{Attribute, AttributeStore};

/// How a modifier value combines with the captured baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierMode {
    /// baseline × value (1.5 = +50%, 0.5 = -50%)
    #[default]
    Multiplicative,
    /// baseline + value (+10 crit chance)
    Additive,
    /// value exactly (0 disables the stat)
    Absolute,
}

impl ModifierMode {
    pub fn resolve(self, baseline: f32, value: f32) -> f32 {
        match self {
            ModifierMode::Multiplicative => baseline * value,
            ModifierMode::Additive => baseline + value,
            ModifierMode::Absolute => value,
        }
    }
}

/// Designer-authored modifier, as found in reward and penalty lists
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierEntry {
    pub attribute: Attribute,
    pub value: f32,
    #[serde(default)]
    pub mode: ModifierMode,
    pub duration: f32,
}

impl ModifierEntry {
    pub fn new(attribute: Attribute, value: f32, mode: ModifierMode, duration: f32) -> Self {
        Self {
            attribute,
            value,
            mode,
            duration,
        }
    }
}

/// One active, timed change to a single attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierApplication {
    pub attribute: Attribute,
    pub value: f32,
    pub mode: ModifierMode,
    pub duration: f32,
    pub remaining: f32,
}

/// Owns every outstanding modifier and its countdown
#[derive(Debug, Clone, Default)]
pub struct ModifierLedger {
    active: BTreeMap<Attribute, ModifierApplication>,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self {
            active: BTreeMap::new(),
        }
    }

    /// Apply a modifier, replacing any active one on the same attribute.
    /// Returns the new live value, or None when the modifier was rejected.
    pub fn apply(
        &mut self,
        store: &mut AttributeStore,
        attribute: Attribute,
        value: f32,
        mode: ModifierMode,
        duration: f32,
    ) -> Option<f32> {
        if !value.is_finite() || !duration.is_finite() || duration <= 0.0 {
            warn!(
                ?attribute,
                value, duration, "Ignoring modifier with invalid value or duration"
            );
            return None;
        }

        if self.active.remove(&attribute).is_some() {
            store.release_baseline(attribute);
            debug!(?attribute, "Replacing active modifier");
        }

        let baseline = store.capture_baseline(attribute);
        let live = mode.resolve(baseline, value);
        store.set_live(attribute, live);

        self.active.insert(
            attribute,
            ModifierApplication {
                attribute,
                value,
                mode,
                duration,
                remaining: duration,
            },
        );

        debug!(
            ?attribute,
            ?mode,
            value,
            baseline,
            live,
            duration,
            "Applied modifier"
        );
        Some(live)
    }

    /// Apply every entry in order. Later entries on the same attribute replace earlier ones.
    pub fn apply_entries(&mut self, store: &mut AttributeStore, entries: &[ModifierEntry]) {
        for entry in entries {
            self.apply(store, entry.attribute, entry.value, entry.mode, entry.duration);
        }
    }

    /// Count down every modifier, restoring the ones that ran out.
    /// Returns each expired attribute with its restored value.
    pub fn tick(&mut self, store: &mut AttributeStore, dt: f32) -> Vec<(Attribute, f32)> {
        puffin::profile_function!();

        if !dt.is_finite() || dt <= 0.0 {
            return Vec::new();
        }

        let mut expired = Vec::new();
        for application in self.active.values_mut() {
            application.remaining -= dt;
            if application.remaining <= 0.0 {
                expired.push(application.attribute);
            }
        }

        expired
            .into_iter()
            .filter_map(|attribute| self.cancel(store, attribute).map(|v| (attribute, v)))
            .collect()
    }

    /// Restore an attribute early. Returns the restored value if a modifier was active.
    pub fn cancel(&mut self, store: &mut AttributeStore, attribute: Attribute) -> Option<f32> {
        self.active.remove(&attribute)?;
        store.release_baseline(attribute);
        let restored = store.get_live(attribute);
        debug!(?attribute, restored, "Removed modifier");
        Some(restored)
    }

    /// Restore every attribute. Must run before the owning session tears down.
    pub fn cancel_all(&mut self, store: &mut AttributeStore) -> Vec<(Attribute, f32)> {
        let attributes: Vec<Attribute> = self.active.keys().copied().collect();
        attributes
            .into_iter()
            .filter_map(|attribute| self.cancel(store, attribute).map(|v| (attribute, v)))
            .collect()
    }

    pub fn is_active(&self, attribute: Attribute) -> bool {
        self.active.contains_key(&attribute)
    }

    pub fn remaining(&self, attribute: Attribute) -> Option<f32> {
        self.active.get(&attribute).map(|a| a.remaining)
    }

    pub fn active(&self) -> impl Iterator<Item = &ModifierApplication> {
        self.active.values()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Human-readable list of active modifiers, empty when none are active
    pub fn describe_active(&self) -> String {
        if self.active.is_empty() {
            return String::new();
        }

        let mut description = String::from("Active Modifiers:\n");
        for application in self.active.values() {
            description.push_str(&format!(
                "{}: {:.1}s\n",
                application.attribute.name(),
                application.remaining
            ));
        }
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_for(ledger: &mut ModifierLedger, store: &mut AttributeStore, seconds: f32, dt: f32) {
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            ledger.tick(store, dt);
        }
    }

    #[test]
    fn test_multiplicative_applies_and_reverts() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();

        let live = ledger.apply(
            &mut store,
            Attribute::DamageMultiplier,
            1.5,
            ModifierMode::Multiplicative,
            10.0,
        );
        assert_eq!(live, Some(1.5));
        assert_eq!(store.get_live(Attribute::DamageMultiplier), 1.5);

        tick_for(&mut ledger, &mut store, 9.5, 0.5);
        assert!(ledger.is_active(Attribute::DamageMultiplier));

        ledger.tick(&mut store, 0.5);
        assert!(!ledger.is_active(Attribute::DamageMultiplier));
        assert_eq!(store.get_live(Attribute::DamageMultiplier), 1.0);
        assert!(!store.has_baseline(Attribute::DamageMultiplier));
    }

    #[test]
    fn test_absolute_overrides_and_reverts() {
        let mut store = AttributeStore::new().with_value(Attribute::CriticalChance, 10.0);
        let mut ledger = ModifierLedger::new();

        ledger.apply(&mut store, Attribute::CriticalChance, 0.0, ModifierMode::Absolute, 5.0);
        assert_eq!(store.get_live(Attribute::CriticalChance), 0.0);

        tick_for(&mut ledger, &mut store, 5.0, 0.25);
        assert_eq!(store.get_live(Attribute::CriticalChance), 10.0);
    }

    #[test]
    fn test_additive_adds_to_baseline() {
        let mut store = AttributeStore::new().with_value(Attribute::CriticalChance, 10.0);
        let mut ledger = ModifierLedger::new();

        ledger.apply(&mut store, Attribute::CriticalChance, 5.0, ModifierMode::Additive, 1.0);
        assert_eq!(store.get_live(Attribute::CriticalChance), 15.0);
    }

    #[test]
    fn test_replace_not_stack() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();

        let speed = Attribute::MoveSpeedMultiplier;
        ledger.apply(&mut store, speed, 2.0, ModifierMode::Multiplicative, 10.0);
        ledger.apply(&mut store, speed, 1.5, ModifierMode::Multiplicative, 10.0);

        // Second application computes from the original baseline, not from 2.0
        assert_eq!(store.get_live(Attribute::MoveSpeedMultiplier), 1.5);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.remaining(Attribute::MoveSpeedMultiplier), Some(10.0));

        ledger.cancel(&mut store, Attribute::MoveSpeedMultiplier);
        assert_eq!(store.get_live(Attribute::MoveSpeedMultiplier), 1.0);
    }

    #[test]
    fn test_restores_value_present_before_apply() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();

        // Host changed the stat before the modifier - that value comes back, not the default
        store.set_live(Attribute::GoldMultiplier, 1.2);
        ledger.apply(&mut store, Attribute::GoldMultiplier, 0.5, ModifierMode::Absolute, 2.0);
        tick_for(&mut ledger, &mut store, 2.0, 1.0);
        assert_eq!(store.get_live(Attribute::GoldMultiplier), 1.2);
    }

    #[test]
    fn test_invalid_duration_is_ignored() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();

        let size = Attribute::SizeMultiplier;
        let mode = ModifierMode::Multiplicative;
        assert_eq!(ledger.apply(&mut store, size, 2.0, mode, 0.0), None);
        assert_eq!(ledger.apply(&mut store, size, f32::NAN, mode, 1.0), None);
        assert!(ledger.is_empty());
        assert_eq!(store.get_live(Attribute::SizeMultiplier), 1.0);
        assert!(!store.has_baseline(Attribute::SizeMultiplier));
    }

    #[test]
    fn test_cancel_all_restores_everything() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();
        ledger.apply_entries(
            &mut store,
            &[
                ModifierEntry::new(Attribute::XpMultiplier, 0.5, ModifierMode::Absolute, 30.0),
                ModifierEntry::new(Attribute::GoldMultiplier, 0.5, ModifierMode::Absolute, 30.0),
                ModifierEntry::new(
                    Attribute::DamageReductionBonus,
                    20.0,
                    ModifierMode::Additive,
                    30.0,
                ),
            ],
        );
        assert_eq!(ledger.len(), 3);

        let restored = ledger.cancel_all(&mut store);
        assert_eq!(restored.len(), 3);
        assert!(ledger.is_empty());
        for attribute in Attribute::ALL {
            assert_eq!(store.get_live(attribute), attribute.default_value());
            assert!(!store.has_baseline(attribute));
        }
    }

    #[test]
    fn test_non_finite_tick_does_not_freeze_countdown() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();
        let mode = ModifierMode::Multiplicative;
        ledger.apply(&mut store, Attribute::DamageMultiplier, 1.5, mode, 1.0);

        assert!(ledger.tick(&mut store, f32::NAN).is_empty());
        assert!(ledger.tick(&mut store, f32::INFINITY).is_empty());
        assert_eq!(ledger.remaining(Attribute::DamageMultiplier), Some(1.0));

        ledger.tick(&mut store, 100.0);
        assert!(ledger.is_empty());
        assert_eq!(store.get_live(Attribute::DamageMultiplier), 1.0);
        assert!(!store.has_baseline(Attribute::DamageMultiplier));
    }

    #[test]
    fn test_cancel_unknown_is_noop() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();
        assert_eq!(ledger.cancel(&mut store, Attribute::CooldownMultiplier), None);
    }

    #[test]
    fn test_tick_reports_restored_values() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();
        let mode = ModifierMode::Multiplicative;
        ledger.apply(&mut store, Attribute::DurationMultiplier, 3.0, mode, 1.0);
        ledger.apply(&mut store, Attribute::SizeMultiplier, 3.0, mode, 2.0);

        let expired = ledger.tick(&mut store, 1.0);
        assert_eq!(expired, vec![(Attribute::DurationMultiplier, 1.0)]);
        assert!(ledger.is_active(Attribute::SizeMultiplier));
    }

    #[test]
    fn test_describe_active() {
        let mut store = AttributeStore::new();
        let mut ledger = ModifierLedger::new();
        assert_eq!(ledger.describe_active(), "");

        let mode = ModifierMode::Multiplicative;
        ledger.apply(&mut store, Attribute::DamageMultiplier, 1.5, mode, 10.0);
        ledger.tick(&mut store, 2.5);
        assert_eq!(ledger.describe_active(), "Active Modifiers:\nDamage: 7.5s\n");
    }

    #[test]
    fn test_entry_mode_defaults_to_multiplicative() {
        let entry: ModifierEntry = serde_json::from_str(
            r#"{"attribute": "damage_multiplier", "value": 1.5, "duration": 10}"#,
        )
        .unwrap();
        assert_eq!(entry.mode, ModifierMode::Multiplicative);
    }
}
