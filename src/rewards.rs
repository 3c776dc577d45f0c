//! Reward and penalty dispatch.
//!
//! Outcome tables are plain data authored next to each challenge. When a
//! challenge resolves, the dispatcher turns the matching half of the table
//! into modifier ledger calls and one-shot world effects (drops, damage,
//! healing). It never writes attributes itself.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::attributes::{Attribute, AttributeStore};
use crate::constants::*;
use crate::events::{ChallengeEvent, EventQueue};
use crate::modifiers::{ModifierEntry, ModifierLedger, ModifierMode};

/// Pickup kinds the host knows how to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropType {
    SmallGem,
    MediumGem,
    LargeGem,
    Gold,
    Food,
    Magnet,
    Bomb,
    Chest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropSpec {
    pub drop: DropType,
    pub count: u32,
    /// Scatter radius around the player, engine default when omitted
    #[serde(default)]
    pub radius: Option<f32>,
}

/// Canned buffs and penalties designers can reference by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPreset {
    DamageBoost,
    SpeedBoost,
    CritChance,
    TakeDamage,
    Slowdown,
    Curse,
    LockAbilities,
}

impl EffectPreset {
    /// Modifiers this preset applies for `duration` seconds
    pub fn modifiers(self, duration: f32) -> Vec<ModifierEntry> {
        use Attribute::*;
        use ModifierMode::*;

        match self {
            EffectPreset::DamageBoost => vec![ModifierEntry::new(
                DamageMultiplier,
                DAMAGE_BOOST_MULTIPLIER,
                Multiplicative,
                duration,
            )],
            EffectPreset::SpeedBoost => vec![ModifierEntry::new(
                MoveSpeedMultiplier,
                SPEED_BOOST_MULTIPLIER,
                Multiplicative,
                duration,
            )],
            EffectPreset::CritChance => vec![ModifierEntry::new(
                CriticalChance,
                CRIT_CHANCE_BONUS,
                Additive,
                duration,
            )],
            EffectPreset::TakeDamage => Vec::new(),
            EffectPreset::Slowdown => vec![ModifierEntry::new(
                MoveSpeedMultiplier,
                SLOWDOWN_SPEED,
                Absolute,
                duration,
            )],
            EffectPreset::Curse => vec![
                ModifierEntry::new(XpMultiplier, CURSE_MULTIPLIER, Absolute, duration),
                ModifierEntry::new(GoldMultiplier, CURSE_MULTIPLIER, Absolute, duration),
            ],
            EffectPreset::LockAbilities => {
                vec![ModifierEntry::new(DamageMultiplier, 0.0, Absolute, duration)]
            }
        }
    }

    /// One-shot damage this preset deals
    pub fn instant_damage(self) -> f32 {
        match self {
            EffectPreset::TakeDamage => PENALTY_INSTANT_DAMAGE,
            _ => 0.0,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EffectPreset::DamageBoost => "Damage increased by 50%",
            EffectPreset::SpeedBoost => "Movement speed increased by 50%",
            EffectPreset::CritChance => "Critical chance increased by 10",
            EffectPreset::TakeDamage => "Took 50 damage",
            EffectPreset::Slowdown => "Movement speed reduced by 50%",
            EffectPreset::Curse => "XP and Gold reduced by 50%",
            EffectPreset::LockAbilities => "Damage disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub preset: EffectPreset,
    #[serde(default)]
    pub duration: f32,
}

/// Everything that happens for one outcome (success or failure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeEffects {
    pub modifiers: Vec<ModifierEntry>,
    pub presets: Vec<PresetEntry>,
    pub drops: Vec<DropSpec>,
    pub instant_damage: f32,
    pub heal: f32,
}

impl OutcomeEffects {
    pub fn preset(preset: EffectPreset, duration: f32) -> Self {
        Self {
            presets: vec![PresetEntry { preset, duration }],
            ..Default::default()
        }
    }

    pub fn modifier(entry: ModifierEntry) -> Self {
        Self {
            modifiers: vec![entry],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
            && self.presets.is_empty()
            && self.drops.is_empty()
            && self.instant_damage <= 0.0
            && self.heal <= 0.0
    }

    /// Presets expanded first so explicit modifiers on the same attribute win
    pub fn all_modifiers(&self) -> Vec<ModifierEntry> {
        self.presets
            .iter()
            .flat_map(|p| p.preset.modifiers(p.duration))
            .chain(self.modifiers.iter().copied())
            .collect()
    }

    pub fn total_instant_damage(&self) -> f32 {
        self.instant_damage
            + self
                .presets
                .iter()
                .map(|p| p.preset.instant_damage())
                .sum::<f32>()
    }
}

/// Reward on success, penalty on failure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeTable {
    pub reward: OutcomeEffects,
    pub penalty: OutcomeEffects,
}

impl OutcomeTable {
    pub fn for_outcome(&self, success: bool) -> &OutcomeEffects {
        if success {
            &self.reward
        } else {
            &self.penalty
        }
    }
}

/// Host side of one-shot outcome effects
pub trait WorldEffects {
    fn player_position(&self) -> Option<Vec2>;

    /// Spawn `count` pickups scattered on `radius` around `position`
    fn spawn_drop(&mut self, drop: DropType, position: Vec2, count: u32, radius: f32);

    fn damage_player(&mut self, amount: f32);

    fn heal_player(&mut self, amount: f32);
}

/// Points at a random angle on a circle of `radius` around `center`
pub fn scatter_positions(rng: &mut impl Rng, center: Vec2, count: u32, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

/// Translates challenge outcomes into ledger calls and world effects
#[derive(Debug, Clone)]
pub struct RewardPenaltyDispatcher {
    default_drop_radius: f32,
}

impl RewardPenaltyDispatcher {
    pub fn new(default_drop_radius: f32) -> Self {
        Self {
            default_drop_radius,
        }
    }

    pub fn dispatch(
        &self,
        outcomes: &OutcomeTable,
        success: bool,
        ledger: &mut ModifierLedger,
        store: &mut AttributeStore,
        world: &mut dyn WorldEffects,
        events: &mut EventQueue,
    ) {
        let effects = outcomes.for_outcome(success);
        if effects.is_empty() {
            debug!(success, "No outcome effects to dispatch");
            return;
        }
        info!(success, "Dispatching challenge outcome");

        for entry in effects.all_modifiers() {
            let applied = ledger.apply(
                store,
                entry.attribute,
                entry.value,
                entry.mode,
                entry.duration,
            );
            if let Some(value) = applied {
                events.push(ChallengeEvent::ModifierApplied {
                    attribute: entry.attribute,
                    value,
                    duration: entry.duration,
                });
            }
        }

        let damage = effects.total_instant_damage();
        if damage > 0.0 {
            world.damage_player(damage);
            events.push(ChallengeEvent::PlayerDamaged { amount: damage });
        }

        if effects.heal > 0.0 {
            world.heal_player(effects.heal);
            events.push(ChallengeEvent::PlayerHealed {
                amount: effects.heal,
            });
        }

        if effects.drops.is_empty() {
            return;
        }
        let Some(position) = world.player_position() else {
            warn!("No player position, skipping reward drops");
            return;
        };
        for spec in &effects.drops {
            let radius = spec.radius.unwrap_or(self.default_drop_radius);
            world.spawn_drop(spec.drop, position, spec.count, radius);
            events.push(ChallengeEvent::DropSpawned {
                drop: spec.drop,
                count: spec.count,
            });
        }
    }
}

impl Default for RewardPenaltyDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DROP_RADIUS)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Records every world effect call
    #[derive(Debug, Default)]
    pub(crate) struct RecordingWorld {
        pub position: Option<Vec2>,
        pub drops: Vec<(DropType, Vec2, u32, f32)>,
        pub damage_taken: f32,
        pub healed: f32,
    }

    impl WorldEffects for RecordingWorld {
        fn player_position(&self) -> Option<Vec2> {
            self.position
        }
        fn spawn_drop(&mut self, drop: DropType, position: Vec2, count: u32, radius: f32) {
            self.drops.push((drop, position, count, radius));
        }
        fn damage_player(&mut self, amount: f32) {
            self.damage_taken += amount;
        }
        fn heal_player(&mut self, amount: f32) {
            self.healed += amount;
        }
    }

    fn table() -> OutcomeTable {
        OutcomeTable {
            reward: OutcomeEffects {
                modifiers: vec![ModifierEntry::new(
                    Attribute::DamageMultiplier,
                    2.0,
                    ModifierMode::Multiplicative,
                    10.0,
                )],
                drops: vec![DropSpec {
                    drop: DropType::Gold,
                    count: 5,
                    radius: None,
                }],
                heal: 20.0,
                ..Default::default()
            },
            penalty: OutcomeEffects::preset(EffectPreset::TakeDamage, 0.0),
        }
    }

    #[test]
    fn test_success_applies_reward_half() {
        let dispatcher = RewardPenaltyDispatcher::default();
        let mut ledger = ModifierLedger::new();
        let mut store = AttributeStore::new();
        let mut world = RecordingWorld {
            position: Some(Vec2::new(3.0, 4.0)),
            ..Default::default()
        };
        let mut events = EventQueue::new();

        dispatcher.dispatch(&table(), true, &mut ledger, &mut store, &mut world, &mut events);

        assert_eq!(store.get_live(Attribute::DamageMultiplier), 2.0);
        assert_eq!(
            world.drops,
            vec![(DropType::Gold, Vec2::new(3.0, 4.0), 5, DEFAULT_DROP_RADIUS)]
        );
        assert_eq!(world.healed, 20.0);
        assert_eq!(world.damage_taken, 0.0);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_failure_applies_penalty_half() {
        let dispatcher = RewardPenaltyDispatcher::default();
        let mut ledger = ModifierLedger::new();
        let mut store = AttributeStore::new();
        let mut world = RecordingWorld::default();
        let mut events = EventQueue::new();

        dispatcher.dispatch(&table(), false, &mut ledger, &mut store, &mut world, &mut events);

        assert!(ledger.is_empty());
        assert_eq!(world.damage_taken, PENALTY_INSTANT_DAMAGE);
        assert!(world.drops.is_empty());
    }

    #[test]
    fn test_drops_skipped_without_player() {
        let dispatcher = RewardPenaltyDispatcher::default();
        let mut ledger = ModifierLedger::new();
        let mut store = AttributeStore::new();
        let mut world = RecordingWorld::default();
        let mut events = EventQueue::new();

        dispatcher.dispatch(&table(), true, &mut ledger, &mut store, &mut world, &mut events);
        assert!(world.drops.is_empty());
        // Modifiers and healing still went through
        assert!(ledger.is_active(Attribute::DamageMultiplier));
        assert_eq!(world.healed, 20.0);
    }

    #[test]
    fn test_explicit_modifier_overrides_preset() {
        let effects = OutcomeEffects {
            presets: vec![PresetEntry {
                preset: EffectPreset::Slowdown,
                duration: 5.0,
            }],
            modifiers: vec![ModifierEntry::new(
                Attribute::MoveSpeedMultiplier,
                0.8,
                ModifierMode::Absolute,
                5.0,
            )],
            ..Default::default()
        };
        let mut ledger = ModifierLedger::new();
        let mut store = AttributeStore::new();
        ledger.apply_entries(&mut store, &effects.all_modifiers());
        assert_eq!(store.get_live(Attribute::MoveSpeedMultiplier), 0.8);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_curse_preset_touches_xp_and_gold() {
        let entries = EffectPreset::Curse.modifiers(8.0);
        let attributes: Vec<Attribute> = entries.iter().map(|e| e.attribute).collect();
        assert_eq!(attributes, vec![Attribute::XpMultiplier, Attribute::GoldMultiplier]);
        assert!(entries.iter().all(|e| e.mode == ModifierMode::Absolute && e.duration == 8.0));
    }

    #[test]
    fn test_scatter_positions_lie_on_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = Vec2::new(10.0, -2.0);
        let points = scatter_positions(&mut rng, center, 16, 2.0);
        assert_eq!(points.len(), 16);
        for point in points {
            assert!((point.distance(center) - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_outcome_table_parses_with_defaults() {
        let table: OutcomeTable = serde_json::from_str(
            r#"{"reward": {"drops": [{"drop": "small_gem", "count": 3}]},
                "penalty": {"presets": [{"preset": "curse", "duration": 5}]}}"#,
        )
        .unwrap();
        assert_eq!(table.reward.drops[0].drop, DropType::SmallGem);
        assert_eq!(table.reward.drops[0].radius, None);
        assert_eq!(table.penalty.presets[0].preset, EffectPreset::Curse);
        assert_eq!(table.penalty.instant_damage, 0.0);
    }
}
