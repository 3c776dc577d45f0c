//! Challenge configuration.
//!
//! Designers author challenges as a JSON "challenge book": engine timing
//! tunables plus a list of challenge definitions, each with an objective,
//! a time limit and a reward/penalty table. Timeline clips refer to the
//! definitions by id.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::challenge::{Challenge, Objective};
use crate::constants::*;
use crate::error::ConfigError;
use crate::rewards::{EffectPreset, OutcomeEffects, OutcomeTable};

/// Challenge book shipped with the demo binary
const BUNDLED_BOOK: &str = include_str!("../data/challenges.json");

/// Engine-wide tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub intro_display_time: f32,
    pub result_display_time: f32,
    pub move_epsilon: f32,
    pub default_drop_radius: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            intro_display_time: INTRO_DISPLAY_TIME,
            result_display_time: RESULT_DISPLAY_TIME,
            move_epsilon: MOVE_EPSILON,
            default_drop_radius: DEFAULT_DROP_RADIUS,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("intro_display_time", self.intro_display_time),
            ("result_display_time", self.result_display_time),
            ("move_epsilon", self.move_epsilon),
            ("default_drop_radius", self.default_drop_radius),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid("engine", format!("{} must be a non-negative number", name)));
            }
        }
        Ok(())
    }
}

/// One designer-authored challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDefinition {
    pub id: String,
    pub objective: Objective,
    pub time_limit: f32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reward: OutcomeEffects,
    #[serde(default)]
    pub penalty: OutcomeEffects,
}

impl ChallengeDefinition {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_limit.is_finite() || self.time_limit <= 0.0 {
            return Err(invalid(&self.id, "time_limit must be positive"));
        }

        match self.objective {
            Objective::KillEnemies { count: 0 } => {
                return Err(invalid(&self.id, "kill count must be at least 1"));
            }
            Objective::DealDamage { amount } if !amount.is_finite() || amount <= 0.0 => {
                return Err(invalid(&self.id, "damage amount must be positive"));
            }
            _ => {}
        }

        for (label, effects) in [("reward", &self.reward), ("penalty", &self.penalty)] {
            validate_effects(&self.id, label, effects)?;
        }
        Ok(())
    }

    /// Build a fresh challenge (without callbacks) from this definition
    pub fn build(&self, engine: &EngineConfig) -> Challenge {
        Challenge::new(self.objective, self.time_limit)
            .with_move_epsilon(engine.move_epsilon)
            .with_outcomes(OutcomeTable {
                reward: self.reward.clone(),
                penalty: self.penalty.clone(),
            })
    }
}

fn validate_effects(id: &str, label: &str, effects: &OutcomeEffects) -> Result<(), ConfigError> {
    for entry in &effects.modifiers {
        if !entry.value.is_finite() {
            return Err(invalid(
                id,
                format!("{} modifier on {:?} has no finite value", label, entry.attribute),
            ));
        }
        if !entry.duration.is_finite() || entry.duration <= 0.0 {
            return Err(invalid(
                id,
                format!("{} modifier on {:?} needs a positive duration", label, entry.attribute),
            ));
        }
    }

    for entry in &effects.presets {
        let needs_duration = entry.preset != EffectPreset::TakeDamage;
        if needs_duration && (!entry.duration.is_finite() || entry.duration <= 0.0) {
            return Err(invalid(
                id,
                format!("{} preset {:?} needs a positive duration", label, entry.preset),
            ));
        }
    }

    for drop in &effects.drops {
        if drop.count == 0 {
            return Err(invalid(id, format!("{} drop of {:?} has a zero count", label, drop.drop)));
        }
        if drop.radius.is_some_and(|r| !r.is_finite() || r < 0.0) {
            return Err(invalid(
                id,
                format!("{} drop of {:?} has a negative radius", label, drop.drop),
            ));
        }
    }

    if effects.instant_damage < 0.0 || effects.heal < 0.0 {
        return Err(invalid(id, format!("{} damage and heal must not be negative", label)));
    }
    Ok(())
}

fn invalid(id: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        id: id.to_string(),
        reason: reason.into(),
    }
}

/// Every challenge a stage can trigger, plus engine tunables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeBook {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub challenges: Vec<ChallengeDefinition>,
}

impl ChallengeBook {
    /// Parse and validate a challenge book
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let book: ChallengeBook = serde_json::from_str(json)?;
        book.validate()?;
        Ok(book)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The challenge book bundled with the crate
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json(BUNDLED_BOOK)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        let mut seen = HashSet::new();
        for definition in &self.challenges {
            if !seen.insert(definition.id.as_str()) {
                return Err(ConfigError::DuplicateId(definition.id.clone()));
            }
            definition.validate()?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ChallengeDefinition> {
        self.challenges.iter().find(|d| d.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.challenges.iter().map(|d| d.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::rewards::DropType;

    #[test]
    fn test_bundled_book_is_valid() {
        let book = ChallengeBook::bundled().unwrap();
        assert!(!book.challenges.is_empty());
        for id in book.ids() {
            assert!(book.get(id).is_some());
        }
    }

    #[test]
    fn test_engine_block_is_optional() {
        let book = ChallengeBook::from_json(r#"{"challenges": []}"#).unwrap();
        assert_eq!(book.engine, EngineConfig::default());

        let book = ChallengeBook::from_json(r#"{"engine": {"intro_display_time": 1.5}}"#).unwrap();
        assert_eq!(book.engine.intro_display_time, 1.5);
        assert_eq!(book.engine.result_display_time, RESULT_DISPLAY_TIME);
    }

    #[test]
    fn test_full_definition_parses() {
        let book = ChallengeBook::from_json(
            r#"{
                "challenges": [{
                    "id": "cull",
                    "objective": {"kind": "kill_enemies", "count": 25},
                    "time_limit": 20,
                    "description": "Kill 25 enemies in 20 seconds",
                    "reward": {
                        "modifiers": [
                            {"attribute": "damage_multiplier", "value": 1.5, "duration": 10}
                        ],
                        "drops": [{"drop": "gold", "count": 5, "radius": 3}]
                    },
                    "penalty": {"presets": [{"preset": "slowdown", "duration": 5}]}
                }]
            }"#,
        )
        .unwrap();

        let definition = book.get("cull").unwrap();
        assert_eq!(definition.objective, Objective::KillEnemies { count: 25 });
        assert_eq!(definition.reward.modifiers[0].attribute, Attribute::DamageMultiplier);
        assert_eq!(definition.reward.drops[0].drop, DropType::Gold);

        let challenge = definition.build(&book.engine);
        assert_eq!(challenge.time_limit(), 20.0);
        assert_eq!(challenge.outcomes().penalty.presets[0].preset, EffectPreset::Slowdown);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = ChallengeBook::from_json(
            r#"{"challenges": [
                {"id": "a", "objective": {"kind": "survive"}, "time_limit": 5},
                {"id": "a", "objective": {"kind": "dont_move"}, "time_limit": 5}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let cases = [
            r#"{"id": "x", "objective": {"kind": "survive"}, "time_limit": 0}"#,
            r#"{"id": "x", "objective": {"kind": "kill_enemies", "count": 0}, "time_limit": 5}"#,
            r#"{"id": "x", "objective": {"kind": "deal_damage", "amount": -1}, "time_limit": 5}"#,
            r#"{"id": "x", "objective": {"kind": "survive"}, "time_limit": 5,
                "reward": {"modifiers": [
                    {"attribute": "xp_multiplier", "value": 2, "duration": 0}
                ]}}"#,
            r#"{"id": "x", "objective": {"kind": "survive"}, "time_limit": 5,
                "penalty": {"presets": [{"preset": "curse"}]}}"#,
        ];
        for case in cases {
            let json = format!(r#"{{"challenges": [{}]}}"#, case);
            let err = ChallengeBook::from_json(&json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "accepted: {}", case);
        }
    }

    #[test]
    fn test_take_damage_preset_needs_no_duration() {
        let book = ChallengeBook::from_json(
            r#"{"challenges": [{"id": "x", "objective": {"kind": "survive"}, "time_limit": 5,
                "penalty": {"presets": [{"preset": "take_damage"}]}}]}"#,
        );
        assert!(book.is_ok());
    }

    #[test]
    fn test_unknown_attribute_is_parse_error() {
        let err = ChallengeBook::from_json(
            r#"{"challenges": [{"id": "x", "objective": {"kind": "survive"}, "time_limit": 5,
                "reward": {"modifiers": [{"attribute": "luck", "value": 2, "duration": 1}]}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ChallengeBook::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
