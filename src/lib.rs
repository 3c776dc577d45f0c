//! Timed gameplay challenges with temporary stat modifiers.
//!
//! A `ChallengeContext` owns the player's attribute store, the modifier
//! ledger and a single-slot challenge runner. The host ticks it once per
//! frame with something that implements `GameProbe` (to measure the run)
//! and `WorldEffects` (to receive drops, damage and healing).

pub mod arena;
pub mod attributes;
pub mod challenge;
pub mod components;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod modifiers;
pub mod presentation;
pub mod rewards;
pub mod runner;
pub mod tracking;

pub use arena::Arena;
pub use attributes::{Attribute, AttributeStore};
pub use challenge::{Challenge, ChallengeStatus, GameProbe, Objective};
pub use config::{ChallengeBook, ChallengeDefinition, EngineConfig};
pub use context::ChallengeContext;
pub use error::{ChallengeError, ConfigError};
pub use events::{ChallengeEvent, EventQueue};
pub use modifiers::{ModifierEntry, ModifierLedger, ModifierMode};
pub use presentation::{PresentationDriver, PresentationSequencer, ProgressView, TracingDriver};
pub use rewards::{DropType, EffectPreset, OutcomeEffects, OutcomeTable, WorldEffects};
pub use runner::{ChallengeReport, ChallengeRunner, RunnerPhase};
pub use tracking::{AbilityKind, DamageTracker, KillCounter};
