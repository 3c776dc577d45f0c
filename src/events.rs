//! Challenge event system for decoupled communication with the host.
//!
//! The engine emits events while ticking, the host drains them once per frame.
//! This lets audio, UI and analytics react without the engine knowing them.

use crate::attributes::Attribute;
use crate::rewards::DropType;

/// Observable transitions of the challenge engine
#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeEvent {
    /// A challenge was accepted and waits for its intro
    ChallengeQueued { name: &'static str },
    /// The intro elapsed and evaluation began
    ChallengeStarted { name: &'static str },
    /// A challenge finished
    ChallengeCompleted { name: &'static str, success: bool },
    /// The active challenge was cleared without an outcome
    ChallengeCancelled { name: &'static str },
    /// A modifier changed an attribute
    ModifierApplied {
        attribute: Attribute,
        value: f32,
        duration: f32,
    },
    /// A modifier ran out or was cancelled and the baseline came back
    ModifierExpired { attribute: Attribute, restored: f32 },
    /// Pickups were spawned as a reward
    DropSpawned { drop: DropType, count: u32 },
    /// An outcome hurt the player
    PlayerDamaged { amount: f32 },
    /// An outcome healed the player
    PlayerHealed { amount: f32 },
}

/// Simple event queue - events are pushed during the tick, drained by the host
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<ChallengeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: ChallengeEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = ChallengeEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
