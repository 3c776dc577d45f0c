//! Objective kinds and their per-run tracking state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::probe::GameProbe;

/// What a challenge asks of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    KillEnemies { count: u32 },
    DealDamage { amount: f32 },
    DontMove,
    DontTakeDamage,
    Survive,
}

impl Objective {
    pub fn display_name(&self) -> &'static str {
        match self {
            Objective::KillEnemies { .. } => "Kill Enemies",
            Objective::DealDamage { .. } => "Deal Damage",
            Objective::DontMove => "Don't Move",
            Objective::DontTakeDamage => "Avoid Damage",
            Objective::Survive => "Survive!",
        }
    }

    /// Outcome when the timer runs out before anything else decided it
    pub fn succeeds_on_timeout(&self) -> bool {
        match self {
            Objective::KillEnemies { .. } | Objective::DealDamage { .. } => false,
            Objective::DontMove | Objective::DontTakeDamage | Objective::Survive => true,
        }
    }
}

/// Why the probe could not give a tracking baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingProbe {
    Position,
    Health,
}

/// Measurements captured at start plus the latest observed progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Tracking {
    NotStarted,
    Kills { before: u32, gained: u32 },
    Damage { before: f32, dealt: f32 },
    Stillness { origin: Vec2 },
    Health { before: f32 },
    Survival { subscribed: bool },
}

/// Per-tick verdict from an objective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Pending,
    Met,
    Violated,
}

impl Tracking {
    /// Capture the baseline measurement for an objective
    pub(crate) fn capture(
        objective: &Objective,
        probe: &dyn GameProbe,
    ) -> Result<Self, MissingProbe> {
        Ok(match objective {
            Objective::KillEnemies { .. } => Tracking::Kills {
                before: probe.total_kills(),
                gained: 0,
            },
            Objective::DealDamage { .. } => Tracking::Damage {
                before: probe.total_damage_dealt(),
                dealt: 0.0,
            },
            Objective::DontMove => Tracking::Stillness {
                origin: probe.player_position().ok_or(MissingProbe::Position)?,
            },
            Objective::DontTakeDamage => Tracking::Health {
                before: probe.player_hp().ok_or(MissingProbe::Health)?,
            },
            Objective::Survive => Tracking::Survival { subscribed: true },
        })
    }

    /// Refresh progress from the probe and judge it against the objective
    pub(crate) fn observe(
        &mut self,
        objective: &Objective,
        probe: &dyn GameProbe,
        move_epsilon: f32,
    ) -> Verdict {
        match (self, objective) {
            (Tracking::Kills { before, gained }, Objective::KillEnemies { count }) => {
                *gained = probe.total_kills().saturating_sub(*before);
                if *gained >= *count {
                    Verdict::Met
                } else {
                    Verdict::Pending
                }
            }
            (Tracking::Damage { before, dealt }, Objective::DealDamage { amount }) => {
                *dealt = (probe.total_damage_dealt() - *before).max(0.0);
                if *dealt >= *amount {
                    Verdict::Met
                } else {
                    Verdict::Pending
                }
            }
            (Tracking::Stillness { origin }, Objective::DontMove) => match probe.player_position() {
                Some(position) if position.distance(*origin) <= move_epsilon => Verdict::Pending,
                _ => Verdict::Violated,
            },
            (Tracking::Health { before }, Objective::DontTakeDamage) => match probe.player_hp() {
                Some(hp) if hp >= *before => Verdict::Pending,
                _ => Verdict::Violated,
            },
            // Survival is decided by the death notification, never by polling
            _ => Verdict::Pending,
        }
    }

    /// Objective progress in [0, 1], None for time-only objectives
    pub(crate) fn objective_progress(&self, objective: &Objective) -> Option<f32> {
        match (self, objective) {
            (Tracking::Kills { gained, .. }, Objective::KillEnemies { count }) => {
                Some(ratio(*gained as f32, *count as f32))
            }
            (Tracking::Damage { dealt, .. }, Objective::DealDamage { amount }) => {
                Some(ratio(*dealt, *amount))
            }
            (
                Tracking::NotStarted,
                Objective::KillEnemies { .. } | Objective::DealDamage { .. },
            ) => Some(0.0),
            _ => None,
        }
    }
}

fn ratio(done: f32, required: f32) -> f32 {
    if required <= 0.0 {
        1.0
    } else {
        (done / required).clamp(0.0, 1.0)
    }
}
