//! Timed objective state machines.
//!
//! A challenge is built with its parameters and two outcome callbacks, started
//! once (capturing a baseline measurement from the probe), then updated every
//! tick until it reports finished. Exactly one of the callbacks fires, exactly
//! once; a finished challenge ignores further updates.

mod objective;
mod probe;

pub use objective::Objective;
pub use probe::GameProbe;

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::constants::*;
use crate::error::ChallengeError;
use crate::rewards::OutcomeTable;
use objective::{MissingProbe, Tracking, Verdict};

/// Callback fired when a challenge resolves
pub type OutcomeCallback = Box<dyn FnOnce()>;

/// Tri-state result of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl ChallengeStatus {
    pub fn is_finished(self) -> bool {
        self != ChallengeStatus::Pending
    }
}

pub struct Challenge {
    objective: Objective,
    tracking: Tracking,
    time_limit: f32,
    time_remaining: f32,
    status: ChallengeStatus,
    move_epsilon: f32,
    on_success: Option<OutcomeCallback>,
    on_failure: Option<OutcomeCallback>,
    outcomes: OutcomeTable,
    last_logged_second: Option<i64>,
}

impl Challenge {
    pub fn new(objective: Objective, time_limit: f32) -> Self {
        Self {
            objective,
            tracking: Tracking::NotStarted,
            time_limit,
            time_remaining: time_limit,
            status: ChallengeStatus::Pending,
            move_epsilon: MOVE_EPSILON,
            on_success: None,
            on_failure: None,
            outcomes: OutcomeTable::default(),
            last_logged_second: None,
        }
    }

    pub fn kill_enemies(count: u32, time_limit: f32) -> Self {
        Self::new(Objective::KillEnemies { count }, time_limit)
    }

    pub fn deal_damage(amount: f32, time_limit: f32) -> Self {
        Self::new(Objective::DealDamage { amount }, time_limit)
    }

    pub fn dont_move(time_limit: f32) -> Self {
        Self::new(Objective::DontMove, time_limit)
    }

    pub fn dont_take_damage(time_limit: f32) -> Self {
        Self::new(Objective::DontTakeDamage, time_limit)
    }

    pub fn survive(time_limit: f32) -> Self {
        Self::new(Objective::Survive, time_limit)
    }

    pub fn on_success(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_failure(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }

    /// Rewards applied on success, penalties on failure
    pub fn with_outcomes(mut self, outcomes: OutcomeTable) -> Self {
        self.outcomes = outcomes;
        self
    }

    pub fn with_move_epsilon(mut self, epsilon: f32) -> Self {
        self.move_epsilon = epsilon;
        self
    }

    /// Reject parameters no run could ever satisfy or time out on
    pub fn validate(&self) -> Result<(), ChallengeError> {
        let reason = if !self.time_limit.is_finite() || self.time_limit <= 0.0 {
            Some("time limit must be positive")
        } else {
            match self.objective {
                Objective::KillEnemies { count: 0 } => Some("kill count must be at least 1"),
                Objective::DealDamage { amount } if !amount.is_finite() || amount <= 0.0 => {
                    Some("damage amount must be positive")
                }
                _ => None,
            }
        };

        match reason {
            Some(reason) => Err(ChallengeError::InvalidChallenge {
                challenge: self.display_name(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Capture the baseline measurement and start the clock.
    ///
    /// If the probe lacks something this objective needs, the challenge
    /// resolves as failed right here instead of erroring.
    pub fn start(&mut self, probe: &dyn GameProbe) {
        if self.status.is_finished() || self.tracking != Tracking::NotStarted {
            warn!(challenge = self.display_name(), "Challenge already started");
            return;
        }

        self.time_remaining = self.time_limit;
        match Tracking::capture(&self.objective, probe) {
            Ok(tracking) => {
                self.tracking = tracking;
                info!(
                    challenge = self.display_name(),
                    objective = ?self.objective,
                    time_limit = self.time_limit,
                    "Challenge started"
                );
            }
            Err(missing) => {
                let what = match missing {
                    MissingProbe::Position => "player position",
                    MissingProbe::Health => "player health",
                };
                error!(challenge = self.display_name(), "No {} available, failing challenge", what);
                self.finish(false);
            }
        }
    }

    /// Advance the challenge by one tick. Returns true once finished.
    ///
    /// Success is checked before time expiry, so an objective met on the
    /// tick the timer runs out still counts.
    pub fn update(&mut self, dt: f32, probe: &dyn GameProbe) -> bool {
        if self.status.is_finished() {
            return true;
        }
        if self.tracking == Tracking::NotStarted {
            warn!(challenge = self.display_name(), "Update before start ignored");
            return false;
        }
        if !dt.is_finite() || dt < 0.0 {
            warn!(challenge = self.display_name(), dt, "Ignoring invalid tick delta");
            return false;
        }

        self.time_remaining -= dt;

        match self.tracking.observe(&self.objective, probe, self.move_epsilon) {
            Verdict::Met => return self.finish(true),
            Verdict::Violated => return self.finish(false),
            Verdict::Pending => {}
        }

        self.log_progress();

        if self.time_remaining <= 0.0 {
            return self.finish(self.objective.succeeds_on_timeout());
        }

        false
    }

    /// Deliver a player death. Only a subscribed Survive challenge reacts,
    /// failing immediately. Returns true if this finished the challenge.
    pub fn notify_player_died(&mut self) -> bool {
        if self.status.is_finished() {
            return false;
        }
        match self.tracking {
            Tracking::Survival { subscribed: true } => {
                info!(challenge = self.display_name(), "Player died");
                self.finish(false)
            }
            _ => false,
        }
    }

    /// Finish a pending challenge with the given result (debug and testing)
    pub fn force_outcome(&mut self, success: bool) -> bool {
        if self.status.is_finished() {
            return false;
        }
        self.finish(success)
    }

    fn finish(&mut self, success: bool) -> bool {
        if self.status.is_finished() {
            return true;
        }

        self.status = if success {
            ChallengeStatus::Succeeded
        } else {
            ChallengeStatus::Failed
        };

        if let Tracking::Survival { subscribed } = &mut self.tracking {
            *subscribed = false;
        }

        let (fire, discard) = if success {
            (self.on_success.take(), self.on_failure.take())
        } else {
            (self.on_failure.take(), self.on_success.take())
        };
        drop(discard);

        info!(
            challenge = self.display_name(),
            success,
            remaining = self.remaining_time(),
            "Challenge finished"
        );

        if let Some(callback) = fire {
            callback();
        }
        true
    }

    fn log_progress(&mut self) {
        let second = self.time_remaining.floor() as i64;
        if self.last_logged_second == Some(second) {
            return;
        }
        self.last_logged_second = Some(second);
        debug!(
            challenge = self.display_name(),
            progress = %self.progress_description(),
            seconds_left = second,
            "Challenge progress"
        );
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn display_name(&self) -> &'static str {
        self.objective.display_name()
    }

    pub fn progress_description(&self) -> String {
        let elapsed = self.elapsed();
        match (self.tracking, self.objective) {
            (Tracking::Kills { gained, .. }, Objective::KillEnemies { count }) => {
                format!("{}/{} KILLS", gained, count)
            }
            (_, Objective::KillEnemies { count }) => format!("0/{} KILLS", count),
            (Tracking::Damage { dealt, .. }, Objective::DealDamage { amount }) => {
                format!("{:.0}/{:.0} DMG", dealt, amount)
            }
            (_, Objective::DealDamage { amount }) => format!("0/{:.0} DMG", amount),
            (_, Objective::DontMove) => format!("{:.1}/{:.1} s STILL", elapsed, self.time_limit),
            (_, Objective::DontTakeDamage) => {
                format!("{:.1}/{:.1} s SAFE", elapsed, self.time_limit)
            }
            (_, Objective::Survive) => format!("{:.1}/{:.1} s", elapsed, self.time_limit),
        }
    }

    /// Objective progress for counting objectives, time progress otherwise
    pub fn normalized_progress(&self) -> f32 {
        self.tracking
            .objective_progress(&self.objective)
            .unwrap_or_else(|| self.time_progress())
    }

    /// Fraction of the time limit already spent, in [0, 1]
    pub fn time_progress(&self) -> f32 {
        if self.time_limit <= 0.0 {
            return 1.0;
        }
        (1.0 - self.time_remaining / self.time_limit).clamp(0.0, 1.0)
    }

    fn elapsed(&self) -> f32 {
        (self.time_limit - self.time_remaining).clamp(0.0, self.time_limit.max(0.0))
    }

    pub fn remaining_time(&self) -> f32 {
        self.time_remaining.max(0.0)
    }

    pub fn time_limit(&self) -> f32 {
        self.time_limit
    }

    pub fn status(&self) -> ChallengeStatus {
        self.status
    }

    pub fn is_started(&self) -> bool {
        self.tracking != Tracking::NotStarted
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Only meaningful once finished
    pub fn was_successful(&self) -> bool {
        self.status == ChallengeStatus::Succeeded
    }

    pub fn outcomes(&self) -> &OutcomeTable {
        &self.outcomes
    }

    pub(crate) fn take_outcomes(&mut self) -> OutcomeTable {
        std::mem::take(&mut self.outcomes)
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Challenge")
            .field("objective", &self.objective)
            .field("time_limit", &self.time_limit)
            .field("time_remaining", &self.time_remaining)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
