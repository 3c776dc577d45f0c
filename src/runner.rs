//! Single-slot challenge runner.
//!
//! Phases: Idle -> Queued -> Presenting -> Active -> Completed -> Idle.
//! A queued challenge waits one tick for its intro to begin, then for the
//! presentation handshake before it starts evaluating. Completed lasts while
//! the result banner is up; a new challenge may be added then, cutting the
//! banner short. Adding while Queued, Presenting or Active is rejected.

use tracing::{info, warn};

use crate::challenge::{Challenge, GameProbe};
use crate::error::ChallengeError;
use crate::events::{ChallengeEvent, EventQueue};
use crate::presentation::PresentationSequencer;
use crate::rewards::OutcomeTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerPhase {
    #[default]
    Idle,
    Queued,
    Presenting,
    Active,
    Completed,
}

/// A finished challenge, ready for outcome dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeReport {
    pub name: &'static str,
    pub success: bool,
    pub outcomes: OutcomeTable,
}

#[derive(Debug, Default)]
pub struct ChallengeRunner {
    phase: RunnerPhase,
    current: Option<Challenge>,
    description: Option<String>,
    last_completed: Option<Challenge>,
}

impl ChallengeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a challenge into the slot. While another one is in flight this
    /// is a logged no-op; the rejected challenge is dropped without firing
    /// either callback.
    pub fn add_challenge(
        &mut self,
        challenge: Challenge,
        description: Option<String>,
        events: &mut EventQueue,
    ) -> Result<(), ChallengeError> {
        if let Some(active) = self.current.as_ref().filter(|_| self.is_busy()) {
            warn!(
                rejected = challenge.display_name(),
                active = active.display_name(),
                "Challenge already in progress, ignoring new one"
            );
            return Err(ChallengeError::RunnerBusy {
                active: active.display_name(),
            });
        }
        if let Err(err) = challenge.validate() {
            warn!(%err, "Rejecting challenge");
            return Err(err);
        }

        info!(challenge = challenge.display_name(), "Challenge queued");
        events.push(ChallengeEvent::ChallengeQueued {
            name: challenge.display_name(),
        });
        self.current = Some(challenge);
        self.description = description;
        self.phase = RunnerPhase::Queued;
        Ok(())
    }

    /// Advance the slot by one tick. Returns a report when a challenge finished.
    pub fn tick(
        &mut self,
        dt: f32,
        probe: &dyn GameProbe,
        presenter: &mut PresentationSequencer,
        events: &mut EventQueue,
    ) -> Option<ChallengeReport> {
        puffin::profile_function!();

        match self.phase {
            RunnerPhase::Idle => None,
            RunnerPhase::Queued => {
                let challenge = self.current.as_ref()?;
                presenter.begin_intro(challenge, self.description.as_deref());
                self.phase = RunnerPhase::Presenting;
                None
            }
            RunnerPhase::Presenting => {
                if !presenter.intro_elapsed() {
                    return None;
                }
                let challenge = self.current.as_mut()?;
                challenge.start(probe);
                events.push(ChallengeEvent::ChallengeStarted {
                    name: challenge.display_name(),
                });
                self.phase = RunnerPhase::Active;
                if challenge.is_finished() {
                    return self.complete(presenter, events);
                }
                None
            }
            RunnerPhase::Active => {
                let challenge = self.current.as_mut()?;
                if challenge.update(dt, probe) {
                    return self.complete(presenter, events);
                }
                None
            }
            RunnerPhase::Completed => {
                if !presenter.is_showing_result() {
                    self.phase = RunnerPhase::Idle;
                }
                None
            }
        }
    }

    /// Forward a player death to the active challenge
    pub fn notify_player_died(
        &mut self,
        presenter: &mut PresentationSequencer,
        events: &mut EventQueue,
    ) -> Option<ChallengeReport> {
        if self.phase != RunnerPhase::Active {
            return None;
        }
        let challenge = self.current.as_mut()?;
        if challenge.notify_player_died() {
            return self.complete(presenter, events);
        }
        None
    }

    fn complete(
        &mut self,
        presenter: &mut PresentationSequencer,
        events: &mut EventQueue,
    ) -> Option<ChallengeReport> {
        let mut challenge = self.current.take()?;
        let success = challenge.was_successful();
        let report = ChallengeReport {
            name: challenge.display_name(),
            success,
            outcomes: challenge.take_outcomes(),
        };

        presenter.show_result(success);
        events.push(ChallengeEvent::ChallengeCompleted {
            name: report.name,
            success,
        });

        self.description = None;
        self.last_completed = Some(challenge);
        self.phase = RunnerPhase::Completed;
        Some(report)
    }

    /// Clear the slot without firing any outcome (stage exit, death screen).
    /// Returns the name of the challenge that was dropped, if any.
    pub fn cancel_current(
        &mut self,
        presenter: &mut PresentationSequencer,
        events: &mut EventQueue,
    ) -> Option<&'static str> {
        let cancelled = self.current.take().map(|c| c.display_name());
        if let Some(name) = cancelled {
            info!(challenge = name, "Challenge cancelled");
            events.push(ChallengeEvent::ChallengeCancelled { name });
        }
        self.description = None;
        self.phase = RunnerPhase::Idle;
        presenter.reset();
        cancelled
    }

    pub fn phase(&self) -> RunnerPhase {
        self.phase
    }

    /// True while a challenge occupies the slot and has not finished
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            RunnerPhase::Queued | RunnerPhase::Presenting | RunnerPhase::Active
        )
    }

    pub fn current(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    pub fn last_completed(&self) -> Option<&Challenge> {
        self.last_completed.as_ref()
    }
}
