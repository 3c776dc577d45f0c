//! Challenge context - owns all challenge and modifier state for one session.
//!
//! The context replaces ambient singletons: the host constructs one per
//! session, ticks it once per frame and tears it down before the session
//! ends. Within a tick the order is fixed:
//! 1. modifier countdowns and expiry
//! 2. presentation timers
//! 3. the challenge runner
//! 4. outcome dispatch for a challenge that finished this tick
//!
//! so a modifier granted as a reward keeps its full duration.

use tracing::{info, warn};

use crate::attributes::{Attribute, AttributeStore};
use crate::challenge::{Challenge, GameProbe};
use crate::config::{ChallengeBook, EngineConfig};
use crate::error::ChallengeError;
use crate::events::{ChallengeEvent, EventQueue};
use crate::modifiers::{ModifierLedger, ModifierMode};
use crate::presentation::{PresentationDriver, PresentationSequencer, TracingDriver};
use crate::rewards::{RewardPenaltyDispatcher, WorldEffects};
use crate::runner::{ChallengeReport, ChallengeRunner};

pub struct ChallengeContext {
    attributes: AttributeStore,
    ledger: ModifierLedger,
    runner: ChallengeRunner,
    presenter: PresentationSequencer,
    dispatcher: RewardPenaltyDispatcher,
    events: EventQueue,
    config: EngineConfig,
}

impl ChallengeContext {
    pub fn new(
        attributes: AttributeStore,
        config: EngineConfig,
        driver: Box<dyn PresentationDriver>,
    ) -> Self {
        Self {
            attributes,
            ledger: ModifierLedger::new(),
            runner: ChallengeRunner::new(),
            presenter: PresentationSequencer::new(
                driver,
                config.intro_display_time,
                config.result_display_time,
            ),
            dispatcher: RewardPenaltyDispatcher::new(config.default_drop_radius),
            events: EventQueue::new(),
            config,
        }
    }

    /// Default timings with a log-only presentation driver
    pub fn headless(attributes: AttributeStore) -> Self {
        Self::new(attributes, EngineConfig::default(), Box::new(TracingDriver))
    }

    /// Hand a challenge to the runner. Rejected (and logged) while another is in flight.
    pub fn add_challenge(
        &mut self,
        challenge: Challenge,
        description: Option<String>,
    ) -> Result<(), ChallengeError> {
        self.runner.add_challenge(challenge, description, &mut self.events)
    }

    /// Build the challenge a timeline clip names and hand it to the runner.
    /// Challenge parameters (move epsilon) come from the book's engine block;
    /// display timings and drop radius stay those of this context.
    pub fn trigger(&mut self, book: &ChallengeBook, id: &str) -> Result<(), ChallengeError> {
        let Some(definition) = book.get(id) else {
            warn!(id, "Unknown challenge id");
            return Err(ChallengeError::UnknownChallenge(id.to_string()));
        };
        info!(id, "Triggering challenge");
        self.add_challenge(definition.build(&book.engine), definition.description.clone())
    }

    /// Designer-invoked modifier outside any challenge outcome
    pub fn apply_modifier(
        &mut self,
        attribute: Attribute,
        value: f32,
        mode: ModifierMode,
        duration: f32,
    ) -> Option<f32> {
        let live = self
            .ledger
            .apply(&mut self.attributes, attribute, value, mode, duration)?;
        self.events.push(ChallengeEvent::ModifierApplied {
            attribute,
            value: live,
            duration,
        });
        Some(live)
    }

    pub fn cancel_modifier(&mut self, attribute: Attribute) -> Option<f32> {
        let restored = self.ledger.cancel(&mut self.attributes, attribute)?;
        self.events
            .push(ChallengeEvent::ModifierExpired { attribute, restored });
        Some(restored)
    }

    pub fn cancel_all_modifiers(&mut self) {
        for (attribute, restored) in self.ledger.cancel_all(&mut self.attributes) {
            self.events
                .push(ChallengeEvent::ModifierExpired { attribute, restored });
        }
    }

    /// Advance everything by one frame
    pub fn tick<H: GameProbe + WorldEffects>(&mut self, dt: f32, host: &mut H) {
        puffin::profile_function!();

        for (attribute, restored) in self.ledger.tick(&mut self.attributes, dt) {
            self.events
                .push(ChallengeEvent::ModifierExpired { attribute, restored });
        }

        self.presenter.tick(dt, self.runner.current());

        let report = self
            .runner
            .tick(dt, &*host, &mut self.presenter, &mut self.events);
        if let Some(report) = report {
            self.dispatch(&report, host);
        }
    }

    /// Deliver the host's "player died" notification
    pub fn notify_player_died(&mut self, world: &mut dyn WorldEffects) {
        let report = self
            .runner
            .notify_player_died(&mut self.presenter, &mut self.events);
        if let Some(report) = report {
            self.dispatch(&report, world);
        }
    }

    fn dispatch(&mut self, report: &ChallengeReport, world: &mut dyn WorldEffects) {
        self.dispatcher.dispatch(
            &report.outcomes,
            report.success,
            &mut self.ledger,
            &mut self.attributes,
            world,
            &mut self.events,
        );
    }

    /// Drop the running challenge without an outcome
    pub fn cancel_current(&mut self) -> Option<&'static str> {
        self.runner
            .cancel_current(&mut self.presenter, &mut self.events)
    }

    /// Flush every timer so no modified baseline outlives the session
    pub fn teardown(&mut self) {
        self.cancel_current();
        self.cancel_all_modifiers();
        info!("Challenge context torn down");
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attribute(&self, attribute: Attribute) -> f32 {
        self.attributes.get_live(attribute)
    }

    pub fn ledger(&self) -> &ModifierLedger {
        &self.ledger
    }

    pub fn runner(&self) -> &ChallengeRunner {
        &self.runner
    }

    pub fn presenter(&self) -> &PresentationSequencer {
        &self.presenter
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = ChallengeEvent> + '_ {
        self.events.drain()
    }
}
