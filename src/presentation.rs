//! Challenge presentation sequence: intro, live progress, result.
//!
//! The sequencer owns the display timers and tells the runner when the intro
//! is over; actual drawing is delegated to a `PresentationDriver`. Timers are
//! plain countdowns advanced by `tick`, so `reset` can drop them at any point
//! without leaving anything scheduled.

use tracing::{debug, info};

use crate::challenge::Challenge;
use crate::constants::*;

/// What the progress block shows this frame
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub text: String,
    /// Remaining time rounded up to whole seconds
    pub seconds_left: u32,
    /// Slider fill in [0, 1]
    pub slider: f32,
}

impl ProgressView {
    pub fn from_challenge(challenge: &Challenge) -> Self {
        let mut slider = challenge.normalized_progress();
        if slider <= 0.0 || slider > 1.0 {
            slider = challenge.time_progress();
        }

        Self {
            text: challenge.progress_description(),
            seconds_left: challenge.remaining_time().ceil() as u32,
            slider: slider.clamp(0.0, 1.0),
        }
    }

    fn differs_from(&self, other: &ProgressView) -> bool {
        self.text != other.text
            || self.seconds_left != other.seconds_left
            || (self.slider - other.slider).abs() > SLIDER_EPSILON
    }
}

/// Renders the three presentation blocks
pub trait PresentationDriver {
    fn show_intro(&mut self, title: &str, description: &str);

    fn show_progress(&mut self, view: &ProgressView);

    fn show_result(&mut self, success: bool, text: &str);

    /// Hide every block
    fn hide(&mut self);
}

/// Driver for headless hosts: every block becomes a log line
#[derive(Debug, Default)]
pub struct TracingDriver;

impl PresentationDriver for TracingDriver {
    fn show_intro(&mut self, title: &str, description: &str) {
        info!("{}: {}", title, description);
    }

    fn show_progress(&mut self, view: &ProgressView) {
        debug!(
            text = %view.text,
            seconds_left = view.seconds_left,
            slider = view.slider,
            "Challenge progress display"
        );
    }

    fn show_result(&mut self, _success: bool, text: &str) {
        info!("{}", text);
    }

    fn hide(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationPhase {
    Hidden,
    Intro { remaining: f32 },
    Progress,
    Result { remaining: f32, success: bool },
}

pub struct PresentationSequencer {
    phase: PresentationPhase,
    intro_duration: f32,
    result_duration: f32,
    driver: Box<dyn PresentationDriver>,
    last_view: Option<ProgressView>,
}

impl PresentationSequencer {
    pub fn new(
        driver: Box<dyn PresentationDriver>,
        intro_duration: f32,
        result_duration: f32,
    ) -> Self {
        Self {
            phase: PresentationPhase::Hidden,
            intro_duration,
            result_duration,
            driver,
            last_view: None,
        }
    }

    pub fn with_defaults(driver: Box<dyn PresentationDriver>) -> Self {
        Self::new(driver, INTRO_DISPLAY_TIME, RESULT_DISPLAY_TIME)
    }

    /// Show the intro banner and start its countdown. Any block still up
    /// (including a previous result) is replaced.
    pub fn begin_intro(&mut self, challenge: &Challenge, description: Option<&str>) {
        let description = match description {
            Some(text) if !text.is_empty() => text,
            _ => challenge.display_name(),
        };

        self.driver.hide();
        self.driver.show_intro(INTRO_TITLE, description);
        self.last_view = None;
        self.phase = PresentationPhase::Intro {
            remaining: self.intro_duration,
        };
    }

    /// True once the intro has run its course and progress is on screen.
    /// This is the handshake the runner waits on before starting a challenge.
    pub fn intro_elapsed(&self) -> bool {
        self.phase == PresentationPhase::Progress
    }

    /// Advance display timers and refresh the progress block
    pub fn tick(&mut self, dt: f32, challenge: Option<&Challenge>) {
        puffin::profile_function!();

        match &mut self.phase {
            PresentationPhase::Hidden => {}
            PresentationPhase::Intro { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.phase = PresentationPhase::Progress;
                }
            }
            PresentationPhase::Progress => {
                let Some(challenge) = challenge.filter(|c| c.is_started()) else {
                    return;
                };
                let view = ProgressView::from_challenge(challenge);
                let changed = self
                    .last_view
                    .as_ref()
                    .map_or(true, |last| view.differs_from(last));
                if changed {
                    self.driver.show_progress(&view);
                    self.last_view = Some(view);
                }
            }
            PresentationPhase::Result { remaining, .. } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.phase = PresentationPhase::Hidden;
                    self.driver.hide();
                }
            }
        }
    }

    /// Swap whatever is showing for the result banner
    pub fn show_result(&mut self, success: bool) {
        let text = if success {
            RESULT_SUCCESS_TEXT
        } else {
            RESULT_FAILURE_TEXT
        };
        self.driver.hide();
        self.driver.show_result(success, text);
        self.last_view = None;
        self.phase = PresentationPhase::Result {
            remaining: self.result_duration,
            success,
        };
    }

    /// Hide every block and drop all timers
    pub fn reset(&mut self) {
        self.phase = PresentationPhase::Hidden;
        self.last_view = None;
        self.driver.hide();
    }

    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    pub fn is_showing_result(&self) -> bool {
        matches!(self.phase, PresentationPhase::Result { .. })
    }
}
