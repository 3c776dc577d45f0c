//! Challenge presentation timing and texts.

/// How long the intro banner stays up before the challenge starts (seconds)
pub const INTRO_DISPLAY_TIME: f32 = 4.0;
/// How long the result banner stays up after completion (seconds)
pub const RESULT_DISPLAY_TIME: f32 = 3.0;
/// Minimum slider change that counts as a visible update
pub const SLIDER_EPSILON: f32 = 0.001;

pub const INTRO_TITLE: &str = "NEW CHALLENGE";
pub const RESULT_SUCCESS_TEXT: &str = "CHALLENGE COMPLETE!";
pub const RESULT_FAILURE_TEXT: &str = "CHALLENGE FAILED";
