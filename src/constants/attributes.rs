//! Player attribute defaults.

/// Live value of a multiplier attribute nobody has touched
pub const DEFAULT_MULTIPLIER: f32 = 1.0;
/// Live value of a percentage attribute nobody has touched
pub const DEFAULT_PERCENT: f32 = 0.0;
