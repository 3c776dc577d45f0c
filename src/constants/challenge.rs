//! Challenge evaluation parameters.

/// Distance the player may drift before a Don't Move challenge fails (world units)
pub const MOVE_EPSILON: f32 = 0.1;
