//! Reward and penalty preset values.

/// Radius drops are scattered on around their spawn point (world units)
pub const DEFAULT_DROP_RADIUS: f32 = 2.0;

/// Damage multiplier granted by the DamageBoost preset
pub const DAMAGE_BOOST_MULTIPLIER: f32 = 1.5;
/// Move speed multiplier granted by the SpeedBoost preset
pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
/// Critical chance points added by the CritChance preset
pub const CRIT_CHANCE_BONUS: f32 = 10.0;

/// Instant damage dealt by the TakeDamage penalty
pub const PENALTY_INSTANT_DAMAGE: f32 = 50.0;
/// Move speed multiplier forced by the Slowdown penalty
pub const SLOWDOWN_SPEED: f32 = 0.5;
/// XP and gold multipliers forced by the Curse penalty
pub const CURSE_MULTIPLIER: f32 = 0.5;
