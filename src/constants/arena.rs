//! Demo arena constants.

/// Player hit points at the start of a run
pub const PLAYER_MAX_HP: f32 = 100.0;
/// Hit points of a freshly spawned enemy
pub const ENEMY_MAX_HP: f32 = 30.0;
/// Distance from the player at which enemy waves spawn
pub const ENEMY_SPAWN_RADIUS: f32 = 8.0;
