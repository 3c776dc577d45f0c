//! What a challenge may ask the host about the running game.

use glam::Vec2;

/// Read-only view of the host's counters and player state.
///
/// Counters only ever grow; challenges diff them against a value captured at
/// start instead of expecting a reset. Position and HP are optional because a
/// host may not have a player (or a health bar) wired up, in which case the
/// challenges needing them fail instead of panicking.
pub trait GameProbe {
    /// Enemies killed since the run started
    fn total_kills(&self) -> u32;

    /// Damage dealt since the run started, summed over every ability
    fn total_damage_dealt(&self) -> f32;

    fn player_position(&self) -> Option<Vec2>;

    fn player_hp(&self) -> Option<f32>;
}
