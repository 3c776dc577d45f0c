//! Minimal hecs-backed game world.
//!
//! The arena is the reference host for the challenge engine: it owns the
//! player, enemies and reward pickups, keeps the run-wide kill and damage
//! counters, and exposes them through `GameProbe` and `WorldEffects`. The
//! demo binary and the integration tests drive it directly.

use glam::Vec2;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::challenge::GameProbe;
use crate::components::{Enemy, Health, Pickup, Player, Position};
use crate::constants::*;
use crate::rewards::{scatter_positions, DropType, WorldEffects};
use crate::tracking::{AbilityKind, DamageTracker, KillCounter};

pub struct Arena {
    pub world: World,
    player: Entity,
    kills: KillCounter,
    damage: DamageTracker,
    rng: StdRng,
    player_died: bool,
}

impl Arena {
    pub fn new(seed: u64) -> Self {
        let mut world = World::new();
        let player = world.spawn((Player, Position::new(0.0, 0.0), Health::new(PLAYER_MAX_HP)));
        Self {
            world,
            player,
            kills: KillCounter::new(),
            damage: DamageTracker::new(),
            rng: StdRng::seed_from_u64(seed),
            player_died: false,
        }
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    fn player_pos(&self) -> Option<Vec2> {
        self.world.get::<&Position>(self.player).ok().map(|p| p.0)
    }

    pub fn player_health(&self) -> Option<Health> {
        self.world.get::<&Health>(self.player).ok().map(|h| *h)
    }

    pub fn move_player(&mut self, delta: Vec2) {
        if let Ok(mut pos) = self.world.get::<&mut Position>(self.player) {
            pos.0 += delta;
        }
    }

    /// Damage the player. Returns true on the hit that kills them.
    pub fn hit_player(&mut self, amount: f32) -> bool {
        let Ok(mut health) = self.world.get::<&mut Health>(self.player) else {
            return false;
        };
        let died = health.damage(amount);
        debug!(amount, hp = health.current, "Player hit");
        drop(health);
        if died {
            info!("Player died");
            self.player_died = true;
        }
        died
    }

    /// True once per player death; the host forwards it to the challenge context
    pub fn take_player_death(&mut self) -> bool {
        std::mem::take(&mut self.player_died)
    }

    /// Spawn a ring of enemies around the player
    pub fn spawn_enemies(&mut self, count: u32) -> Vec<Entity> {
        let center = self.player_pos().unwrap_or(Vec2::ZERO);
        scatter_positions(&mut self.rng, center, count, ENEMY_SPAWN_RADIUS)
            .into_iter()
            .map(|pos| self.world.spawn((Enemy, Position(pos), Health::new(ENEMY_MAX_HP))))
            .collect()
    }

    /// Hit an enemy with an ability. Returns true if the hit killed it.
    pub fn hit_enemy(&mut self, enemy: Entity, ability: AbilityKind, amount: f32) -> bool {
        let killed = {
            let Ok(mut query) = self.world.query_one::<(&Enemy, &mut Health)>(enemy) else {
                return false;
            };
            let Some((_, health)) = query.get() else {
                return false;
            };
            if !health.is_alive() {
                return false;
            }
            let dealt = amount.min(health.current);
            self.damage.report_damage(ability, dealt);
            health.damage(amount)
        };

        if killed {
            if let Err(err) = self.world.despawn(enemy) {
                debug!(?enemy, %err, "Killed enemy was already despawned");
            }
            self.kills.record_kill();
        }
        killed
    }

    pub fn enemies(&self) -> Vec<Entity> {
        self.world
            .query::<&Enemy>()
            .iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Pickups currently on the ground, by kind
    pub fn pickups(&self) -> Vec<(DropType, Vec2)> {
        self.world
            .query::<(&Pickup, &Position)>()
            .iter()
            .map(|(_, (pickup, pos))| (pickup.drop, pos.0))
            .collect()
    }

    pub fn damage_tracker(&self) -> &DamageTracker {
        &self.damage
    }
}

impl GameProbe for Arena {
    fn total_kills(&self) -> u32 {
        self.kills.total()
    }

    fn total_damage_dealt(&self) -> f32 {
        self.damage.total_damage()
    }

    fn player_position(&self) -> Option<Vec2> {
        self.player_pos()
    }

    fn player_hp(&self) -> Option<f32> {
        self.player_health().map(|h| h.current)
    }
}

impl WorldEffects for Arena {
    fn player_position(&self) -> Option<Vec2> {
        self.player_pos()
    }

    fn spawn_drop(&mut self, drop: DropType, position: Vec2, count: u32, radius: f32) {
        for pos in scatter_positions(&mut self.rng, position, count, radius) {
            self.world.spawn((Pickup { drop }, Position(pos)));
        }
        debug!(?drop, count, radius, "Spawned reward drops");
    }

    fn damage_player(&mut self, amount: f32) {
        self.hit_player(amount);
    }

    fn heal_player(&mut self, amount: f32) {
        if let Ok(mut health) = self.world.get::<&mut Health>(self.player) {
            health.heal(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kills_and_damage_feed_probe() {
        let mut arena = Arena::new(1);
        let enemies = arena.spawn_enemies(3);
        assert_eq!(arena.enemies().len(), 3);

        assert!(!arena.hit_enemy(enemies[0], AbilityKind::Sword, 10.0));
        assert!(arena.hit_enemy(enemies[0], AbilityKind::Fireball, 100.0));
        assert_eq!(arena.total_kills(), 1);
        // Overkill is clamped to the hit points the enemy had left
        assert_eq!(arena.total_damage_dealt(), ENEMY_MAX_HP);
        assert_eq!(arena.enemies().len(), 2);

        // Dead enemies are gone
        assert!(!arena.hit_enemy(enemies[0], AbilityKind::Sword, 10.0));
        // The player is not an enemy
        let player = arena.player();
        assert!(!arena.hit_enemy(player, AbilityKind::Sword, 10.0));
    }

    #[test]
    fn test_drops_scatter_around_player() {
        let mut arena = Arena::new(2);
        arena.move_player(Vec2::new(5.0, 5.0));
        let center = GameProbe::player_position(&arena).unwrap();
        arena.spawn_drop(DropType::Gold, center, 4, 2.0);

        let pickups = arena.pickups();
        assert_eq!(pickups.len(), 4);
        for (drop, pos) in pickups {
            assert_eq!(drop, DropType::Gold);
            assert!((pos.distance(Vec2::new(5.0, 5.0)) - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_player_death_reported_once() {
        let mut arena = Arena::new(3);
        arena.damage_player(40.0);
        assert_eq!(arena.player_hp(), Some(PLAYER_MAX_HP - 40.0));
        arena.heal_player(10.0);
        assert_eq!(arena.player_hp(), Some(PLAYER_MAX_HP - 30.0));

        assert!(arena.hit_player(1000.0));
        assert!(arena.take_player_death());
        assert!(!arena.take_player_death());
    }
}
