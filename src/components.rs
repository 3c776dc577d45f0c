use glam::Vec2;

use crate::rewards::DropType;

/// Position component - continuous world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Player marker component
#[derive(Debug, Clone, Copy)]
pub struct Player;

/// Enemy marker component
#[derive(Debug, Clone, Copy)]
pub struct Enemy;

/// Health component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Returns true if this took the entity to zero
    pub fn damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.current = (self.current - amount).max(0.0);
        was_alive && !self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

/// A reward pickup lying on the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub drop: DropType,
}
