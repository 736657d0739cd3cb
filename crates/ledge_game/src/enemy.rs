//! Patrolling enemies.
//!
//! An enemy walks back and forth around the x it was placed at. When a step
//! carries it past `patrol_range`, it turns around and immediately takes one
//! step in the new direction, so the overshoot never exceeds one `speed`.
//! Death is terminal: a dead enemy stays in the scene but no longer moves,
//! draws or collides.

use crate::collision::Rect;
use crate::entity::{Body, Entity};
use crate::render::{Color, DrawCommand, DrawTarget};
use glam::Vec2;

pub const DEFAULT_ENEMY_SIZE: u32 = 32;

const BODY_COLOR: Color = Color::rgb(200, 40, 40);

#[derive(Debug, Clone)]
pub struct PatrolEnemy {
    body: Body,
    pub health: i32,
    pub patrol_origin_x: f32,
    pub patrol_range: f32,
    pub speed: f32,
    /// +1 walking right, -1 walking left.
    pub direction: i32,
}

impl PatrolEnemy {
    pub fn new(x: f32, y: f32, patrol_range: f32, speed: f32) -> Self {
        Self::with_size(x, y, DEFAULT_ENEMY_SIZE, DEFAULT_ENEMY_SIZE, patrol_range, speed)
    }

    pub fn with_size(
        x: f32,
        y: f32,
        width: u32,
        height: u32,
        patrol_range: f32,
        speed: f32,
    ) -> Self {
        let mut body = Body::new(x, y, width, height);
        body.velocity.x = speed;
        Self {
            body,
            health: 1,
            patrol_origin_x: x,
            patrol_range,
            speed,
            direction: 1,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.active
    }

    pub fn take_damage(&mut self, amount: i32) {
        if !self.body.active {
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.die();
        }
    }

    fn die(&mut self) {
        self.body.active = false;
        self.body.velocity = Vec2::ZERO;
        log::debug!("Enemy at x={:.1} defeated", self.body.x());
    }

    pub fn displacement(&self) -> f32 {
        (self.body.x() - self.patrol_origin_x).abs()
    }
}

impl Entity for PatrolEnemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _dt_ms: f32) {
        if !self.body.active {
            return;
        }
        self.body.move_by(self.speed * self.direction as f32, 0.0);
        if self.displacement() > self.patrol_range {
            self.direction = -self.direction;
            self.body.move_by(self.speed * self.direction as f32, 0.0);
        }
        self.body.velocity.x = self.speed * self.direction as f32;
    }

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        if !self.body.active {
            return Ok(());
        }
        let rect = self.body.rect();
        target.submit(DrawCommand::Rect {
            rect,
            color: BODY_COLOR,
            outline: None,
        })?;
        // The eye sits toward the facing side.
        let eye_offset = if self.direction > 0 { 0.7 } else { 0.3 };
        target.submit(DrawCommand::Circle {
            center: Vec2::new(rect.x + rect.w * eye_offset, rect.y + rect.h * 0.3),
            radius: 3.0,
            color: Color::WHITE,
            outline: None,
        })
    }
}

/// Rect of an enemy only while it can still collide.
pub fn live_rect(enemy: &PatrolEnemy) -> Option<Rect> {
    enemy.is_alive().then(|| enemy.rect())
}
