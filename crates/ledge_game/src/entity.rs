//! Shared entity state and the per-entity update/draw contract.
//!
//! [`Body`] holds position, size, velocity and the active flag. The bounding
//! box is derived from the position on every read, so no code path can observe
//! a box that lags behind a position change.

use crate::collision::Rect;
use crate::render::DrawTarget;
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    position: Vec2,
    pub velocity: Vec2,
    pub width: u32,
    pub height: u32,
    pub active: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: u32, height: u32) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            width,
            height,
            active: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.position += Vec2::new(dx, dy);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.width as f32,
            self.height as f32,
        )
    }
}

pub trait Entity {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Advance own state by `dt_ms`. Must not read any other entity.
    fn update(&mut self, dt_ms: f32);

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String>;

    fn rect(&self) -> Rect {
        self.body().rect()
    }

    fn is_active(&self) -> bool {
        self.body().active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_is_active_and_still() {
        let body = Body::new(5.0, 6.0, 10, 20);
        assert!(body.active);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.rect(), Rect::new(5.0, 6.0, 10.0, 20.0));
    }

    #[test]
    fn set_position_moves_box() {
        let mut body = Body::new(0.0, 0.0, 10, 10);
        body.set_position(40.0, -3.5);
        assert_eq!(body.rect().left(), 40.0);
        assert_eq!(body.rect().top(), -3.5);
    }

    #[test]
    fn move_by_accumulates() {
        let mut body = Body::new(1.0, 1.0, 4, 4);
        body.move_by(2.0, 3.0);
        body.move_by(-1.0, 0.5);
        assert_eq!(body.position(), Vec2::new(2.0, 4.5));
        assert_eq!(body.rect().bottom(), 8.5);
    }
}
