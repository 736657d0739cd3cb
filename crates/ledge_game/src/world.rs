//! Static level pieces: platforms, walls, spikes and collectibles.

use crate::entity::{Body, Entity};
use crate::render::{Color, DrawCommand, DrawTarget};
use glam::Vec2;
use std::f32::consts::TAU;

pub const DEFAULT_SPIKE_SIZE: u32 = 16;
pub const COLLECTIBLE_SIZE: u32 = 16;
pub const DEFAULT_COLLECTIBLE_VALUE: u32 = 10;

const BOB_AMPLITUDE: f32 = 4.0;
const BOB_PERIOD_MS: f32 = 1000.0;

const WALL_FILL: Color = Color::rgb(100, 50, 50);
const WALL_EDGE: Color = Color::rgb(150, 100, 100);
const SPIKE_COLOR: Color = Color::rgb(200, 0, 0);
const COIN_FILL: Color = Color::rgb(255, 215, 0);
const COIN_EDGE: Color = Color::rgb(200, 170, 0);

#[derive(Debug, Clone)]
pub struct Platform {
    body: Body,
    pub color: Color,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: u32, height: u32, color: Color) -> Self {
        Self {
            body: Body::new(x, y, width, height),
            color,
        }
    }
}

impl Entity for Platform {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _dt_ms: f32) {}

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        target.submit(DrawCommand::Rect {
            rect: self.body.rect(),
            color: self.color,
            outline: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Wall {
    body: Body,
}

impl Wall {
    pub fn new(x: f32, y: f32, width: u32, height: u32) -> Self {
        Self {
            body: Body::new(x, y, width, height),
        }
    }
}

impl Entity for Wall {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _dt_ms: f32) {}

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        let rect = self.body.rect();
        target.submit(DrawCommand::Rect {
            rect,
            color: WALL_FILL,
            outline: None,
        })?;
        target.submit(DrawCommand::Rect {
            rect,
            color: WALL_EDGE,
            outline: Some(2),
        })
    }
}

/// Lethal square. Touching it sends the player back to the fall-reset point.
#[derive(Debug, Clone)]
pub struct Spike {
    body: Body,
}

impl Spike {
    pub fn new(x: f32, y: f32, size: u32) -> Self {
        Self {
            body: Body::new(x, y, size, size),
        }
    }
}

impl Entity for Spike {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _dt_ms: f32) {}

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        let rect = self.body.rect();
        target.submit(DrawCommand::Triangle {
            points: [
                Vec2::new(rect.x + rect.w * 0.5, rect.y),
                Vec2::new(rect.right(), rect.bottom()),
                Vec2::new(rect.x, rect.bottom()),
            ],
            color: SPIKE_COLOR,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    body: Body,
    pub value: u32,
    collected: bool,
    base_y: f32,
    elapsed_ms: f32,
}

impl Collectible {
    pub fn new(x: f32, y: f32, value: u32) -> Self {
        Self {
            body: Body::new(x, y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
            value,
            collected: false,
            base_y: y,
            elapsed_ms: 0.0,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Marks the item collected and returns its value the first time only.
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.value)
    }
}

impl Entity for Collectible {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt_ms: f32) {
        if self.collected {
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms) % BOB_PERIOD_MS;
        let offset = BOB_AMPLITUDE * (TAU * self.elapsed_ms / BOB_PERIOD_MS).sin();
        let x = self.body.x();
        self.body.set_position(x, self.base_y + offset);
    }

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        if self.collected {
            return Ok(());
        }
        let rect = self.body.rect();
        let center = rect.center();
        target.submit(DrawCommand::Circle {
            center,
            radius: 6.0,
            color: COIN_FILL,
            outline: None,
        })?;
        target.submit(DrawCommand::Circle {
            center,
            radius: 6.0,
            color: COIN_EDGE,
            outline: Some(2),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameRecorder;

    #[test]
    fn static_pieces_never_move() {
        let mut platform = Platform::new(10.0, 20.0, 100, 10, Color::GRAY);
        let mut wall = Wall::new(0.0, 0.0, 20, 200);
        let mut spike = Spike::new(5.0, 5.0, DEFAULT_SPIKE_SIZE);
        for _ in 0..10 {
            platform.update(16.0);
            wall.update(16.0);
            spike.update(16.0);
        }
        assert_eq!(platform.body().position(), Vec2::new(10.0, 20.0));
        assert_eq!(wall.body().position(), Vec2::ZERO);
        assert_eq!(spike.body().position(), Vec2::new(5.0, 5.0));
        assert_eq!(platform.body().velocity, Vec2::ZERO);
    }

    #[test]
    fn collect_pays_out_once() {
        let mut coin = Collectible::new(0.0, 0.0, 25);
        assert_eq!(coin.collect(), Some(25));
        assert!(coin.is_collected());
        assert_eq!(coin.collect(), None);
    }

    #[test]
    fn collectible_bobs_around_its_placement() {
        let mut coin = Collectible::new(0.0, 100.0, DEFAULT_COLLECTIBLE_VALUE);
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for _ in 0..120 {
            coin.update(1000.0 / 60.0);
            min_y = min_y.min(coin.body().y());
            max_y = max_y.max(coin.body().y());
        }
        assert!(min_y >= 100.0 - BOB_AMPLITUDE - 0.001);
        assert!(max_y <= 100.0 + BOB_AMPLITUDE + 0.001);
        assert!(max_y - min_y > BOB_AMPLITUDE, "coin should visibly bob");
        assert_eq!(coin.body().x(), 0.0);
    }

    #[test]
    fn collected_item_freezes_and_hides() {
        let mut coin = Collectible::new(0.0, 100.0, 10);
        coin.update(100.0);
        coin.collect();
        let y = coin.body().y();
        coin.update(100.0);
        assert_eq!(coin.body().y(), y);

        let mut recorder = FrameRecorder::new();
        coin.draw(&mut recorder).expect("draw");
        assert!(recorder.is_empty());
    }

    #[test]
    fn wall_draws_fill_and_outline() {
        let wall = Wall::new(0.0, 0.0, 20, 200);
        let mut recorder = FrameRecorder::new();
        wall.draw(&mut recorder).expect("draw");
        assert_eq!(recorder.len(), 2);
        assert!(matches!(
            recorder.commands()[1],
            DrawCommand::Rect {
                outline: Some(2),
                ..
            }
        ));
    }
}
