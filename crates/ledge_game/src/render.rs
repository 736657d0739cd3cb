//! Rendering boundary.
//!
//! Entities never touch pixels. Their `draw` pass emits [`DrawCommand`]s into
//! a [`DrawTarget`] supplied by the host; the host turns those into sprites or
//! shapes however its graphics backend likes. A target may reject a command,
//! and the scene logs and skips such failures without touching update state.

use crate::collision::Rect;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect {
        rect: Rect,
        color: Color,
        /// Outline width in pixels; `None` fills.
        outline: Option<u32>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        outline: Option<u32>,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
    },
    Sprite {
        sprite_id: String,
        rect: Rect,
        flip_x: bool,
    },
}

pub trait DrawTarget {
    fn submit(&mut self, command: DrawCommand) -> Result<(), String>;
}

/// Records every command of a frame in submission order.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }
}

impl DrawTarget for FrameRecorder {
    fn submit(&mut self, command: DrawCommand) -> Result<(), String> {
        self.commands.push(command);
        Ok(())
    }
}
