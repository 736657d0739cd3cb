//! Axis-aligned rectangle tests and penetration-based side classification.
//!
//! All gameplay collision is AABB-only. Rectangles are half-open on both axes
//! (`[left, right) x [top, bottom)`), so two boxes that merely share an edge
//! do not overlap. Screen coordinates are y-down: `top < bottom`.
//!
//! [`resolve_direction`] picks the side of contact from the shallower
//! penetration axis. It only means something when the two boxes actually
//! overlap; callers gate on [`overlaps`] first.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Grow by `dw` horizontally and `dh` vertically, keeping the center fixed.
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        Self {
            x: self.x - dw * 0.5,
            y: self.y - dh * 0.5,
            w: self.w + dw,
            h: self.h + dh,
        }
    }
}

/// Which face of the static box the moving box hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Moving box is above the static one (landing on it).
    Top,
    /// Moving box is below the static one (hitting its underside).
    Bottom,
    /// Moving box is to the left of the static one.
    Left,
    /// Moving box is to the right of the static one.
    Right,
}

pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

pub fn contains_point(rect: Rect, point: Vec2) -> bool {
    point.x >= rect.left() && point.x < rect.right() && point.y >= rect.top() && point.y < rect.bottom()
}

pub fn resolve_direction(moving: Rect, fixed: Rect) -> Direction {
    let delta = moving.center() - fixed.center();
    let pen_x = (moving.w + fixed.w) * 0.5 - delta.x.abs();
    let pen_y = (moving.h + fixed.h) * 0.5 - delta.y.abs();

    // Strict comparison: equal penetration resolves on the Y axis.
    if pen_x < pen_y {
        if delta.x < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if delta.y < 0.0 {
        Direction::Top
    } else {
        Direction::Bottom
    }
}

/// Indices of `candidates` within `distance` of `rect` on every side.
pub fn nearby(rect: Rect, candidates: &[Rect], distance: f32) -> Vec<usize> {
    let area = rect.inflate(distance * 2.0, distance * 2.0);
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| overlaps(area, **candidate))
        .map(|(i, _)| i)
        .collect()
}
