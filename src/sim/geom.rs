//! Axis-aligned collision helpers
//!
//! Every collision in the hub is a rectangle-vs-rectangle overlap. Balls are
//! treated as their bounding square.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Square box for a ball whose top-left corner is `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Side of a bounded axis the velocity should point away from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// Make `v` point away from the given bound.
///
/// Returns true if the sign actually changed, so a ball resting against a wall
/// while already moving away does not flip back into it.
pub fn bounce(v: &mut f32, bound: Bound) -> bool {
    let away = match bound {
        Bound::Min => v.abs(),
        Bound::Max => -v.abs(),
    };
    let flipped = away != *v;
    *v = away;
    flipped
}

/// Normalized offset of `hit` along a span: -1 at `start`, 0 at the middle,
/// 1 at `start + len`. Clamped so grazing hits stay in range.
pub fn span_offset(hit: f32, start: f32, len: f32) -> f32 {
    debug_assert!(len > 0.0, "span must have positive length");
    (((hit - start) / len) * 2.0 - 1.0).clamp(-1.0, 1.0)
}
