//! Axis-aligned rectangle overlap tests

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True if the rectangles share a region of positive area.
    ///
    /// Rectangles that only touch along an edge or corner do not overlap,
    /// and an empty rectangle never overlaps anything.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && other.width > 0.0
            && other.height > 0.0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// True iff `a` and `b` intersect with positive area
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// True if `candidate` overlaps any rectangle in `existing`
pub fn any_overlap<I>(candidate: &Rect, existing: I) -> bool
where
    I: IntoIterator<Item = Rect>,
{
    existing.into_iter().any(|r| candidate.overlaps(&r))
}
