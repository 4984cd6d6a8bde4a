//! Cached rotated sprites
//!
//! Rotating a sprite every frame is wasteful; headings are quantised to a
//! tenth of a degree and each (sprite, heading) pair is rotated once.

use std::collections::HashMap;

use crate::assets::{Sprite, SpriteKind};

/// Headings within this many degrees of zero draw the unrotated sprite
pub const MIN_ROTATION: f32 = 1.0;

/// Heading in tenths of a degree
#[inline]
pub fn quantize(angle: f32) -> i32 {
    (angle * 10.0).round() as i32
}

#[derive(Debug, Default)]
pub struct RotationCache {
    entries: HashMap<(SpriteKind, i32), Sprite>,
}

impl RotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base` rotated to `angle` degrees (counter-clockwise), rotating on
    /// first use only
    pub fn rotated<'a>(&'a mut self, kind: SpriteKind, base: &'a Sprite, angle: f32) -> &'a Sprite {
        let key = quantize(angle);
        if angle.abs() <= MIN_ROTATION {
            return base;
        }
        self.entries.entry((kind, key)).or_insert_with(|| {
            log::trace!("Rotating {:?} to {:.1} degrees", kind, key as f32 / 10.0);
            base.rotated(key as f32 / 10.0)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
