// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom transform calculation.
//!
//! Maps the active zoom block to a translate + scale pair. Translation is
//! expressed in percent of the frame, applied before scaling, and chosen so
//! the block's focal point stays centred after magnification.

use crate::models::zoom_block::ZoomBlock;
use crate::util::geometry::percent_to_pixels;
use kurbo::Point;

/// Translate + scale applied to a video frame before drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    /// Horizontal translation, percent of frame width
    pub translate_x: f64,
    /// Vertical translation, percent of frame height
    pub translate_y: f64,
    /// Uniform magnification
    pub scale: f64,
    /// Focal point the scale pivots around, percent of frame width
    pub focus_x: f64,
    /// Focal point the scale pivots around, percent of frame height
    pub focus_y: f64,
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        focus_x: 50.0,
        focus_y: 50.0,
    };

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translate_x == 0.0 && self.translate_y == 0.0
    }

    /// Focal point in pixels for a frame of the given size.
    pub fn pivot(&self, width: u32, height: u32) -> Point {
        percent_to_pixels(self.focus_x, self.focus_y, width, height)
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compute the transform for `active`, or identity when nothing is active.
pub fn compute(active: Option<&ZoomBlock>) -> ZoomTransform {
    let Some(block) = active else {
        return ZoomTransform::IDENTITY;
    };
    let factor = (block.scale - 1.0) / block.scale;
    ZoomTransform {
        translate_x: -(block.x - 50.0) * factor,
        translate_y: -(block.y - 50.0) * factor,
        scale: block.scale,
        focus_x: block.x,
        focus_y: block.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::ZoomBlockStore;
    use crate::models::zoom_block::ZoomBlockPatch;
    use kurbo::{Affine, Vec2};

    fn block(x: f64, y: f64, scale: f64) -> ZoomBlock {
        let mut store = ZoomBlockStore::new();
        let id = store.add(0.0, 1.0, scale);
        store.update(id, &ZoomBlockPatch::position(x, y));
        store.list()[0].clone()
    }

    #[test]
    fn test_none_is_identity() {
        let t = compute(None);
        assert_eq!((t.translate_x, t.translate_y, t.scale), (0.0, 0.0, 1.0));
        assert!(t.is_identity());
    }

    #[test]
    fn test_center_focus_has_no_translation() {
        let t = compute(Some(&block(50.0, 50.0, 2.0)));
        assert_eq!((t.translate_x, t.translate_y, t.scale), (0.0, 0.0, 2.0));
        assert!(!t.is_identity());
    }

    #[test]
    fn test_top_left_focus() {
        let t = compute(Some(&block(0.0, 0.0, 2.0)));
        assert!((t.translate_x - 25.0).abs() < 1e-9);
        assert!((t.translate_y - 25.0).abs() < 1e-9);
        assert_eq!(t.scale, 2.0);
    }

    #[test]
    fn test_bottom_right_focus_translates_negative() {
        let t = compute(Some(&block(100.0, 100.0, 4.0)));
        assert!((t.translate_x + 37.5).abs() < 1e-9);
        assert!((t.translate_y + 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_unit_scale_block_is_identity() {
        let t = compute(Some(&block(10.0, 90.0, 1.0)));
        assert!(t.is_identity());
    }

    #[test]
    fn test_compute_is_repeatable() {
        let b = block(12.5, 80.0, 3.3);
        let first = compute(Some(&b));
        for _ in 0..10 {
            assert_eq!(compute(Some(&b)), first);
        }
    }

    #[test]
    fn test_pivot_stays_fixed_under_zoom() {
        let t = compute(Some(&block(25.0, 75.0, 3.0)));
        let pivot = t.pivot(200, 100);
        assert_eq!(pivot, Point::new(50.0, 75.0));

        let offset = pivot.to_vec2();
        let m = Affine::translate(offset) * Affine::scale(t.scale) * Affine::translate(-offset);
        let p = m * pivot;
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 75.0).abs() < 1e-9);

        // A point one pixel right of the pivot moves `scale` pixels.
        let q = m * (pivot + Vec2::new(1.0, 0.0));
        assert!((q.x - 53.0).abs() < 1e-9);
    }
}
