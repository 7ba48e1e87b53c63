// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom block data structures.
//!
//! A zoom block is a time-ranged pan/zoom effect: while playback time is
//! inside `[start_time, end_time]` the frame is magnified by `scale`
//! around the focal point `(x, y)`, given in percent of the frame size.

use std::fmt;

/// Smallest allowed gap between a block's start and end, in seconds.
pub const MIN_BLOCK_SPAN: f64 = 0.1;

/// Focal point bounds, in percent of the frame.
pub const POSITION_MIN: f64 = 0.0;
pub const POSITION_MAX: f64 = 100.0;

/// Magnification bounds.
pub const SCALE_MIN: f64 = 1.0;
pub const SCALE_MAX: f64 = 5.0;

/// Identifier assigned by the store when a block is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoomBlockId(pub u64);

impl fmt::Display for ZoomBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One timed pan/zoom effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBlock {
    id: ZoomBlockId,
    /// Start of the effect in seconds
    pub start_time: f64,
    /// End of the effect in seconds
    pub end_time: f64,
    /// Focal point, horizontal percent (0-100)
    pub x: f64,
    /// Focal point, vertical percent (0-100)
    pub y: f64,
    /// Magnification factor (1-5)
    pub scale: f64,
}

impl ZoomBlock {
    pub(crate) fn new(id: ZoomBlockId, start_time: f64, end_time: f64, scale: f64) -> Self {
        Self {
            id,
            start_time,
            end_time,
            x: 50.0,
            y: 50.0,
            scale,
        }
    }

    /// The block's immutable identifier.
    pub fn id(&self) -> ZoomBlockId {
        self.id
    }

    /// Whether `time` falls inside the block, both ends inclusive.
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    /// Merge the fields present in `patch` into this block.
    pub fn apply(&mut self, patch: &ZoomBlockPatch) {
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
    }
}

/// Partial update for a zoom block. Only `Some` fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoomBlockPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
}

impl ZoomBlockPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let block = ZoomBlock::new(ZoomBlockId(1), 2.0, 4.0, 1.5);
        assert!(block.contains(2.0));
        assert!(block.contains(4.0));
        assert!(!block.contains(1.99));
        assert!(!block.contains(4.01));
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut block = ZoomBlock::new(ZoomBlockId(7), 1.0, 3.0, 2.0);
        block.apply(&ZoomBlockPatch::position(10.0, 90.0));

        assert_eq!(block.x, 10.0);
        assert_eq!(block.y, 90.0);
        assert_eq!(block.start_time, 1.0);
        assert_eq!(block.end_time, 3.0);
        assert_eq!(block.scale, 2.0);
        assert_eq!(block.id(), ZoomBlockId(7));
    }
}
