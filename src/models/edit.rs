// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Field edits coming from the zoom block editor panel.
//!
//! Out-of-range input is clamped rather than rejected, so every edit
//! that reaches the store keeps the block's invariants intact.

use super::zoom_block::{
    ZoomBlock, ZoomBlockPatch, MIN_BLOCK_SPAN, POSITION_MAX, POSITION_MIN, SCALE_MAX, SCALE_MIN,
};

/// A single edited field with the raw value the user entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEdit {
    StartTime(f64),
    EndTime(f64),
    X(f64),
    Y(f64),
    Scale(f64),
}

/// Fixed focal points offered as one-click buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl PresetPosition {
    pub const ALL: [PresetPosition; 5] = [
        PresetPosition::TopLeft,
        PresetPosition::TopRight,
        PresetPosition::BottomLeft,
        PresetPosition::BottomRight,
        PresetPosition::Center,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PresetPosition::TopLeft => "Top Left",
            PresetPosition::TopRight => "Top Right",
            PresetPosition::BottomLeft => "Bottom Left",
            PresetPosition::BottomRight => "Bottom Right",
            PresetPosition::Center => "Center",
        }
    }

    /// Focal point in percent, `(x, y)`.
    pub fn coordinates(self) -> (f64, f64) {
        match self {
            PresetPosition::TopLeft => (0.0, 0.0),
            PresetPosition::TopRight => (100.0, 0.0),
            PresetPosition::BottomLeft => (0.0, 100.0),
            PresetPosition::BottomRight => (100.0, 100.0),
            PresetPosition::Center => (50.0, 50.0),
        }
    }

    pub fn patch(self) -> ZoomBlockPatch {
        let (x, y) = self.coordinates();
        ZoomBlockPatch::position(x, y)
    }
}

/// Turn a raw field edit into a clamped patch for `block`.
///
/// Returns `None` for non-numeric input (NaN or infinite), which leaves
/// the block as it was.
pub fn clamp_edit(block: &ZoomBlock, edit: FieldEdit, video_duration: f64) -> Option<ZoomBlockPatch> {
    let mut patch = ZoomBlockPatch::default();
    match edit {
        FieldEdit::StartTime(value) if value.is_finite() => {
            patch.start_time = Some(value.min(block.end_time - MIN_BLOCK_SPAN).max(0.0));
        }
        FieldEdit::EndTime(value) if value.is_finite() => {
            patch.end_time = Some(value.min(video_duration).max(block.start_time + MIN_BLOCK_SPAN));
        }
        FieldEdit::X(value) if value.is_finite() => {
            patch.x = Some(value.clamp(POSITION_MIN, POSITION_MAX));
        }
        FieldEdit::Y(value) if value.is_finite() => {
            patch.y = Some(value.clamp(POSITION_MIN, POSITION_MAX));
        }
        FieldEdit::Scale(value) if value.is_finite() => {
            patch.scale = Some(value.clamp(SCALE_MIN, SCALE_MAX));
        }
        _ => {
            log::debug!("Ignoring non-numeric edit {:?}", edit);
            return None;
        }
    }
    Some(patch)
}
