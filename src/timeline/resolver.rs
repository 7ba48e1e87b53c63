// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Active zoom block lookup.

use crate::models::zoom_block::ZoomBlock;

/// Find the zoom block that governs rendering at `current_time`.
///
/// A selected block in preview mode is pinned and wins regardless of time.
/// Otherwise the first block in store order whose range contains the time
/// is returned, so when blocks overlap the earliest-inserted one wins.
pub fn resolve<'a>(
    current_time: f64,
    preview_mode: bool,
    selected: Option<&'a ZoomBlock>,
    blocks: &'a [ZoomBlock],
) -> Option<&'a ZoomBlock> {
    if preview_mode {
        if let Some(pinned) = selected {
            return Some(pinned);
        }
    }
    blocks.iter().find(|block| block.contains(current_time))
}
