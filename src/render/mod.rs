// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom compositing for the preview.
//!
//! The compositor draws the current source frame onto a drawing surface
//! under the active zoom transform; the render loop decides when that
//! happens.

pub mod compositor;
pub mod frame_loop;
pub mod surface;

use crate::io::media::MediaError;

/// A single frame could not be drawn. Logged and skipped, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("source frame not decodable: {0}")]
    Source(#[from] MediaError),

    #[error("source has no pixel dimensions yet")]
    NoDimensions,

    #[error("drawing surface unavailable: {0}")]
    Surface(String),
}
