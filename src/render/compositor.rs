// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Draws one preview frame.

use super::surface::DrawingSurface;
use super::RenderError;
use crate::io::media::MediaSource;
use crate::models::session::EditorSession;
use crate::timeline::transform::ZoomTransform;

/// Composite the source's current frame onto `surface` under the zoom
/// transform active at the source's current time.
///
/// The surface is resized to the source's native size when it differs,
/// then cleared. A non-identity zoom is applied as translate to the focal
/// point, scale, translate back, so the focal point is the pivot. Transform
/// state is restored even when the draw itself fails.
pub fn compose_frame<S>(
    surface: &mut S,
    source: &mut dyn MediaSource,
    session: &EditorSession,
) -> Result<ZoomTransform, RenderError>
where
    S: DrawingSurface + ?Sized,
{
    let (width, height) = source.dimensions().ok_or(RenderError::NoDimensions)?;
    if surface.size() != (width, height) {
        surface.resize(width, height);
    }
    surface.clear();

    let transform = session.transform_at(source.current_time());
    let frame = source.current_frame()?;
    let (w, h) = (width as f64, height as f64);

    if transform.is_identity() {
        surface.draw_image(frame, 0.0, 0.0, w, h)?;
    } else {
        let pivot = transform.pivot(width, height);
        surface.save();
        surface.translate(pivot.x, pivot.y);
        surface.scale(transform.scale, transform.scale);
        surface.translate(-pivot.x, -pivot.y);
        let drawn = surface.draw_image(frame, 0.0, 0.0, w, h);
        surface.restore();
        drawn?;
    }
    Ok(transform)
}
