// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! 2D drawing surfaces.
//!
//! [`DrawingSurface`] is the canvas-style API the compositor draws through.
//! [`RasterSurface`] implements it on a tiny-skia pixmap, which the preview
//! panel uploads to a texture.

use super::RenderError;
use image::RgbaImage;
use kurbo::{Affine, Vec2};
use tiny_skia::{Color, ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Canvas-like 2D drawing context with a save/restore transform stack.
pub trait DrawingSurface {
    fn size(&self) -> (u32, u32);
    /// Resize the backing store. Clears contents and resets transform state.
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Draw `image` stretched into the rectangle `(x, y, width, height)`
    /// of the current coordinate space.
    fn draw_image(
        &mut self,
        image: &RgbaImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError>;
}

/// CPU raster surface backed by a premultiplied RGBA [`Pixmap`].
///
/// A zero-sized surface has no pixmap; drawing onto it fails.
#[derive(Default)]
pub struct RasterSurface {
    target: Option<Pixmap>,
    /// Last drawn image, converted to premultiplied alpha
    frame: Option<Pixmap>,
    transform: Affine,
    stack: Vec<Affine>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Pixmap::new(width, height),
            ..Default::default()
        }
    }

    /// Premultiplied RGBA bytes, row-major. Empty for a zero-sized surface.
    pub fn data(&self) -> &[u8] {
        self.target.as_ref().map_or(&[][..], |pixmap| pixmap.data())
    }

    /// Copy `image` into the reusable frame pixmap.
    fn load_frame(&mut self, image: &RgbaImage) -> Result<(), RenderError> {
        let (width, height) = image.dimensions();
        let reusable = self
            .frame
            .as_ref()
            .is_some_and(|frame| frame.width() == width && frame.height() == height);
        if !reusable {
            self.frame = Pixmap::new(width, height);
        }
        let frame = self.frame.as_mut().ok_or(RenderError::NoDimensions)?;
        for (dst, src) in frame.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(())
    }
}

fn to_skia(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.target
            .as_ref()
            .map_or((0, 0), |pixmap| (pixmap.width(), pixmap.height()))
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Resizing surface to {}x{}", width, height);
        self.target = Pixmap::new(width, height);
        self.transform = Affine::IDENTITY;
        self.stack.clear();
    }

    fn clear(&mut self) {
        if let Some(target) = self.target.as_mut() {
            target.fill(Color::TRANSPARENT);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.transform = previous;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.pre_translate(Vec2::new(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.pre_scale_non_uniform(sx, sy);
    }

    fn draw_image(
        &mut self,
        image: &RgbaImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        let (src_w, src_h) = image.dimensions();
        if src_w == 0 || src_h == 0 || width <= 0.0 || height <= 0.0 {
            return Err(RenderError::NoDimensions);
        }
        if self.target.is_none() {
            return Err(RenderError::NoDimensions);
        }

        // Map the image's pixel grid onto the destination rectangle.
        let transform = self.transform
            * Affine::translate((x, y))
            * Affine::scale_non_uniform(width / src_w as f64, height / src_h as f64);
        if transform.determinant().abs() < f64::EPSILON {
            return Err(RenderError::Surface("transform is not invertible".to_string()));
        }

        self.load_frame(image)?;
        let (Some(target), Some(frame)) = (self.target.as_mut(), self.frame.as_ref()) else {
            return Err(RenderError::NoDimensions);
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        target.draw_pixmap(0, 0, frame.as_ref(), &paint, to_skia(transform), None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    /// Square image with a distinct colour per quadrant.
    fn quadrants(size: u32) -> RgbaImage {
        let half = size / 2;
        RgbaImage::from_fn(size, size, |x, y| match (x < half, y < half) {
            (true, true) => Rgba(RED),
            (false, true) => Rgba(GREEN),
            (true, false) => Rgba(BLUE),
            (false, false) => Rgba(WHITE),
        })
    }

    fn pixel(surface: &RasterSurface, x: u32, y: u32) -> [u8; 4] {
        let (width, _) = surface.size();
        let i = ((y * width + x) * 4) as usize;
        let data = surface.data();
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(a.abs_diff(*e) <= 2, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_identity_draw_copies_pixels() {
        let src = quadrants(4);
        let mut surface = RasterSurface::new(4, 4);
        surface.draw_image(&src, 0.0, 0.0, 4.0, 4.0).unwrap();
        for (x, y, p) in src.enumerate_pixels() {
            assert_close(pixel(&surface, x, y), p.0);
        }
    }

    #[test]
    fn test_scaled_draw_magnifies_top_left() {
        let src = quadrants(8);
        let mut surface = RasterSurface::new(4, 4);
        surface.scale(2.0, 2.0);
        surface.draw_image(&src, 0.0, 0.0, 4.0, 4.0).unwrap();

        // Drawn into 4x4 then doubled: the red quadrant covers everything.
        for y in 0..4 {
            for x in 0..4 {
                assert_close(pixel(&surface, x, y), RED);
            }
        }
    }

    #[test]
    fn test_save_restore() {
        let mut surface = RasterSurface::new(2, 2);
        surface.save();
        surface.translate(5.0, 5.0);
        surface.scale(3.0, 3.0);
        assert_eq!(surface.transform.as_coeffs(), [3.0, 0.0, 0.0, 3.0, 5.0, 5.0]);
        surface.restore();
        assert_eq!(surface.transform, Affine::IDENTITY);

        // Unbalanced restore is ignored.
        surface.restore();
        assert_eq!(surface.transform, Affine::IDENTITY);
    }

    #[test]
    fn test_clear_and_resize() {
        let mut surface = RasterSurface::new(2, 2);
        surface.draw_image(&quadrants(2), 0.0, 0.0, 2.0, 2.0).unwrap();
        surface.clear();
        assert!(surface.data().iter().all(|&b| b == 0));

        surface.translate(1.0, 1.0);
        surface.resize(8, 6);
        assert_eq!(surface.size(), (8, 6));
        assert_eq!(surface.data().len(), 8 * 6 * 4);
        assert_eq!(surface.transform, Affine::IDENTITY);
    }

    #[test]
    fn test_empty_image_fails() {
        let mut surface = RasterSurface::new(2, 2);
        let result = surface.draw_image(&RgbaImage::new(0, 0), 0.0, 0.0, 2.0, 2.0);
        assert!(matches!(result, Err(RenderError::NoDimensions)));
    }

    #[test]
    fn test_zero_sized_surface_fails() {
        let mut surface = RasterSurface::default();
        assert_eq!(surface.size(), (0, 0));
        assert!(surface.data().is_empty());
        let result = surface.draw_image(&quadrants(2), 0.0, 0.0, 2.0, 2.0);
        assert!(matches!(result, Err(RenderError::NoDimensions)));
    }

    #[test]
    fn test_singular_transform_fails() {
        let mut surface = RasterSurface::new(2, 2);
        surface.scale(0.0, 1.0);
        let result = surface.draw_image(&quadrants(2), 0.0, 0.0, 2.0, 2.0);
        assert!(matches!(result, Err(RenderError::Surface(_))));
    }
}
