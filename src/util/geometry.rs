// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between percent coordinates and
//! pixel coordinates.

use kurbo::Point;

/// Convert percent coordinates (0-100) to pixel coordinates.
pub fn percent_to_pixels(x_percent: f64, y_percent: f64, width: u32, height: u32) -> Point {
    Point::new(
        x_percent * width as f64 / 100.0,
        y_percent * height as f64 / 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_pixels_corners() {
        assert_eq!(percent_to_pixels(0.0, 0.0, 1920, 1080), Point::new(0.0, 0.0));
        assert_eq!(percent_to_pixels(100.0, 100.0, 1920, 1080), Point::new(1920.0, 1080.0));
        assert_eq!(percent_to_pixels(50.0, 50.0, 1920, 1080), Point::new(960.0, 540.0));
    }

    #[test]
    fn test_percent_to_pixels_zero_size() {
        assert_eq!(percent_to_pixels(75.0, 25.0, 0, 0), Point::ORIGIN);
    }
}
