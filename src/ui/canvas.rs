// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas.
//!
//! Shows the composited frame letterboxed into the central panel, with the
//! transport overlay (play/pause, time readout) and a badge describing the
//! zoom block currently applied.

use crate::models::session::EditorSession;
use crate::models::zoom_block::ZoomBlock;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    TogglePlayback,
}

/// Badge text for the active zoom block.
pub fn badge_text(preview_mode: bool, block: &ZoomBlock) -> String {
    let mode = if preview_mode { "Preview Mode" } else { "Zoom Active" };
    format!("{}: X{}% Y{}%", mode, block.x, block.y)
}

/// Whole-second time readout, as shown on the transport overlay.
pub fn time_label(seconds: f64) -> String {
    format!("{}s", seconds.max(0.0).floor() as u64)
}

/// Fit a `width` x `height` frame inside `available`, preserving aspect.
fn fit_rect(available: egui::Rect, width: u32, height: u32) -> egui::Rect {
    let img_aspect = width as f32 / height as f32;
    let available_aspect = available.width() / available.height();

    let (display_width, display_height) = if img_aspect > available_aspect {
        // Frame is wider - fit to width
        (available.width(), available.width() / img_aspect)
    } else {
        // Frame is taller - fit to height
        (available.height() * img_aspect, available.height())
    };

    egui::Rect::from_center_size(available.center(), egui::vec2(display_width, display_height))
}

/// Display the preview area and its overlay controls.
pub fn show(
    ui: &mut egui::Ui,
    session: &EditorSession,
    frame_texture: &Option<egui::TextureHandle>,
    frame_size: Option<(u32, u32)>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::BLACK;

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);
        let area = ui.max_rect();

        let (Some(texture), Some((width, height))) = (frame_texture, frame_size) else {
            // Welcome message when no media is loaded
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading(
                        egui::RichText::new("Zoomcut")
                            .size(32.0)
                            .color(egui::Color32::from_gray(200)),
                    );
                    ui.add_space(10.0);
                    ui.label(
                        egui::RichText::new("Open a video to start adding zoom blocks")
                            .color(egui::Color32::from_gray(180)),
                    );
                    ui.label(
                        egui::RichText::new("File → Open Video...")
                            .weak()
                            .color(egui::Color32::from_gray(130)),
                    );
                });
            });
            return;
        };
        if width == 0 || height == 0 {
            return;
        }

        let image_rect = fit_rect(area, width, height);
        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Transport overlay, bottom left
        let playback = session.playback();
        let overlay_origin = image_rect.left_bottom() + egui::vec2(16.0, -44.0);
        let overlay_rect = egui::Rect::from_min_size(overlay_origin, egui::vec2(160.0, 32.0));
        ui.allocate_ui_at_rect(overlay_rect, |ui| {
            ui.horizontal(|ui| {
                let icon = if playback.is_playing { "⏸" } else { "▶" };
                if ui.button(egui::RichText::new(icon).size(18.0)).clicked() {
                    action = CanvasAction::TogglePlayback;
                }
                ui.label(
                    egui::RichText::new(time_label(playback.current_time))
                        .color(egui::Color32::WHITE)
                        .background_color(egui::Color32::from_black_alpha(160)),
                );
            });
        });

        // Active zoom badge, top right
        if let Some(block) = session.active_block() {
            ui.painter().text(
                image_rect.right_top() + egui::vec2(-16.0, 16.0),
                egui::Align2::RIGHT_TOP,
                badge_text(playback.preview_mode, block),
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgb(96, 165, 250),
            );
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::BlockDefaults;

    #[test]
    fn test_badge_text() {
        let mut session = EditorSession::new(BlockDefaults::default());
        session.on_loaded_metadata(10.0);
        session.add_block().unwrap();
        let block = session.active_block().unwrap();

        assert_eq!(badge_text(true, block), "Preview Mode: X50% Y50%");
        assert_eq!(badge_text(false, block), "Zoom Active: X50% Y50%");
    }

    #[test]
    fn test_time_label_floors() {
        assert_eq!(time_label(0.0), "0s");
        assert_eq!(time_label(12.99), "12s");
        assert_eq!(time_label(-1.0), "0s");
    }

    #[test]
    fn test_fit_rect_letterboxes() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 200.0));
        let fitted = fit_rect(area, 1920, 1080);
        assert!((fitted.width() - 200.0).abs() < 0.01);
        assert!((fitted.height() - 112.5).abs() < 0.01);
        assert!((fitted.center().y - 100.0).abs() < 0.01);
    }
}
