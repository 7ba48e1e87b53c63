// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom block timeline.
//!
//! A horizontal strip spanning the media duration with the playhead and
//! one bar per zoom block. Clicking a block selects it, clicking empty
//! space seeks.

use crate::models::session::EditorSession;
use crate::models::zoom_block::{ZoomBlock, ZoomBlockId};

const TRACK_HEIGHT: f32 = 64.0;

/// Result of timeline interaction.
pub enum TimelineAction {
    None,
    AddBlock,
    SelectBlock(ZoomBlockId),
    Seek(f64),
}

/// Position of `time` along a timeline of length `duration`, in `[0, 1]`.
pub fn time_fraction(time: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    (time / duration).clamp(0.0, 1.0)
}

/// Left edge and width of a block as fractions of the timeline.
pub fn block_span(block: &ZoomBlock, duration: f64) -> (f64, f64) {
    let left = time_fraction(block.start_time, duration);
    let right = time_fraction(block.end_time, duration);
    (left, right - left)
}

/// Topmost block under `fraction`. Later blocks are drawn on top.
fn hit_test(blocks: &[ZoomBlock], duration: f64, fraction: f64) -> Option<ZoomBlockId> {
    blocks
        .iter()
        .rev()
        .find(|block| {
            let (left, width) = block_span(block, duration);
            fraction >= left && fraction <= left + width
        })
        .map(|block| block.id())
}

/// Display the timeline and report what the user did.
pub fn show(ui: &mut egui::Ui, session: &EditorSession) -> TimelineAction {
    let mut action = TimelineAction::None;
    let duration = session.video_duration();

    ui.horizontal(|ui| {
        ui.heading("Timeline");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(session.has_media(), egui::Button::new("➕ Add Zoom Block"))
                .clicked()
            {
                action = TimelineAction::AddBlock;
            }
        });
    });

    let width = ui.available_width();
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(width, TRACK_HEIGHT), egui::Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(75));

    if !session.has_media() {
        return action;
    }

    if session.blocks().is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No zoom blocks yet",
            egui::FontId::proportional(13.0),
            egui::Color32::from_gray(160),
        );
    }

    let to_x = |fraction: f64| rect.min.x + fraction as f32 * rect.width();
    let selected = session.playback().selected_block;

    for block in session.blocks().list() {
        let (left, span) = block_span(block, duration);
        let bar = egui::Rect::from_min_max(
            egui::pos2(to_x(left), rect.min.y),
            egui::pos2(to_x(left + span), rect.max.y),
        );
        let hovered = response
            .hover_pos()
            .is_some_and(|pos| bar.contains(pos));
        let alpha = if hovered { 255 } else { 190 };
        painter.rect_filled(
            bar,
            4.0,
            egui::Color32::from_rgba_unmultiplied(147, 197, 253, alpha),
        );
        if selected == Some(block.id()) {
            painter.rect_stroke(bar, 4.0, egui::Stroke::new(2.0, egui::Color32::from_rgb(59, 130, 246)));
        }
    }

    // Playhead
    let playhead_x = to_x(time_fraction(session.playback().current_time, duration));
    painter.line_segment(
        [
            egui::pos2(playhead_x, rect.min.y),
            egui::pos2(playhead_x, rect.max.y),
        ],
        egui::Stroke::new(3.0, egui::Color32::from_rgb(239, 68, 68)),
    );

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let fraction = ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0) as f64;
            action = match hit_test(session.blocks().list(), duration, fraction) {
                Some(id) => TimelineAction::SelectBlock(id),
                None => TimelineAction::Seek(fraction * duration),
            };
        }
    }

    action
}
