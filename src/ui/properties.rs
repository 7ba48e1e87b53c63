// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom block properties panel.
//!
//! This module provides the editor form for the selected zoom block: time
//! range, focal point, scale, preset positions and delete.

use crate::models::edit::{FieldEdit, PresetPosition};
use crate::models::session::EditorSession;
use crate::models::zoom_block::ZoomBlockId;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    Edit(ZoomBlockId, FieldEdit),
    Preset(ZoomBlockId, PresetPosition),
    Delete(ZoomBlockId),
}

fn field(ui: &mut egui::Ui, label: &str, value: f64, decimals: usize, speed: f64) -> Option<f64> {
    ui.label(label);
    let mut edited = value;
    let response = ui.add(
        egui::DragValue::new(&mut edited)
            .speed(speed)
            .fixed_decimals(decimals),
    );
    ui.end_row();
    (response.changed() && edited != value).then_some(edited)
}

/// Display the properties panel for the selected block.
pub fn show(ui: &mut egui::Ui, session: &EditorSession) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Edit Zoom Block");
    ui.separator();

    let Some(block) = session.selected_block() else {
        ui.label(egui::RichText::new("Select a zoom block to edit.").weak());
        return action;
    };
    let id = block.id();

    ui.label(
        egui::RichText::new(if session.playback().preview_mode {
            format!("Block {} (previewing)", id)
        } else {
            format!("Block {}", id)
        })
        .strong(),
    );
    ui.add_space(8.0);

    egui::Grid::new("zoom_block_fields")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            if let Some(v) = field(ui, "Start Time (s):", block.start_time, 1, 0.1) {
                action = PropertiesAction::Edit(id, FieldEdit::StartTime(v));
            }
            if let Some(v) = field(ui, "End Time (s):", block.end_time, 1, 0.1) {
                action = PropertiesAction::Edit(id, FieldEdit::EndTime(v));
            }
            if let Some(v) = field(ui, "X Position (%):", block.x, 0, 1.0) {
                action = PropertiesAction::Edit(id, FieldEdit::X(v));
            }
            if let Some(v) = field(ui, "Y Position (%):", block.y, 0, 1.0) {
                action = PropertiesAction::Edit(id, FieldEdit::Y(v));
            }
            if let Some(v) = field(ui, "Zoom Scale:", block.scale, 1, 0.1) {
                action = PropertiesAction::Edit(id, FieldEdit::Scale(v));
            }
        });

    ui.add_space(8.0);
    ui.label("Preset Positions:");
    ui.horizontal_wrapped(|ui| {
        for preset in PresetPosition::ALL {
            if ui.button(preset.label()).clicked() {
                action = PropertiesAction::Preset(id, preset);
            }
        }
    });

    ui.add_space(12.0);
    let delete = egui::Button::new(egui::RichText::new("Delete Block").color(egui::Color32::WHITE))
        .fill(egui::Color32::from_rgb(239, 68, 68));
    if ui.add(delete).clicked() {
        action = PropertiesAction::Delete(id);
    }

    action
}
