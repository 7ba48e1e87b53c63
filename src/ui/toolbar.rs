// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with transport and block commands.

use crate::models::session::EditorSession;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    OpenMedia,
    TogglePlayback,
    AddBlock,
    Deselect,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, session: &EditorSession, loading: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.add_enabled(!loading, egui::Button::new("📂 Open Video...")).clicked() {
            action = ToolbarAction::OpenMedia;
        }

        ui.separator();

        let has_media = session.has_media();
        let playback = session.playback();
        let play_label = if playback.is_playing { "⏸ Pause" } else { "▶ Play" };
        if ui.add_enabled(has_media, egui::Button::new(play_label)).clicked() {
            action = ToolbarAction::TogglePlayback;
        }
        if ui.add_enabled(has_media, egui::Button::new("➕ Zoom Block")).clicked() {
            action = ToolbarAction::AddBlock;
        }
        if ui
            .add_enabled(playback.selected_block.is_some(), egui::Button::new("Deselect"))
            .clicked()
        {
            action = ToolbarAction::Deselect;
        }

        ui.separator();

        let hint = if !has_media {
            "Open a video to begin"
        } else if playback.preview_mode {
            "Previewing the selected block - click it again to toggle preview"
        } else {
            "Click a block on the timeline to preview it, Space to play"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
