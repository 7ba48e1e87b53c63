// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoomcut - zoom block video editor
//!
//! A desktop application for marking time-ranged pan/zoom regions on a
//! video and previewing the zoom effect composited over playback.

mod app;
mod config;
mod io;
mod models;
mod render;
mod timeline;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::ZoomcutApp;
use config::AppConfig;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load().context("Failed to load settings")?;
    let initial_media = std::env::args_os().nth(1).map(PathBuf::from);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Zoomcut - Zoom Block Video Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Zoomcut",
        options,
        Box::new(move |cc| Ok(Box::new(ZoomcutApp::new(&cc.egui_ctx, config, initial_media)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
