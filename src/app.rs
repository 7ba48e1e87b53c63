// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the editor session, the media source and
//! the preview surface, routes panel actions into session transitions and
//! drives the render loop once per UI update.

use crate::config::AppConfig;
use crate::io::media::{self, MediaEvent, MediaSource};
use crate::models::session::{EditorSession, MediaCommand};
use crate::render::compositor;
use crate::render::frame_loop::{FrameHandle, FrameOutcome, FrameScheduler, RenderLoop};
use crate::render::surface::{DrawingSurface, RasterSurface};
use crate::ui::{canvas, properties, timeline, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::Instant;

/// Schedules render callbacks as egui repaints.
struct RepaintScheduler {
    ctx: egui::Context,
    next_id: u64,
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.ctx.request_repaint();
        FrameHandle(self.next_id)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        // egui has no way to retract a repaint; the loop ignores the stale tick.
        log::trace!("Cancelled frame callback {:?}", handle);
    }
}

/// Result of background media loading.
struct LoadedMedia {
    path: PathBuf,
    source: Box<dyn MediaSource + Send>,
}

/// Main application state.
pub struct ZoomcutApp {
    config: AppConfig,

    /// Zoom blocks, playback and selection state
    session: EditorSession,

    /// Currently opened media (if any)
    media: Option<Box<dyn MediaSource + Send>>,

    /// Path of the opened media
    media_path: Option<PathBuf>,

    /// Composited preview pixels
    surface: RasterSurface,

    /// Texture the preview pixels are uploaded to
    frame_texture: Option<egui::TextureHandle>,

    render_loop: RenderLoop,
    scheduler: RepaintScheduler,

    /// Receiver for background media loading
    media_loader: Option<Receiver<Result<LoadedMedia, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last error shown in the status bar
    status_error: Option<String>,
}

impl ZoomcutApp {
    /// Create the application, optionally opening `initial_media` right away.
    pub fn new(ctx: &egui::Context, config: AppConfig, initial_media: Option<PathBuf>) -> Self {
        let mut app = Self {
            session: EditorSession::new(config.block_defaults()),
            render_loop: RenderLoop::new(config.frame_interval()),
            scheduler: RepaintScheduler {
                ctx: ctx.clone(),
                next_id: 0,
            },
            config,
            media: None,
            media_path: None,
            surface: RasterSurface::default(),
            frame_texture: None,
            media_loader: None,
            loading_message: None,
            status_error: None,
        };
        if let Some(path) = initial_media {
            app.open_media(path);
        }
        app
    }

    /// Open a media file on a background thread.
    fn open_media(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.media_loader = Some(receiver);
        self.loading_message = Some(format!("Loading {}...", path.display()));
        let still_duration = self.config.still_duration_secs;

        std::thread::spawn(move || {
            let result = media::open_media(&path, still_duration)
                .map(|source| LoadedMedia {
                    path: path.clone(),
                    source,
                })
                .map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    fn pick_media_file(&mut self) {
        let dialog = rfd::FileDialog::new()
            .add_filter("Videos", media::VIDEO_EXTENSIONS)
            .add_filter("Images", media::IMAGE_EXTENSIONS);
        if let Some(path) = dialog.pick_file() {
            self.open_media(path);
        }
    }

    fn check_media_loader(&mut self) {
        let Some(receiver) = &self.media_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.media_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                log::info!("Opened {}", loaded.path.display());
                self.render_loop.stop(&mut self.scheduler);
                self.media = Some(loaded.source);
                self.media_path = Some(loaded.path);
                self.frame_texture = None;
                self.status_error = None;
                self.session.reset_playback();
                self.render_loop.request_redraw();
            }
            Err(e) => {
                log::error!("Failed to open media: {}", e);
                self.status_error = Some(e);
            }
        }
    }

    /// Forward media events into the session.
    fn poll_media(&mut self, now: Instant) {
        let Some(media) = self.media.as_mut() else {
            return;
        };
        for event in media.poll_events(now) {
            match event {
                MediaEvent::LoadedMetadata { duration, width, height } => {
                    log::info!("Media metadata: {}x{}, {:.2}s", width, height, duration);
                    self.session.on_loaded_metadata(duration);
                }
                MediaEvent::LoadedData => self.render_loop.request_redraw(),
                MediaEvent::TimeUpdate(time) => self.session.on_time_update(time),
                MediaEvent::Seeked(time) => {
                    self.session.on_time_update(time);
                    self.render_loop.request_redraw();
                }
                MediaEvent::Ended(time) => {
                    log::debug!("Playback ended at {:.2}s", time);
                    self.session.on_ended(time);
                }
            }
        }
    }

    fn apply_commands(&mut self, commands: Vec<MediaCommand>) {
        if commands.is_empty() {
            return;
        }
        let Some(media) = self.media.as_mut() else {
            return;
        };
        for command in commands {
            match command {
                MediaCommand::Play => media.play(),
                MediaCommand::Pause => media.pause(),
                MediaCommand::Seek(time) => media.seek(time),
            }
        }
        // Pick up the resulting media events promptly.
        self.scheduler.ctx.request_repaint();
    }

    fn toggle_playback(&mut self) {
        let commands = self.session.toggle_playback();
        self.apply_commands(commands);
    }

    fn add_block(&mut self) {
        if self.session.add_block().is_none() {
            self.status_error = Some("Open a video before adding zoom blocks".to_string());
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        // Ignore shortcuts while a numeric field is being edited
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.toggle_playback();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            self.session.delete_selected();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            let commands = self.session.select_block(None);
            self.apply_commands(commands);
        }
    }

    /// Run one render tick and upload the result when a frame was drawn.
    fn render(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(media) = self.media.as_mut() else {
            return;
        };

        if self.session.playback().is_playing {
            self.render_loop.start(&mut self.scheduler);
        } else {
            self.render_loop.stop(&mut self.scheduler);
        }

        let surface = &mut self.surface;
        let session = &self.session;
        let outcome = self.render_loop.pump(&mut self.scheduler, now, session.revision(), || {
            let transform = compositor::compose_frame(surface, &mut **media, session)?;
            log::trace!("Composited frame with {:?}", transform);
            Ok(())
        });

        if outcome == FrameOutcome::Drawn {
            let (width, height) = self.surface.size();
            let image = egui::ColorImage::from_rgba_premultiplied(
                [width as usize, height as usize],
                self.surface.data(),
            );
            match &mut self.frame_texture {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.frame_texture =
                        Some(ctx.load_texture("preview_frame", image, egui::TextureOptions::LINEAR));
                }
            }
        }
    }
}

impl Drop for ZoomcutApp {
    fn drop(&mut self) {
        self.render_loop.stop(&mut self.scheduler);
    }
}

impl eframe::App for ZoomcutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.check_media_loader();
        self.poll_media(now);
        self.handle_keyboard(ctx);
        self.render(ctx, now);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Video...").clicked() {
                        self.pick_media_file();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.session.has_media(), egui::Button::new("Add Zoom Block"))
                        .clicked()
                    {
                        self.add_block();
                        ui.close_menu();
                    }

                    let has_selection = self.session.playback().selected_block.is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.session.delete_selected();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Deselect (Esc)"))
                        .clicked()
                    {
                        let commands = self.session.select_block(None);
                        self.apply_commands(commands);
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, &self.session, self.loading_message.is_some())
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::OpenMedia => self.pick_media_file(),
            toolbar::ToolbarAction::TogglePlayback => self.toggle_playback(),
            toolbar::ToolbarAction::AddBlock => self.add_block(),
            toolbar::ToolbarAction::Deselect => {
                let commands = self.session.select_block(None);
                self.apply_commands(commands);
            }
            toolbar::ToolbarAction::None => {}
        }

        // Status bar (bottom)
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.media_path {
                    Some(path) => ui.label(path.display().to_string()),
                    None => ui.label("No file loaded"),
                };
                ui.separator();
                ui.label(format!("{} zoom blocks", self.session.blocks().len()));
                if let Some(error) = &self.status_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error.as_str());
                }
            });
        });

        // Timeline (bottom, above the status bar)
        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .resizable(false)
            .show(ctx, |ui| timeline::show(ui, &self.session))
            .inner;

        match timeline_action {
            timeline::TimelineAction::AddBlock => self.add_block(),
            timeline::TimelineAction::SelectBlock(id) => {
                let commands = self.session.select_block(Some(id));
                self.apply_commands(commands);
            }
            timeline::TimelineAction::Seek(time) => {
                let commands = self.session.seek(time);
                self.apply_commands(commands);
            }
            timeline::TimelineAction::None => {}
        }

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| properties::show(ui, &self.session))
            .inner;

        match properties_action {
            properties::PropertiesAction::Edit(id, edit) => {
                self.session.edit_block(id, edit);
            }
            properties::PropertiesAction::Preset(id, preset) => {
                self.session.apply_preset(id, preset);
            }
            properties::PropertiesAction::Delete(id) => {
                self.session.delete_block(id);
            }
            properties::PropertiesAction::None => {}
        }

        // Preview canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    let frame_size = self.frame_texture.as_ref().map(|_| self.surface.size());
                    canvas::show(ui, &self.session, &self.frame_texture, frame_size)
                }
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::TogglePlayback => self.toggle_playback(),
            canvas::CanvasAction::None => {}
        }

        // Session changes made above are drawn on the next tick.
        if self.render_loop.needs_redraw(self.session.revision()) {
            ctx.request_repaint();
        }
    }
}
