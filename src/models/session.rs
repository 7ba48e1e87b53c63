// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor session state.
//!
//! The session owns the zoom block store, the transient playback state and
//! the selection/preview toggles. Playback transitions do not touch the
//! media source directly; they return [`MediaCommand`]s for the caller to
//! apply, so every handler here is a plain state transition.

use super::edit::{clamp_edit, FieldEdit, PresetPosition};
use super::store::ZoomBlockStore;
use super::zoom_block::{ZoomBlock, ZoomBlockId, ZoomBlockPatch, MIN_BLOCK_SPAN};
use crate::timeline::{resolver, transform};

/// Instruction for the media source produced by a session transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    Seek(f64),
}

/// Defaults for newly created zoom blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockDefaults {
    /// Length of a new block in seconds
    pub length: f64,
    /// Scale of a new block
    pub scale: f64,
}

impl Default for BlockDefaults {
    fn default() -> Self {
        Self {
            length: 2.0,
            scale: 1.5,
        }
    }
}

/// Transient playback and selection state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
    /// Time captured by the last pause
    pub paused_time: f64,
    pub selected_block: Option<ZoomBlockId>,
    /// Pin the selected block's zoom regardless of time
    pub preview_mode: bool,
}

/// Top-level editing session.
#[derive(Debug, Default)]
pub struct EditorSession {
    blocks: ZoomBlockStore,
    playback: PlaybackState,
    video_duration: f64,
    defaults: BlockDefaults,
    revision: u64,
}

impl EditorSession {
    pub fn new(defaults: BlockDefaults) -> Self {
        Self {
            blocks: ZoomBlockStore::new(),
            defaults,
            ..Default::default()
        }
    }

    pub fn blocks(&self) -> &ZoomBlockStore {
        &self.blocks
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn video_duration(&self) -> f64 {
        self.video_duration
    }

    pub fn has_media(&self) -> bool {
        self.video_duration >= MIN_BLOCK_SPAN
    }

    /// Counter bumped by every change that affects the rendered frame.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ---- media events ----

    /// A new source was opened: reset playback, keep the blocks.
    pub fn reset_playback(&mut self) {
        self.playback = PlaybackState::default();
        self.video_duration = 0.0;
        self.touch();
    }

    pub fn on_loaded_metadata(&mut self, duration: f64) {
        self.video_duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        log::info!("Media duration: {:.2}s", self.video_duration);
        self.touch();
    }

    pub fn on_time_update(&mut self, time: f64) {
        self.playback.current_time = time;
    }

    /// Playback reached the end of the source.
    pub fn on_ended(&mut self, time: f64) {
        self.playback.current_time = time;
        if self.playback.is_playing {
            self.playback.is_playing = false;
            self.playback.paused_time = time;
            self.touch();
        }
    }

    // ---- playback controller ----

    /// Start playback. Does nothing until media is loaded.
    pub fn play(&mut self) -> Vec<MediaCommand> {
        if !self.has_media() || self.playback.is_playing {
            return Vec::new();
        }
        if self.playback.preview_mode {
            self.playback.preview_mode = false;
            self.playback.selected_block = None;
        }
        self.playback.is_playing = true;
        self.touch();
        vec![MediaCommand::Play]
    }

    pub fn pause(&mut self) -> Vec<MediaCommand> {
        if !self.playback.is_playing {
            return Vec::new();
        }
        self.playback.is_playing = false;
        self.playback.paused_time = self.playback.current_time;
        self.touch();
        vec![MediaCommand::Pause]
    }

    pub fn toggle_playback(&mut self) -> Vec<MediaCommand> {
        if !self.has_media() {
            return Vec::new();
        }
        if self.playback.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Move the playhead without changing play/pause state.
    pub fn seek(&mut self, time: f64) -> Vec<MediaCommand> {
        let upper = if self.has_media() { self.video_duration } else { 0.0 };
        let time = if time.is_finite() { time.clamp(0.0, upper) } else { 0.0 };
        self.playback.current_time = time;
        self.touch();
        vec![MediaCommand::Seek(time)]
    }

    /// Select a block, or clear the selection with `None`.
    ///
    /// Selecting the already-selected block toggles preview mode only.
    /// Selecting a different block pins it in preview mode and seeks to the
    /// last pause position when coming from normal playback, or to the
    /// block's start when switching between previewed blocks.
    pub fn select_block(&mut self, id: Option<ZoomBlockId>) -> Vec<MediaCommand> {
        let Some(id) = id else {
            if self.playback.selected_block.is_some() || self.playback.preview_mode {
                self.playback.selected_block = None;
                self.playback.preview_mode = false;
                self.touch();
                log::info!("Deselected zoom block");
            }
            return Vec::new();
        };

        if self.playback.selected_block == Some(id) {
            self.playback.preview_mode = !self.playback.preview_mode;
            self.touch();
            log::info!("Preview mode {} for block {}", self.playback.preview_mode, id);
            return Vec::new();
        }

        let Some(block) = self.blocks.get(id) else {
            log::warn!("Ignoring selection of unknown block {}", id);
            return Vec::new();
        };

        let time = if self.playback.preview_mode {
            block.start_time
        } else {
            self.playback.paused_time
        };

        self.playback.current_time = time;
        self.playback.selected_block = Some(id);
        self.playback.preview_mode = true;
        self.touch();
        log::info!("Selected block {}, seeking to {:.2}s", id, time);

        let mut commands = vec![MediaCommand::Seek(time)];
        if self.playback.is_playing {
            self.playback.is_playing = false;
            self.playback.paused_time = time;
            commands.push(MediaCommand::Pause);
        }
        commands
    }

    // ---- editor panel ----

    /// Create a block at the playhead, select it and enter preview mode.
    ///
    /// Returns `None` when no media is loaded.
    pub fn add_block(&mut self) -> Option<ZoomBlockId> {
        if !self.has_media() {
            log::warn!("Cannot add a zoom block before media is loaded");
            return None;
        }
        let duration = self.video_duration;
        let start = self
            .playback
            .current_time
            .min(duration - MIN_BLOCK_SPAN)
            .max(0.0);
        let end = (start + self.defaults.length.max(MIN_BLOCK_SPAN)).min(duration);

        let id = self.blocks.add(start, end, self.defaults.scale);
        self.playback.selected_block = Some(id);
        self.playback.preview_mode = true;
        self.touch();
        log::info!(
            "Added zoom block {} [{:.2}s, {:.2}s], total: {}",
            id,
            start,
            end,
            self.blocks.len()
        );
        Some(id)
    }

    /// Apply a clamped field edit to `id`. Unknown ids are ignored.
    pub fn edit_block(&mut self, id: ZoomBlockId, edit: FieldEdit) -> bool {
        let Some(block) = self.blocks.get(id) else {
            return false;
        };
        let Some(patch) = clamp_edit(block, edit, self.video_duration) else {
            return false;
        };
        self.update_block(id, &patch)
    }

    pub fn apply_preset(&mut self, id: ZoomBlockId, preset: PresetPosition) -> bool {
        self.update_block(id, &preset.patch())
    }

    fn update_block(&mut self, id: ZoomBlockId, patch: &ZoomBlockPatch) -> bool {
        let updated = self.blocks.update(id, patch);
        if updated {
            self.touch();
        }
        updated
    }

    pub fn delete_block(&mut self, id: ZoomBlockId) -> bool {
        if !self.blocks.remove(id) {
            return false;
        }
        if self.playback.selected_block == Some(id) {
            self.playback.selected_block = None;
            self.playback.preview_mode = false;
        }
        self.touch();
        log::info!("Deleted zoom block {}, total: {}", id, self.blocks.len());
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.playback.selected_block {
            Some(id) => self.delete_block(id),
            None => false,
        }
    }

    // ---- render queries ----

    pub fn selected_block(&self) -> Option<&ZoomBlock> {
        self.playback
            .selected_block
            .and_then(|id| self.blocks.get(id))
    }

    /// The block governing the frame at `time`.
    pub fn active_block_at(&self, time: f64) -> Option<&ZoomBlock> {
        resolver::resolve(
            time,
            self.playback.preview_mode,
            self.selected_block(),
            self.blocks.list(),
        )
    }

    pub fn active_block(&self) -> Option<&ZoomBlock> {
        self.active_block_at(self.playback.current_time)
    }

    pub fn transform_at(&self, time: f64) -> transform::ZoomTransform {
        transform::compute(self.active_block_at(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_media(duration: f64) -> EditorSession {
        let mut session = EditorSession::new(BlockDefaults::default());
        session.on_loaded_metadata(duration);
        session
    }

    #[test]
    fn test_add_block_at_current_time() {
        let mut session = session_with_media(100.0);
        session.on_time_update(10.0);

        let id = session.add_block().unwrap();
        let block = session.blocks().get(id).unwrap();
        assert_eq!(block.start_time, 10.0);
        assert_eq!(block.end_time, 12.0);
        assert_eq!((block.x, block.y, block.scale), (50.0, 50.0, 1.5));
        assert_eq!(session.playback().selected_block, Some(id));
        assert!(session.playback().preview_mode);
    }

    #[test]
    fn test_add_block_near_end_keeps_order() {
        let mut session = session_with_media(5.0);
        session.on_time_update(5.0);
        let id = session.add_block().unwrap();
        let block = session.blocks().get(id).unwrap();
        assert!(block.start_time < block.end_time);
        assert_eq!(block.end_time, 5.0);

        session.on_time_update(4.0);
        let id = session.add_block().unwrap();
        let block = session.blocks().get(id).unwrap();
        assert_eq!((block.start_time, block.end_time), (4.0, 5.0));
    }

    #[test]
    fn test_add_block_requires_media() {
        let mut session = EditorSession::new(BlockDefaults::default());
        assert!(session.add_block().is_none());
        assert!(session.blocks().is_empty());
    }

    #[test]
    fn test_edit_end_before_start_is_clamped() {
        let mut session = session_with_media(100.0);
        session.on_time_update(10.0);
        let id = session.add_block().unwrap();

        assert!(session.edit_block(id, FieldEdit::EndTime(5.0)));
        let end = session.blocks().get(id).unwrap().end_time;
        assert!((end - 10.1).abs() < 1e-9);
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut session = session_with_media(100.0);
        let revision = session.revision();
        assert!(!session.delete_selected());
        assert_eq!(session.revision(), revision);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut session = session_with_media(100.0);
        let id = session.add_block().unwrap();

        assert!(session.delete_block(id));
        assert!(session.playback().selected_block.is_none());
        assert!(!session.playback().preview_mode);
        assert!(session.blocks().list().iter().all(|b| b.id() != id));
    }

    #[test]
    fn test_delete_other_block_keeps_selection() {
        let mut session = session_with_media(100.0);
        let first = session.add_block().unwrap();
        let second = session.add_block().unwrap();

        assert!(session.delete_block(first));
        assert_eq!(session.playback().selected_block, Some(second));
        assert!(session.playback().preview_mode);
    }

    #[test]
    fn test_play_without_media_is_ignored() {
        let mut session = EditorSession::new(BlockDefaults::default());
        let revision = session.revision();

        assert!(session.play().is_empty());
        assert!(session.toggle_playback().is_empty());
        assert!(!session.playback().is_playing);
        assert_eq!(session.revision(), revision);

        session.on_loaded_metadata(3.0);
        assert_eq!(session.toggle_playback(), vec![MediaCommand::Play]);
        assert!(session.playback().is_playing);
    }

    #[test]
    fn test_pause_captures_time() {
        let mut session = session_with_media(100.0);
        assert_eq!(session.play(), vec![MediaCommand::Play]);
        assert!(session.play().is_empty());
        session.on_time_update(7.5);
        assert_eq!(session.pause(), vec![MediaCommand::Pause]);
        assert_eq!(session.playback().paused_time, 7.5);
        assert!(!session.playback().is_playing);
        assert!(session.pause().is_empty());
    }

    #[test]
    fn test_play_from_preview_unpins() {
        let mut session = session_with_media(100.0);
        session.add_block().unwrap();

        session.play();
        assert!(session.playback().is_playing);
        assert!(!session.playback().preview_mode);
        assert!(session.playback().selected_block.is_none());
    }

    #[test]
    fn test_seek_keeps_play_state() {
        let mut session = session_with_media(30.0);
        session.play();
        assert_eq!(session.seek(12.0), vec![MediaCommand::Seek(12.0)]);
        assert!(session.playback().is_playing);
        assert_eq!(session.seek(99.0), vec![MediaCommand::Seek(30.0)]);
        assert_eq!(session.seek(-1.0), vec![MediaCommand::Seek(0.0)]);
    }

    #[test]
    fn test_select_from_normal_mode_seeks_to_paused_time() {
        let mut session = session_with_media(100.0);
        session.on_time_update(20.0);
        let id = session.add_block().unwrap();
        session.select_block(None);
        session.on_time_update(3.0);
        session.play();
        session.on_time_update(8.0);
        session.pause();
        session.on_time_update(9.0);

        let commands = session.select_block(Some(id));
        assert_eq!(commands, vec![MediaCommand::Seek(8.0)]);
        assert_eq!(session.playback().current_time, 8.0);
        assert!(session.playback().preview_mode);
    }

    #[test]
    fn test_select_while_previewing_seeks_to_block_start() {
        let mut session = session_with_media(100.0);
        session.on_time_update(20.0);
        let first = session.add_block().unwrap();
        session.on_time_update(40.0);
        let _second = session.add_block().unwrap();

        let commands = session.select_block(Some(first));
        assert_eq!(commands, vec![MediaCommand::Seek(20.0)]);
        assert_eq!(session.playback().selected_block, Some(first));
    }

    #[test]
    fn test_select_while_playing_pauses() {
        let mut session = session_with_media(100.0);
        session.on_time_update(20.0);
        let id = session.add_block().unwrap();
        session.play();
        session.on_time_update(25.0);

        let commands = session.select_block(Some(id));
        assert_eq!(commands, vec![MediaCommand::Seek(0.0), MediaCommand::Pause]);
        assert!(!session.playback().is_playing);
        assert_eq!(session.playback().paused_time, 0.0);
    }

    #[test]
    fn test_reselect_toggles_preview_without_seek() {
        let mut session = session_with_media(100.0);
        let id = session.add_block().unwrap();
        assert!(session.playback().preview_mode);

        assert!(session.select_block(Some(id)).is_empty());
        assert!(!session.playback().preview_mode);
        assert_eq!(session.playback().selected_block, Some(id));

        assert!(session.select_block(Some(id)).is_empty());
        assert!(session.playback().preview_mode);
    }

    #[test]
    fn test_select_none_clears_without_seek() {
        let mut session = session_with_media(100.0);
        session.on_time_update(4.0);
        session.add_block().unwrap();

        assert!(session.select_block(None).is_empty());
        assert!(session.playback().selected_block.is_none());
        assert!(!session.playback().preview_mode);
        assert_eq!(session.playback().current_time, 4.0);
    }

    #[test]
    fn test_active_block_pinned_in_preview() {
        let mut session = session_with_media(100.0);
        session.on_time_update(10.0);
        let id = session.add_block().unwrap();
        session.on_time_update(80.0);

        assert_eq!(session.active_block().map(|b| b.id()), Some(id));
        session.select_block(Some(id));
        assert!(session.active_block().is_none());
    }

    #[test]
    fn test_revision_tracks_render_changes() {
        let mut session = session_with_media(100.0);
        let r0 = session.revision();
        let id = session.add_block().unwrap();
        let r1 = session.revision();
        assert!(r1 != r0);

        session.on_time_update(3.0);
        assert_eq!(session.revision(), r1);

        session.apply_preset(id, PresetPosition::TopLeft);
        assert!(session.revision() != r1);
    }

    #[test]
    fn test_ended_pauses() {
        let mut session = session_with_media(10.0);
        session.play();
        session.on_ended(10.0);
        assert!(!session.playback().is_playing);
        assert_eq!(session.playback().paused_time, 10.0);
    }
}
