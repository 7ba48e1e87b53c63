// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Redraw scheduling for the preview.
//!
//! While playing, the loop keeps one display-refresh callback scheduled and
//! draws at most once per frame interval. While paused nothing is scheduled;
//! draws happen only when forced by a discrete event or when the session
//! revision changed since the last draw. The pending callback handle is
//! owned by the loop and must be cancelled through [`RenderLoop::stop`].

use super::RenderError;
use std::time::{Duration, Instant};

/// Default minimum time between continuous draws (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Handle to a scheduled display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub u64);

/// Host facility that calls back once per display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// What happened on a render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// Continuous tick arrived within the frame interval
    Throttled,
    /// Draw was attempted and failed; the loop keeps going
    Failed,
    /// Nothing to do
    Idle,
}

pub struct RenderLoop {
    min_interval: Duration,
    pending: Option<FrameHandle>,
    last_draw: Option<Instant>,
    force: bool,
    drawn_revision: Option<u64>,
}

impl RenderLoop {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            pending: None,
            last_draw: None,
            force: false,
            drawn_revision: None,
        }
    }

    /// Begin continuous rendering. No-op if already running.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending.is_none() {
            self.pending = Some(scheduler.request_frame());
            log::debug!("Render loop started");
        }
    }

    /// Cancel the pending callback, if any.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
            log::debug!("Render loop stopped");
        }
    }

    /// Make the next tick draw regardless of throttling.
    pub fn request_redraw(&mut self) {
        self.force = true;
    }

    /// Whether the next tick will draw even if throttled or paused.
    pub fn needs_redraw(&self, revision: u64) -> bool {
        self.force || self.drawn_revision != Some(revision)
    }

    fn within_interval(&self, now: Instant) -> bool {
        self.last_draw
            .is_some_and(|last| now.saturating_duration_since(last) < self.min_interval)
    }

    /// Failed draws are logged and skipped, not retried.
    fn draw<F>(&mut self, now: Instant, revision: u64, draw: F) -> FrameOutcome
    where
        F: FnOnce() -> Result<(), RenderError>,
    {
        self.last_draw = Some(now);
        self.force = false;
        self.drawn_revision = Some(revision);
        match draw() {
            Ok(()) => FrameOutcome::Drawn,
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                FrameOutcome::Failed
            }
        }
    }

    /// Run the scheduled callback identified by `handle` and reschedule.
    ///
    /// A handle that is not the pending one (already cancelled) is ignored.
    pub fn on_frame<F>(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        handle: FrameHandle,
        now: Instant,
        revision: u64,
        draw: F,
    ) -> FrameOutcome
    where
        F: FnOnce() -> Result<(), RenderError>,
    {
        if self.pending != Some(handle) {
            log::trace!("Ignoring stale frame callback {:?}", handle);
            return FrameOutcome::Idle;
        }

        let throttled = !self.needs_redraw(revision) && self.within_interval(now);
        let outcome = if throttled {
            FrameOutcome::Throttled
        } else {
            self.draw(now, revision, draw)
        };

        self.pending = Some(scheduler.request_frame());
        outcome
    }

    /// Handle a discrete trigger while no callback is scheduled.
    pub fn on_event<F>(&mut self, now: Instant, revision: u64, draw: F) -> FrameOutcome
    where
        F: FnOnce() -> Result<(), RenderError>,
    {
        if !self.needs_redraw(revision) {
            return FrameOutcome::Idle;
        }
        self.draw(now, revision, draw)
    }

    /// Fire the pending callback if running, otherwise service forced draws.
    pub fn pump<F>(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        now: Instant,
        revision: u64,
        draw: F,
    ) -> FrameOutcome
    where
        F: FnOnce() -> Result<(), RenderError>,
    {
        match self.pending {
            Some(handle) => self.on_frame(scheduler, handle, now, revision, draw),
            None => self.on_event(now, revision, draw),
        }
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}
