// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media sources (images and videos).
//!
//! This module plays the role of the video element: a [`MediaSource`]
//! exposes the current time, duration, play/pause state and the current
//! decoded frame, and reports what happened since the last poll as
//! [`MediaEvent`]s. [`Player`] drives any [`FrameDecoder`] with a
//! wall-clock playback clock.

use image::RgbaImage;
use std::path::Path;
use std::time::Instant;

/// Errors raised while opening or decoding media.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to open {path}: {message}")]
    Open { path: String, message: String },

    #[error("unsupported media file: {0}")]
    Unsupported(String),

    #[error("failed to decode frame at {time:.3}s: {message}")]
    #[cfg_attr(not(feature = "video-opencv"), allow(dead_code))]
    Decode { time: f64, message: String },

    #[error("no frame available yet")]
    NotReady,
}

/// Notifications emitted by a media source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Duration and dimensions are known
    LoadedMetadata { duration: f64, width: u32, height: u32 },
    /// The first frame can be decoded
    LoadedData,
    /// Playback advanced the current time
    TimeUpdate(f64),
    /// A seek completed
    Seeked(f64),
    /// Playback stopped at the end of the media
    Ended(f64),
}

/// Static properties of a media file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// The playback element: a clock plus a current frame.
pub trait MediaSource {
    fn current_time(&self) -> f64;
    fn seek(&mut self, time: f64);
    /// Native pixel size of the frames.
    fn dimensions(&self) -> Option<(u32, u32)>;
    fn is_paused(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Decode (or reuse) the frame at the current time.
    fn current_frame(&mut self) -> Result<&RgbaImage, MediaError>;
    /// Advance the clock to `now` and drain pending events.
    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent>;
}

/// Random-access frame decoding.
pub trait FrameDecoder {
    fn info(&self) -> MediaInfo;
    fn decode_at(&mut self, time: f64) -> Result<RgbaImage, MediaError>;
}

enum Clock {
    Paused,
    /// Anchor is set lazily on the first poll after play or seek
    Playing { anchor: Option<(Instant, f64)> },
}

/// Wall-clock playback over a frame decoder.
pub struct Player<D> {
    decoder: D,
    info: MediaInfo,
    position: f64,
    clock: Clock,
    pending: Vec<MediaEvent>,
    cached: Option<(u64, RgbaImage)>,
}

impl<D: FrameDecoder> Player<D> {
    pub fn new(decoder: D) -> Self {
        let info = decoder.info();
        Self {
            decoder,
            info,
            position: 0.0,
            clock: Clock::Paused,
            pending: vec![
                MediaEvent::LoadedMetadata {
                    duration: info.duration,
                    width: info.width,
                    height: info.height,
                },
                MediaEvent::LoadedData,
            ],
            cached: None,
        }
    }

    fn frame_index(&self, time: f64) -> u64 {
        let fps = self.info.frame_rate.max(1.0);
        let last = ((self.info.duration * fps).ceil() as u64).saturating_sub(1);
        ((time * fps).floor().max(0.0) as u64).min(last)
    }
}

impl<D: FrameDecoder> MediaSource for Player<D> {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, time: f64) {
        let time = if time.is_finite() { time.clamp(0.0, self.info.duration) } else { 0.0 };
        self.position = time;
        if let Clock::Playing { anchor } = &mut self.clock {
            *anchor = None;
        }
        self.pending.push(MediaEvent::Seeked(time));
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.info.width, self.info.height))
    }

    fn is_paused(&self) -> bool {
        matches!(self.clock, Clock::Paused)
    }

    fn play(&mut self) {
        if !self.is_paused() {
            return;
        }
        if self.position >= self.info.duration {
            self.position = 0.0;
            self.pending.push(MediaEvent::Seeked(0.0));
        }
        self.clock = Clock::Playing { anchor: None };
    }

    fn pause(&mut self) {
        self.clock = Clock::Paused;
    }

    fn current_frame(&mut self) -> Result<&RgbaImage, MediaError> {
        let index = self.frame_index(self.position);
        let stale = self.cached.as_ref().map_or(true, |(cached, _)| *cached != index);
        if stale {
            let time = index as f64 / self.info.frame_rate.max(1.0);
            let frame = self.decoder.decode_at(time)?;
            log::trace!("Decoded frame {} at {:.3}s", index, time);
            self.cached = Some((index, frame));
        }
        match &self.cached {
            Some((_, frame)) => Ok(frame),
            None => Err(MediaError::NotReady),
        }
    }

    fn poll_events(&mut self, now: Instant) -> Vec<MediaEvent> {
        if let Clock::Playing { anchor } = self.clock {
            match anchor {
                None => {
                    self.clock = Clock::Playing {
                        anchor: Some((now, self.position)),
                    }
                }
                Some((started, from)) => {
                    let elapsed = now.saturating_duration_since(started).as_secs_f64();
                    let position = (from + elapsed).min(self.info.duration);
                    if position != self.position {
                        self.position = position;
                        self.pending.push(MediaEvent::TimeUpdate(position));
                    }
                    if position >= self.info.duration {
                        self.clock = Clock::Paused;
                        self.pending.push(MediaEvent::Ended(position));
                    }
                }
            }
        }
        std::mem::take(&mut self.pending)
    }
}

/// Image extensions handled by [`StillImageDecoder`].
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// Video extensions offered in the open dialog.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm"];

/// A still image presented as a clip of fixed length.
pub struct StillImageDecoder {
    image: RgbaImage,
    duration: f64,
}

impl StillImageDecoder {
    pub fn new(image: RgbaImage, duration: f64) -> Self {
        Self { image, duration }
    }

    pub fn open(path: &Path, duration: f64) -> Result<Self, MediaError> {
        let image = image::open(path)
            .map_err(|e| MediaError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
            .to_rgba8();
        Ok(Self::new(image, duration))
    }
}

impl FrameDecoder for StillImageDecoder {
    fn info(&self) -> MediaInfo {
        MediaInfo {
            duration: self.duration,
            width: self.image.width(),
            height: self.image.height(),
            frame_rate: 1.0,
        }
    }

    fn decode_at(&mut self, _time: f64) -> Result<RgbaImage, MediaError> {
        Ok(self.image.clone())
    }
}

#[cfg(feature = "video-opencv")]
pub use opencv_backend::OpenCvDecoder;

#[cfg(feature = "video-opencv")]
mod opencv_backend {
    use super::{FrameDecoder, MediaError, MediaInfo};
    use image::RgbaImage;
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use std::path::Path;

    /// Video file decoding through OpenCV's VideoCapture.
    pub struct OpenCvDecoder {
        capture: videoio::VideoCapture,
        info: MediaInfo,
        next_index: Option<u64>,
    }

    impl OpenCvDecoder {
        pub fn open(path: &Path) -> Result<Self, MediaError> {
            let open_err = |e: opencv::Error| MediaError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            let capture = videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
                .map_err(open_err)?;
            if !capture.is_opened().map_err(open_err)? {
                return Err(MediaError::Open {
                    path: path.display().to_string(),
                    message: "capture did not open".to_string(),
                });
            }

            let fps = capture.get(videoio::CAP_PROP_FPS).map_err(open_err)?;
            let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT).map_err(open_err)?;
            let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH).map_err(open_err)? as u32;
            let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT).map_err(open_err)? as u32;
            let frame_rate = if fps > 0.0 { fps } else { 30.0 };

            Ok(Self {
                capture,
                info: MediaInfo {
                    duration: frame_count.max(0.0) / frame_rate,
                    width,
                    height,
                    frame_rate,
                },
                next_index: None,
            })
        }
    }

    impl FrameDecoder for OpenCvDecoder {
        fn info(&self) -> MediaInfo {
            self.info
        }

        fn decode_at(&mut self, time: f64) -> Result<RgbaImage, MediaError> {
            let decode_err = |e: opencv::Error| MediaError::Decode {
                time,
                message: e.to_string(),
            };
            let index = (time * self.info.frame_rate).round().max(0.0) as u64;
            if self.next_index != Some(index) {
                self.capture
                    .set(videoio::CAP_PROP_POS_FRAMES, index as f64)
                    .map_err(decode_err)?;
            }

            let mut bgr = Mat::default();
            if !self.capture.read(&mut bgr).map_err(decode_err)? || bgr.empty() {
                self.next_index = None;
                return Err(MediaError::NotReady);
            }
            let mut rgba = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0).map_err(decode_err)?;

            let (width, height) = (rgba.cols() as u32, rgba.rows() as u32);
            let pixels = rgba.data_bytes().map_err(decode_err)?.to_vec();
            self.next_index = Some(index + 1);
            RgbaImage::from_raw(width, height, pixels).ok_or(MediaError::Decode {
                time,
                message: "frame buffer size mismatch".to_string(),
            })
        }
    }
}

/// Open `path` as a playable source.
///
/// Still images become clips of `still_duration` seconds; video files need
/// the `video-opencv` feature.
pub fn open_media(path: &Path, still_duration: f64) -> Result<Box<dyn MediaSource + Send>, MediaError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        let decoder = StillImageDecoder::open(path, still_duration)?;
        return Ok(Box::new(Player::new(decoder)));
    }

    #[cfg(feature = "video-opencv")]
    {
        let decoder = OpenCvDecoder::open(path)?;
        return Ok(Box::new(Player::new(decoder)));
    }

    #[cfg(not(feature = "video-opencv"))]
    {
        Err(MediaError::Unsupported(format!(
            "{} (video decoding requires the video-opencv feature)",
            path.display()
        )))
    }
}
