//! Media stream abstraction: the boundary to the platform's decode layer.
//!
//! The widget never decodes media itself. It commands play/pause/seek/volume
//! and consumes decoded frames, current time, duration and the paused flag
//! through `MediaStream`. `StreamOpener` hands out independent stream
//! instances: the transport's primary deck and the preview sampler's
//! secondary deck are separate objects over the same locator, and mutating
//! one must never affect the other.
//!
//! The shipped implementation plays image sequences (a directory of
//! PNG/JPEG frames at a fixed rate), which is all the demo shell and tests
//! need; real codecs live behind the same trait in the host.

use crate::frame::Surface;
use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Decoded-media control surface. One instance per deck.
pub trait MediaStream: Send {
    /// Begin playback. May be refused by the platform (autoplay policy);
    /// refusal is an error to log, never to propagate as fatal.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// Live ground truth, re-read every tick for the play/pause glyph.
    fn paused(&self) -> bool;
    /// Best-effort seek; the platform may snap to a nearby decodable point.
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);
    fn current_time(&self) -> f64;
    /// Total duration in seconds, 0.0 while unknown.
    fn duration(&self) -> f64;
    /// Decoded frame at the current position, if one is ready.
    fn frame(&mut self) -> Option<Surface>;
}

/// Factory for independent stream instances over a locator.
pub trait StreamOpener: Send + Sync {
    fn open(&self, locator: &str) -> Result<Box<dyn MediaStream>>;
}

/// Frames-per-second assumed for image sequences.
const SEQUENCE_FPS: f64 = 12.0;

/// Opens `ImageSequenceStream`s from directory or single-image locators.
pub struct ImageSequenceOpener;

impl StreamOpener for ImageSequenceOpener {
    fn open(&self, locator: &str) -> Result<Box<dyn MediaStream>> {
        Ok(Box::new(ImageSequenceStream::open(Path::new(locator))?))
    }
}

/// Image-sequence playback: a sorted directory of frames at a fixed rate.
///
/// The clock is wall-time anchored while playing and frozen while paused;
/// playback loops at the end of the sequence.
pub struct ImageSequenceStream {
    frames: Vec<PathBuf>,
    /// Position in seconds at the last play/pause/seek anchor
    position: f64,
    /// Wall-clock anchor; Some while playing
    anchor: Option<Instant>,
    volume: f32,
    /// Last decoded frame, keyed by frame index
    cached: Option<(usize, Surface)>,
}

impl ImageSequenceStream {
    /// Open a sequence from a directory of images or a single image file.
    pub fn open(path: &Path) -> Result<Self> {
        let mut frames: Vec<PathBuf> = if path.is_dir() {
            std::fs::read_dir(path)
                .with_context(|| format!("read sequence dir {}", path.display()))?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| {
                    matches!(
                        p.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref(),
                        Some("png") | Some("jpg") | Some("jpeg")
                    )
                })
                .collect()
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            bail!("no such media source: {}", path.display());
        };

        if frames.is_empty() {
            bail!("no decodable frames in {}", path.display());
        }
        frames.sort();
        debug!("Opened sequence {} ({} frames)", path.display(), frames.len());

        Ok(Self {
            frames,
            position: 0.0,
            anchor: None,
            volume: 1.0,
            cached: None,
        })
    }

    fn frame_index(&self) -> usize {
        let idx = (self.current_time() * SEQUENCE_FPS) as usize;
        idx.min(self.frames.len() - 1)
    }
}

impl MediaStream for ImageSequenceStream {
    fn play(&mut self) -> Result<()> {
        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(anchor) = self.anchor.take() {
            self.position += anchor.elapsed().as_secs_f64();
        }
    }

    fn paused(&self) -> bool {
        self.anchor.is_none()
    }

    fn seek(&mut self, seconds: f64) {
        let clamped = seconds.clamp(0.0, self.duration());
        self.position = clamped;
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn current_time(&self) -> f64 {
        let elapsed = self.anchor.map(|a| a.elapsed().as_secs_f64()).unwrap_or(0.0);
        let t = self.position + elapsed;
        let duration = self.duration();
        if duration > 0.0 {
            // Sequences loop
            t % duration
        } else {
            0.0
        }
    }

    fn duration(&self) -> f64 {
        self.frames.len() as f64 / SEQUENCE_FPS
    }

    fn frame(&mut self) -> Option<Surface> {
        let idx = self.frame_index();
        if let Some((cached_idx, surface)) = &self.cached {
            if *cached_idx == idx {
                return Some(surface.clone());
            }
        }
        match image::open(&self.frames[idx]) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (w, h) = (rgba.width() as usize, rgba.height() as usize);
                let surface = Surface::from_rgba(rgba.into_raw(), w, h);
                self.cached = Some((idx, surface.clone()));
                Some(surface)
            }
            Err(e) => {
                warn!("Frame decode failed ({}): {}", self.frames[idx].display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, color: [u8; 4]) {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba(color));
        img.save(path).unwrap();
    }

    fn sequence_dir(frames: usize) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vidget-seq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..frames {
            write_png(&dir.join(format!("frame_{:03}.png", i)), [i as u8 * 10, 0, 0, 255]);
        }
        dir
    }

    #[test]
    fn test_open_empty_dir_fails() {
        let dir = std::env::temp_dir().join(format!("vidget-empty-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        assert!(ImageSequenceStream::open(&dir).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_duration_and_seek_clamp() {
        let dir = sequence_dir(24);
        let mut s = ImageSequenceStream::open(&dir).unwrap();
        assert!((s.duration() - 2.0).abs() < 1e-9);

        s.seek(100.0);
        assert!(s.current_time() <= s.duration());
        s.seek(-5.0);
        assert_eq!(s.current_time(), 0.0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_paused_is_ground_truth() {
        let dir = sequence_dir(4);
        let mut s = ImageSequenceStream::open(&dir).unwrap();
        assert!(s.paused());
        s.play().unwrap();
        assert!(!s.paused());
        s.pause();
        assert!(s.paused());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_frame_decodes_and_caches() {
        let dir = sequence_dir(2);
        let mut s = ImageSequenceStream::open(&dir).unwrap();
        let f = s.frame().expect("frame");
        assert_eq!(f.width(), 4);
        assert_eq!(&f.pixels()[0..4], &[0, 0, 0, 255]);
        // Second read of the same index comes from the cache
        assert!(s.frame().is_some());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_openers_hand_out_independent_decks() {
        let dir = sequence_dir(24);
        let opener = ImageSequenceOpener;
        let mut a = opener.open(dir.to_str().unwrap()).unwrap();
        let mut b = opener.open(dir.to_str().unwrap()).unwrap();
        a.seek(1.5);
        b.seek(0.5);
        assert!((a.current_time() - 1.5).abs() < 1e-9);
        assert!((b.current_time() - 0.5).abs() < 1e-9);
        std::fs::remove_dir_all(&dir).ok();
    }
}
