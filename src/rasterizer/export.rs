//! Writing frames to image files

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tracing::{debug, info};

use super::error::PipelineError;
use super::render::{FrameSink, Framebuffer};
use super::types::Color;

/// Convert a framebuffer to an image, top row first
pub fn to_rgb_image(framebuffer: &Framebuffer) -> RgbImage {
    let (w, h) = (framebuffer.width as u32, framebuffer.height as u32);
    RgbImage::from_fn(w, h, |x, y| {
        // Image rows run downward, framebuffer rows upward
        let fy = (h - 1 - y) as i32;
        let c = framebuffer.color_at(x as i32, fy).unwrap_or_default();
        let [r, g, b, _] = Color::from_rgb(c).to_bytes();
        Rgb([r, g, b])
    })
}

/// Save a framebuffer; the format follows the file extension
pub fn save_framebuffer(framebuffer: &Framebuffer, path: &Path) -> Result<(), PipelineError> {
    to_rgb_image(framebuffer).save(path)?;
    info!(path = %path.display(), "frame saved");
    Ok(())
}

/// Frame sink that writes every presented frame to one file
#[derive(Debug, Clone)]
pub struct ImageSink {
    path: PathBuf,
    frames: u64,
    last_frame: Option<u64>,
}

impl ImageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frames: 0,
            last_frame: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames written so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Pipeline frame number of the image currently on disk
    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }
}

impl FrameSink for ImageSink {
    fn present(&mut self, framebuffer: &Framebuffer, frame: u64) -> Result<(), PipelineError> {
        save_framebuffer(framebuffer, &self.path)?;
        self.frames += 1;
        self.last_frame = Some(frame);
        debug!(frame, presented = self.frames, "frame presented");
        Ok(())
    }
}
