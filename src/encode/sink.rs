use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::foundation::math::unpremultiply_rgba8;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing frame order between `begin`
/// and `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> GrafelResult<()>;
    fn push_frame(&mut self, frame: u64, rgba: &FrameRGBA) -> GrafelResult<()>;
    fn end(&mut self) -> GrafelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in timeline order.
    pub frames: Vec<(u64, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GrafelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: u64, rgba: &FrameRGBA) -> GrafelResult<()> {
        check_order(self.frames.last().map(|(f, _)| *f), frame)?;
        self.frames.push((frame, rgba.clone()));
        Ok(())
    }

    fn end(&mut self) -> GrafelResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes every frame as `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    last: Option<u64>,
    written: Vec<PathBuf>,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last: None,
            written: Vec::new(),
        }
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> GrafelResult<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        tracing::info!(
            dir = %self.dir.display(),
            width = cfg.width,
            height = cfg.height,
            "writing png frames"
        );
        self.last = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: u64, rgba: &FrameRGBA) -> GrafelResult<()> {
        check_order(self.last, frame)?;
        let path = self.dir.join(frame_file_name(frame, "png"));
        write_png(&path, rgba)?;
        self.last = Some(frame);
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> GrafelResult<()> {
        tracing::info!(frames = self.written.len(), "png frames written");
        Ok(())
    }
}

/// `frame_00042.<ext>`.
pub fn frame_file_name(frame: u64, ext: &str) -> String {
    format!("frame_{frame:05}.{ext}")
}

/// Encode a frame as PNG (straight alpha).
pub fn write_png(path: &Path, rgba: &FrameRGBA) -> GrafelResult<()> {
    let mut data = rgba.data.clone();
    if rgba.premultiplied {
        unpremultiply_rgba8(&mut data);
    }
    let img = image::RgbaImage::from_raw(rgba.width, rgba.height, data).ok_or_else(|| {
        GrafelError::render(format!(
            "frame buffer does not match {}x{}",
            rgba.width, rgba.height
        ))
    })?;
    img.save(path)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

fn check_order(last: Option<u64>, frame: u64) -> GrafelResult<()> {
    match last {
        Some(prev) if frame <= prev => Err(GrafelError::render(format!(
            "frames must be pushed in increasing order (got {frame} after {prev})"
        ))),
        _ => Ok(()),
    }
}
