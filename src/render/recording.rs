use std::path::{Path, PathBuf};

use crate::foundation::core::Vector;
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::render::backend::{DrawBackend, Paint};

/// One primitive issued to a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear { frame: u64 },
    Line { from: Vector, to: Vector, paint: Paint },
    Rect { origin: Vector, size: Vector, paint: Paint },
    OutlineRect { origin: Vector, size: Vector, paint: Paint },
    RoundRect {
        origin: Vector,
        size: Vector,
        radius: f64,
        paint: Paint,
    },
    Circle { center: Vector, radius: f64, paint: Paint },
    Polygon {
        origin: Vector,
        offsets: Vec<Vector>,
        paint: Paint,
    },
    Text {
        anchor: Vector,
        text: String,
        font_size: f64,
        paint: Paint,
    },
    Bitmap {
        center: Vector,
        path: PathBuf,
        scale: Vector,
        opacity: f64,
    },
    End,
}

/// Backend that records every call instead of drawing.
///
/// Used by tests and by `grafel dump --calls`; each call is also logged at `debug`.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<DrawCall>,
    open: bool,
}

impl RecordingBackend {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drop the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: DrawCall) -> GrafelResult<()> {
        if !self.open {
            return Err(GrafelError::render(format!(
                "draw call outside of a frame: {call:?}"
            )));
        }
        tracing::debug!(?call, "draw");
        self.calls.push(call);
        Ok(())
    }
}

impl DrawBackend for RecordingBackend {
    fn clear(&mut self, frame: u64) -> GrafelResult<()> {
        self.open = true;
        self.record(DrawCall::Clear { frame })
    }

    fn line(&mut self, from: Vector, to: Vector, paint: Paint) -> GrafelResult<()> {
        self.record(DrawCall::Line { from, to, paint })
    }

    fn rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()> {
        self.record(DrawCall::Rect {
            origin,
            size,
            paint,
        })
    }

    fn outline_rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()> {
        self.record(DrawCall::OutlineRect {
            origin,
            size,
            paint,
        })
    }

    fn round_rect(
        &mut self,
        origin: Vector,
        size: Vector,
        radius: f64,
        paint: Paint,
    ) -> GrafelResult<()> {
        self.record(DrawCall::RoundRect {
            origin,
            size,
            radius,
            paint,
        })
    }

    fn circle(&mut self, center: Vector, radius: f64, paint: Paint) -> GrafelResult<()> {
        self.record(DrawCall::Circle {
            center,
            radius,
            paint,
        })
    }

    fn polygon(&mut self, origin: Vector, offsets: &[Vector], paint: Paint) -> GrafelResult<()> {
        self.record(DrawCall::Polygon {
            origin,
            offsets: offsets.to_vec(),
            paint,
        })
    }

    fn text(
        &mut self,
        anchor: Vector,
        text: &str,
        font_size: f64,
        paint: Paint,
    ) -> GrafelResult<()> {
        self.record(DrawCall::Text {
            anchor,
            text: text.to_owned(),
            font_size,
            paint,
        })
    }

    fn bitmap(
        &mut self,
        center: Vector,
        path: &Path,
        scale: Vector,
        opacity: f64,
    ) -> GrafelResult<()> {
        self.record(DrawCall::Bitmap {
            center,
            path: path.to_path_buf(),
            scale,
            opacity,
        })
    }

    fn end(&mut self) -> GrafelResult<()> {
        self.record(DrawCall::End)?;
        self.open = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
