use std::path::Path;

use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Vector};
use crate::foundation::error::GrafelResult;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Resolved fill/stroke color and opacity for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Color to use.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Paint {
    /// Build a paint, clamping opacity into `[0, 1]`.
    pub fn new(color: Color, opacity: f64) -> Self {
        Self {
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Fully opaque paint.
    pub fn solid(color: Color) -> Self {
        Self::new(color, 1.0)
    }
}

/// Drawing primitives the stage issues for every frame.
///
/// All coordinates are absolute canvas coordinates; colors and opacity are already resolved
/// from actor state. A frame is bracketed by [`DrawBackend::clear`] and [`DrawBackend::end`].
pub trait DrawBackend {
    /// Start a new frame.
    fn clear(&mut self, frame: u64) -> GrafelResult<()>;

    /// Straight line segment.
    fn line(&mut self, from: Vector, to: Vector, paint: Paint) -> GrafelResult<()>;

    /// Filled rectangle with top-left corner at `origin`.
    fn rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()>;

    /// Rectangle outline ("box") with top-left corner at `origin`.
    fn outline_rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()>;

    /// Filled rectangle with rounded corners.
    fn round_rect(
        &mut self,
        origin: Vector,
        size: Vector,
        radius: f64,
        paint: Paint,
    ) -> GrafelResult<()>;

    /// Filled circle.
    fn circle(&mut self, center: Vector, radius: f64, paint: Paint) -> GrafelResult<()>;

    /// Filled polygon. The first vertex is `origin`; every offset is relative to the previous
    /// vertex.
    fn polygon(&mut self, origin: Vector, offsets: &[Vector], paint: Paint) -> GrafelResult<()>;

    /// Text centered on `anchor`.
    fn text(&mut self, anchor: Vector, text: &str, font_size: f64, paint: Paint)
    -> GrafelResult<()>;

    /// Image file centered on `center`, its pixel size multiplied by `scale`. A missing or
    /// unreadable file is an error.
    fn bitmap(&mut self, center: Vector, path: &Path, scale: Vector, opacity: f64)
    -> GrafelResult<()>;

    /// Finish the current frame.
    fn end(&mut self) -> GrafelResult<()>;

    /// Faint reference grid every `step` pixels.
    fn grid(&mut self, canvas: Canvas, step: u32, color: Color) -> GrafelResult<()> {
        let step = step.max(1) as usize;
        let paint = Paint::new(color, 0.25);
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        for x in (step..canvas.width as usize).step_by(step) {
            let x = x as f64;
            self.line(Vector::new(x, 0.0), Vector::new(x, h), paint)?;
        }
        for y in (step..canvas.height as usize).step_by(step) {
            let y = y as f64;
            self.line(Vector::new(0.0, y), Vector::new(w, y), paint)?;
        }
        Ok(())
    }
}
