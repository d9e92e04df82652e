use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Fps, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::render::backend::{DrawBackend, FrameRGBA, Paint};
use crate::render::svg::SvgBackend;

/// Turns SVG documents into premultiplied RGBA8 frames with `resvg`.
///
/// The font database is loaded once from the system fonts and shared by every document.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "font database loaded");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterize a document at its intrinsic size. Relative image references resolve against
    /// `resources_dir`.
    pub fn rasterize(&self, svg: &str, resources_dir: Option<&Path>) -> GrafelResult<FrameRGBA> {
        let opts = usvg::Options {
            resources_dir: resources_dir.map(Path::to_path_buf),
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse svg frame")?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| GrafelError::render("failed to allocate frame pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data().to_vec(),
            premultiplied: true,
        })
    }
}

/// Draws through an in-memory [`SvgBackend`], rasterizes each finished frame and hands the
/// pixels to a [`FrameSink`].
pub struct RasterBackend<'a> {
    svg: SvgBackend,
    rasterizer: Rasterizer,
    sink: &'a mut dyn FrameSink,
    cfg: SinkConfig,
    started: bool,
}

impl<'a> RasterBackend<'a> {
    pub fn new(
        canvas: Canvas,
        fps: Fps,
        background: Color,
        rasterizer: Rasterizer,
        sink: &'a mut dyn FrameSink,
    ) -> Self {
        Self {
            svg: SvgBackend::new(canvas, background),
            rasterizer,
            sink,
            cfg: SinkConfig {
                width: canvas.width,
                height: canvas.height,
                fps,
            },
            started: false,
        }
    }

    /// Close the sink. Must be called once after the last frame.
    pub fn finish(self) -> GrafelResult<()> {
        if self.started {
            self.sink.end()?;
        }
        Ok(())
    }
}

impl DrawBackend for RasterBackend<'_> {
    fn clear(&mut self, frame: u64) -> GrafelResult<()> {
        if !self.started {
            self.sink.begin(self.cfg)?;
            self.started = true;
        }
        self.svg.clear(frame)
    }

    fn line(&mut self, from: Vector, to: Vector, paint: Paint) -> GrafelResult<()> {
        self.svg.line(from, to, paint)
    }

    fn rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()> {
        self.svg.rect(origin, size, paint)
    }

    fn outline_rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()> {
        self.svg.outline_rect(origin, size, paint)
    }

    fn round_rect(
        &mut self,
        origin: Vector,
        size: Vector,
        radius: f64,
        paint: Paint,
    ) -> GrafelResult<()> {
        self.svg.round_rect(origin, size, radius, paint)
    }

    fn circle(&mut self, center: Vector, radius: f64, paint: Paint) -> GrafelResult<()> {
        self.svg.circle(center, radius, paint)
    }

    fn polygon(&mut self, origin: Vector, offsets: &[Vector], paint: Paint) -> GrafelResult<()> {
        self.svg.polygon(origin, offsets, paint)
    }

    fn text(
        &mut self,
        anchor: Vector,
        text: &str,
        font_size: f64,
        paint: Paint,
    ) -> GrafelResult<()> {
        self.svg.text(anchor, text, font_size, paint)
    }

    fn bitmap(
        &mut self,
        center: Vector,
        path: &Path,
        scale: Vector,
        opacity: f64,
    ) -> GrafelResult<()> {
        self.svg.bitmap(center, path, scale, opacity)
    }

    fn end(&mut self) -> GrafelResult<()> {
        self.svg.end()?;
        for frame in self.svg.take_frames() {
            let rgba = self.rasterizer.rasterize(&frame.svg, None)?;
            self.sink.push_frame(frame.frame, &rgba)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
