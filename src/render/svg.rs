use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::frame_file_name;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::render::backend::{DrawBackend, Paint};

/// One finished SVG frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgFrame {
    pub frame: u64,
    pub svg: String,
}

/// Backend that turns every frame into a standalone SVG document.
///
/// With an output directory each frame is written as `frame_00000.svg`, ...; bitmaps are copied
/// next to the frames and referenced by file name (prefixed with a counter when two sources share
/// a name). Without one, finished frames are kept in
/// memory (see [`SvgBackend::take_frames`]) and bitmaps are referenced by absolute path.
#[derive(Debug)]
pub struct SvgBackend {
    canvas: Canvas,
    background: Color,
    out_dir: Option<PathBuf>,
    current: Option<(u64, String)>,
    frames: Vec<SvgFrame>,
    written: Vec<PathBuf>,
    /// Canonical source path -> name of its copy in `out_dir`.
    bitmaps: HashMap<PathBuf, String>,
}

impl SvgBackend {
    /// In-memory backend.
    pub fn new(canvas: Canvas, background: Color) -> Self {
        Self {
            canvas,
            background,
            out_dir: None,
            current: None,
            frames: Vec::new(),
            written: Vec::new(),
            bitmaps: HashMap::new(),
        }
    }

    /// Backend writing one file per frame into `dir` (created on first use).
    pub fn in_dir(canvas: Canvas, background: Color, dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: Some(dir.into()),
            ..Self::new(canvas, background)
        }
    }

    /// Finished in-memory frames, oldest first.
    pub fn take_frames(&mut self) -> Vec<SvgFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Number of finished in-memory frames not yet taken.
    pub fn pending(&self) -> usize {
        self.frames.len()
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn body(&mut self) -> GrafelResult<&mut String> {
        self.current
            .as_mut()
            .map(|(_, body)| body)
            .ok_or_else(|| GrafelError::render("svg draw call outside of a frame"))
    }

    fn element(&mut self, element: String) -> GrafelResult<()> {
        let body = self.body()?;
        body.push_str("  ");
        body.push_str(&element);
        body.push('\n');
        Ok(())
    }

    fn bitmap_href(&mut self, path: &Path) -> GrafelResult<String> {
        let source = std::fs::canonicalize(path)
            .with_context(|| format!("bitmap '{}' not found", path.display()))?;
        let Some(dir) = &self.out_dir else {
            return Ok(source.to_string_lossy().into_owned());
        };
        if let Some(name) = self.bitmaps.get(&source) {
            return Ok(name.clone());
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                GrafelError::render(format!("bitmap '{}' has no file name", path.display()))
            })?;
        let mut name = file_name.clone();
        let mut n = 1;
        while self.bitmaps.values().any(|taken| *taken == name) {
            name = format!("{n}_{file_name}");
            n += 1;
        }

        let target = dir.join(&name);
        std::fs::create_dir_all(dir).with_context(|| {
            format!("failed to create output directory '{}'", dir.display())
        })?;
        std::fs::copy(path, &target).with_context(|| {
            format!(
                "failed to copy bitmap '{}' to '{}'",
                path.display(),
                target.display()
            )
        })?;
        self.bitmaps.insert(source, name.clone());
        Ok(name)
    }
}

fn num(v: f64) -> String {
    let v = (v * 1000.0).round() / 1000.0 + 0.0;
    format!("{v}")
}

fn fill(paint: Paint) -> String {
    if paint.opacity < 1.0 {
        format!(r#"fill="{}" fill-opacity="{}""#, paint.color, num(paint.opacity))
    } else {
        format!(r#"fill="{}""#, paint.color)
    }
}

fn stroke(paint: Paint, width: f64) -> String {
    let mut s = format!(r#"stroke="{}" stroke-width="{}""#, paint.color, num(width));
    if paint.opacity < 1.0 {
        let _ = write!(s, r#" stroke-opacity="{}""#, num(paint.opacity));
    }
    s
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// SVG path data for a polygon given as origin plus chained offsets.
pub(crate) fn polygon_path(origin: Vector, offsets: &[Vector]) -> kurbo::BezPath {
    let mut path = kurbo::BezPath::new();
    let mut p = origin.to_point();
    path.move_to(p);
    for d in offsets {
        p += d.to_kurbo();
        path.line_to(p);
    }
    path.close_path();
    path
}

impl DrawBackend for SvgBackend {
    fn clear(&mut self, frame: u64) -> GrafelResult<()> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut body = String::new();
        let _ = writeln!(
            body,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = writeln!(
            body,
            r#"  <rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
            self.background
        );
        self.current = Some((frame, body));
        Ok(())
    }

    fn line(&mut self, from: Vector, to: Vector, paint: Paint) -> GrafelResult<()> {
        self.element(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke(paint, 1.0)
        ))
    }

    fn rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()> {
        self.element(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
            num(origin.x),
            num(origin.y),
            num(size.x),
            num(size.y),
            fill(paint)
        ))
    }

    fn outline_rect(&mut self, origin: Vector, size: Vector, paint: Paint) -> GrafelResult<()> {
        self.element(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" {}/>"#,
            num(origin.x),
            num(origin.y),
            num(size.x),
            num(size.y),
            stroke(paint, 2.0)
        ))
    }

    fn round_rect(
        &mut self,
        origin: Vector,
        size: Vector,
        radius: f64,
        paint: Paint,
    ) -> GrafelResult<()> {
        self.element(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" {}/>"#,
            num(origin.x),
            num(origin.y),
            num(size.x),
            num(size.y),
            fill(paint),
            r = num(radius),
        ))
    }

    fn circle(&mut self, center: Vector, radius: f64, paint: Paint) -> GrafelResult<()> {
        self.element(format!(
            r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            fill(paint)
        ))
    }

    fn polygon(&mut self, origin: Vector, offsets: &[Vector], paint: Paint) -> GrafelResult<()> {
        let path = polygon_path(origin, offsets);
        self.element(format!(r#"<path d="{}" {}/>"#, path.to_svg(), fill(paint)))
    }

    fn text(
        &mut self,
        anchor: Vector,
        text: &str,
        font_size: f64,
        paint: Paint,
    ) -> GrafelResult<()> {
        self.element(format!(
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" text-anchor="middle" dominant-baseline="central" {}>{}</text>"#,
            num(anchor.x),
            num(anchor.y),
            num(font_size),
            fill(paint),
            escape(text)
        ))
    }

    fn bitmap(
        &mut self,
        center: Vector,
        path: &Path,
        scale: Vector,
        opacity: f64,
    ) -> GrafelResult<()> {
        let (w, h) = image::image_dimensions(path).map_err(|e| {
            GrafelError::render(format!("cannot read bitmap '{}': {e}", path.display()))
        })?;
        let href = self.bitmap_href(path)?;
        let (w, h) = (f64::from(w) * scale.x, f64::from(h) * scale.y);
        let mut element = format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" xlink:href="{}""#,
            num(center.x - w / 2.0),
            num(center.y - h / 2.0),
            num(w),
            num(h),
            escape(&href)
        );
        if opacity < 1.0 {
            let _ = write!(element, r#" opacity="{}""#, num(opacity.max(0.0)));
        }
        element.push_str("/>");
        self.element(element)
    }

    fn end(&mut self) -> GrafelResult<()> {
        let (frame, mut svg) = self
            .current
            .take()
            .ok_or_else(|| GrafelError::render("svg frame ended without clear"))?;
        svg.push_str("</svg>\n");

        match &self.out_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("failed to create output directory '{}'", dir.display())
                })?;
                let path = dir.join(frame_file_name(frame, "svg"));
                std::fs::write(&path, svg)
                    .with_context(|| format!("failed to write '{}'", path.display()))?;
                tracing::debug!(path = %path.display(), "svg frame written");
                self.written.push(path);
            }
            None => self.frames.push(SvgFrame { frame, svg }),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
