use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::encode::ffmpeg::FfmpegSink;
use crate::encode::sink::{PngDirSink, frame_file_name, write_png};
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::foundation::core::Vector;
use crate::render::backend::{DrawBackend, Paint};
use crate::render::raster::{RasterBackend, Rasterizer};
use crate::render::svg::{SvgBackend, SvgFrame};
use crate::stage::Stage;

/// File format of a single exported frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameFormat {
    Svg,
    Png,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> GrafelResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(GrafelError::validation(format!(
                "cannot infer frame format from '{}' (expected .svg or .png)",
                path.display()
            ))),
        }
    }
}

/// How many frames to play and how to rasterize them.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Frames per pass.
    pub num_frames: u64,
    /// Passes over the timeline; the stage is reset between passes.
    pub loops: u32,
    /// Rasterize PNG frames on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            num_frames: 150,
            loops: 1,
            parallel: true,
            threads: None,
        }
    }
}

impl ExportOpts {
    pub fn for_stage(stage: &Stage) -> Self {
        Self {
            num_frames: stage.settings().num_frames,
            ..Self::default()
        }
    }

    fn validate(&self) -> GrafelResult<()> {
        if self.num_frames == 0 {
            return Err(GrafelError::validation("export needs at least one frame"));
        }
        if self.loops == 0 {
            return Err(GrafelError::validation("export loops must be >= 1"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Frames drawn across all loops.
    pub frames: u64,
    /// Files produced, in frame order; the video file for MP4.
    pub written: Vec<PathBuf>,
}

/// Drive `stage` through `opts.loops` passes of `opts.num_frames` frames, drawing each one.
///
/// Output frames are numbered consecutively across loops. Returns the number of frames drawn.
#[tracing::instrument(level = "debug", skip(stage, backend))]
pub fn play(
    stage: &mut Stage,
    backend: &mut dyn DrawBackend,
    opts: &ExportOpts,
) -> GrafelResult<u64> {
    opts.validate()?;
    let mut out = 0u64;
    for lap in 0..opts.loops {
        if lap > 0 {
            stage.reset()?;
        }
        for _ in 0..opts.num_frames {
            stage.advance()?;
            stage.draw(backend, out)?;
            out += 1;
        }
    }
    Ok(out)
}

/// Write one SVG document per frame into `dir`.
pub fn export_svg(
    stage: &mut Stage,
    dir: &Path,
    opts: &ExportOpts,
) -> GrafelResult<ExportStats> {
    let settings = stage.settings();
    let mut backend = SvgBackend::in_dir(settings.canvas, settings.background, dir);
    let frames = play(stage, &mut backend, opts)?;
    tracing::info!(frames, dir = %dir.display(), "svg export finished");
    Ok(ExportStats {
        frames,
        written: backend.written().to_vec(),
    })
}

/// Write one PNG per frame into `dir`.
///
/// Frames are produced as SVG documents in timeline order. With `opts.parallel` set, finished
/// documents are rasterized on a rayon pool in batches of twice the pool size, so at most one
/// batch is held in memory.
pub fn export_png(
    stage: &mut Stage,
    dir: &Path,
    opts: &ExportOpts,
) -> GrafelResult<ExportStats> {
    let rasterizer = Rasterizer::new();
    if !opts.parallel {
        let settings = stage.settings().clone();
        let mut sink = PngDirSink::new(dir);
        let mut backend = RasterBackend::new(
            settings.canvas,
            settings.fps,
            settings.background,
            rasterizer,
            &mut sink,
        );
        let frames = play(stage, &mut backend, opts)?;
        backend.finish()?;
        return Ok(ExportStats {
            frames,
            written: sink.written().to_vec(),
        });
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    let pool = build_thread_pool(opts.threads)?;
    let settings = stage.settings();
    let mut backend = PngBatchBackend {
        svg: SvgBackend::new(settings.canvas, settings.background),
        batch: pool.current_num_threads().max(1) * 2,
        pool: &pool,
        rasterizer: &rasterizer,
        dir,
        written: Vec::new(),
    };
    let frames = play(stage, &mut backend, opts)?;
    backend.flush()?;
    let written = backend.written;

    tracing::info!(frames, dir = %dir.display(), "png export finished");
    Ok(ExportStats { frames, written })
}

/// Stream every frame into an MP4 through the system `ffmpeg`.
pub fn export_mp4(
    stage: &mut Stage,
    out: &Path,
    opts: &ExportOpts,
) -> GrafelResult<ExportStats> {
    let settings = stage.settings().clone();
    let mut sink = FfmpegSink::new(out, settings.background);
    let mut backend = RasterBackend::new(
        settings.canvas,
        settings.fps,
        settings.background,
        Rasterizer::new(),
        &mut sink,
    );
    let frames = play(stage, &mut backend, opts)?;
    backend.finish()?;
    tracing::info!(frames, out = %out.display(), "mp4 export finished");
    Ok(ExportStats {
        frames,
        written: vec![out.to_path_buf()],
    })
}

/// Rewind the stage, play up to `frame` and write that frame to `out` (format from extension).
pub fn export_frame(stage: &mut Stage, frame: u64, out: &Path) -> GrafelResult<()> {
    let format = FrameFormat::from_path(out)?;
    stage.reset()?;
    for _ in 0..frame {
        stage.advance()?;
    }

    let settings = stage.settings();
    let mut backend = SvgBackend::new(settings.canvas, settings.background);
    stage.render_next(&mut backend)?;
    let doc = backend
        .take_frames()
        .pop()
        .ok_or_else(|| GrafelError::render("no frame produced"))?;

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create output directory '{}'", parent.display())
        })?;
    }
    match format {
        FrameFormat::Svg => std::fs::write(out, &doc.svg)
            .with_context(|| format!("failed to write '{}'", out.display()))?,
        FrameFormat::Png => {
            let rgba = Rasterizer::new().rasterize(&doc.svg, None)?;
            write_png(out, &rgba)?;
        }
    }
    tracing::info!(frame, out = %out.display(), "frame written");
    Ok(())
}

/// SVG backend that rasterizes finished frames to PNG files in parallel, a batch at a time.
struct PngBatchBackend<'a> {
    svg: SvgBackend,
    batch: usize,
    pool: &'a rayon::ThreadPool,
    rasterizer: &'a Rasterizer,
    dir: &'a Path,
    written: Vec<PathBuf>,
}

impl PngBatchBackend<'_> {
    fn flush(&mut self) -> GrafelResult<()> {
        let docs = self.svg.take_frames();
        if docs.is_empty() {
            return Ok(());
        }
        let (rasterizer, dir) = (self.rasterizer, self.dir);
        let paths = self.pool.install(|| {
            docs.par_iter()
                .map(|doc| rasterize_to_file(rasterizer, doc, dir))
                .collect::<GrafelResult<Vec<_>>>()
        })?;
        self.written.extend(paths);
        Ok(())
    }
}

impl DrawBackend for PngBatchBackend<'_> {
    fn clear(&mut self, frame: u64) -> GrafelResult<()> {
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
        if self.svg.pending() >= self.batch {
            self.flush()?;
        }
        Ok(())
    }
}

fn rasterize_to_file(
    rasterizer: &Rasterizer,
    doc: &SvgFrame,
    dir: &Path,
) -> GrafelResult<PathBuf> {
    let rgba = rasterizer.rasterize(&doc.svg, None)?;
    let path = dir.join(frame_file_name(doc.frame, FrameFormat::Png.extension()));
    write_png(&path, &rgba)?;
    Ok(path)
}

fn build_thread_pool(threads: Option<usize>) -> GrafelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GrafelError::validation("export threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GrafelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
