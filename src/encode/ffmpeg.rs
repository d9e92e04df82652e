use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Color;
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> GrafelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct Running {
    child: Child,
    stdin: Option<ChildStdin>,
    cfg: SinkConfig,
}

/// Streams frames as raw RGBA into the system `ffmpeg` binary, producing an H.264 MP4.
///
/// Transparent pixels are flattened over `background` because yuv420p has no alpha.
pub struct FfmpegSink {
    out_path: PathBuf,
    overwrite: bool,
    background: Color,
    running: Option<Running>,
    scratch: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(out_path: impl Into<PathBuf>, background: Color) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background,
            running: None,
            scratch: Vec::new(),
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

pub(crate) fn validate_config(cfg: &SinkConfig) -> GrafelResult<()> {
    if cfg.width == 0 || cfg.height == 0 {
        return Err(GrafelError::validation(
            "encode width/height must be non-zero",
        ));
    }
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(GrafelError::validation("encode fps must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(GrafelError::validation(
            "encode width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> GrafelResult<()> {
        validate_config(&cfg)?;
        ensure_parent_dir(&self.out_path)?;

        if !self.overwrite && self.out_path.exists() {
            return Err(GrafelError::validation(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(GrafelError::render(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&self.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            GrafelError::render(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GrafelError::render("failed to open ffmpeg stdin"))?;

        tracing::info!(
            out = %self.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.running = Some(Running {
            child,
            stdin: Some(stdin),
            cfg,
        });
        Ok(())
    }

    fn push_frame(&mut self, _frame: u64, rgba: &FrameRGBA) -> GrafelResult<()> {
        let Some(running) = self.running.as_mut() else {
            return Err(GrafelError::render("ffmpeg sink is not started"));
        };
        if rgba.width != running.cfg.width || rgba.height != running.cfg.height {
            return Err(GrafelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                rgba.width, rgba.height, running.cfg.width, running.cfg.height
            )));
        }

        let bg = self.background;
        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &rgba.data,
            rgba.premultiplied,
            [bg.r, bg.g, bg.b, 255],
        )?;

        let Some(stdin) = running.stdin.as_mut() else {
            return Err(GrafelError::render("ffmpeg sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            GrafelError::render(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> GrafelResult<()> {
        let Some(mut running) = self.running.take() else {
            return Ok(());
        };
        drop(running.stdin.take());

        let output = running.child.wait_with_output().map_err(|e| {
            GrafelError::render(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GrafelError::render(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        tracing::info!(out = %self.out_path.display(), "mp4 written");
        Ok(())
    }
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> GrafelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GrafelError::validation(
            "frame data size does not match width*height*4",
        ));
    }

    let [bg_r, bg_g, bg_b, _] = bg_rgba.map(u16::from);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let over = |c: u8, bg: u16| {
            let c = u16::from(c);
            let c = if src_is_premul { c } else { mul_div255_u16(c, a) };
            (c + mul_div255_u16(bg, inv)).min(255) as u8
        };

        d[0] = over(s[0], bg_r);
        d[1] = over(s[1], bg_g);
        d[2] = over(s[2], bg_b);
        d[3] = 255;
    }

    Ok(())
}
