//! Grafel is a keyframe animation engine for 2D actors.
//!
//! A [`Script`] declares a cast of shapes and a timeline of actions. The script builds a
//! [`Stage`], whose [`Scheduler`] advances frame by frame and mutates actor state; every frame is
//! then drawn through a [`DrawBackend`]:
//!
//! - [`SvgBackend`] writes one SVG document per frame
//! - [`RasterBackend`] rasterizes frames with `resvg` and hands them to a [`FrameSink`]
//!   ([`PngDirSink`], [`FfmpegSink`], [`InMemorySink`])
//! - [`RecordingBackend`] keeps the draw calls for tests and diagnostics
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod action;
pub(crate) mod actor;
pub(crate) mod encode;
pub(crate) mod render;
pub(crate) mod scheduler;
pub(crate) mod script;
pub(crate) mod stage;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Fps, Interval, VECTOR_EPSILON, Vector};
pub use crate::foundation::error::{GrafelError, GrafelResult};

pub use crate::action::ease::{Ease, MotionCurve};
pub use crate::action::registry::{ActionArg, ActionCtor, ActionRegistry};
pub use crate::action::{Action, ActionKind, Field, timer_text};
pub use crate::actor::cast::{ActorId, Cast};
pub use crate::actor::model::{Actor, ActorState, Level, Shape};
pub use crate::scheduler::{ActionId, Conflict, Scheduler};
pub use crate::stage::{GRID_STEP, Stage, StageSettings};

pub use crate::encode::ffmpeg::{FfmpegSink, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    FrameSink, InMemorySink, PngDirSink, SinkConfig, frame_file_name, write_png,
};
pub use crate::render::backend::{DrawBackend, FrameRGBA, Paint};
pub use crate::render::export::{
    ExportOpts, ExportStats, FrameFormat, export_frame, export_mp4, export_png, export_svg, play,
};
pub use crate::render::raster::{RasterBackend, Rasterizer};
pub use crate::render::recording::{DrawCall, RecordingBackend};
pub use crate::render::svg::{SvgBackend, SvgFrame};
pub use crate::script::model::{ActionLine, Attr, CastLine, Role, Script};
