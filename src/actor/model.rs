use std::path::PathBuf;

use crate::actor::cast::ActorId;
use crate::foundation::color::Color;
use crate::foundation::core::Vector;
use crate::foundation::error::{GrafelError, GrafelResult};

/// Drawing layer of an actor.
///
/// Ordered back to front: actors in [`Level::OffStage`] are never drawn, the other three are
/// drawn in separate passes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Not drawn.
    OffStage,
    /// Drawn first.
    OnBackground,
    /// Drawn in the main pass.
    #[default]
    OnStage,
    /// Drawn last.
    OnForeground,
}

impl Level {
    /// The three drawn levels in pass order.
    pub const PASSES: [Level; 3] = [Level::OnBackground, Level::OnStage, Level::OnForeground];

    /// Whether actors at this level are drawn.
    pub fn is_active(self) -> bool {
        self > Level::OffStage
    }
}

/// Mutable presentation state of an actor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActorState {
    /// Position relative to the parent actor (absolute for roots).
    pub position: Vector,
    /// Fill color.
    pub color: Color,
    /// Per-axis scale factor applied to the shape's size.
    pub scale: Vector,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Drawing layer.
    pub level: Level,
    /// Text content for text-like shapes.
    pub text: String,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            color: Color::SILVER,
            scale: Vector::new(1.0, 1.0),
            opacity: 1.0,
            level: Level::OnStage,
            text: String::new(),
        }
    }
}

impl ActorState {
    /// Set opacity, clamped into `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

/// Geometry of an actor. Sizes are in pixels before scaling; every shape is centered on the
/// actor's absolute position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Pure grouping node; draws nothing.
    Group,
    /// Axis-aligned square.
    Square { side: f64 },
    /// Axis-aligned rectangle.
    Rect { width: f64, height: f64 },
    /// Rectangle with rounded corners.
    RoundRect {
        width: f64,
        height: f64,
        radius: f64,
    },
    /// Circle.
    Circle { radius: f64 },
    /// Five-pointed star; inner vertices sit at half the outer radius.
    Star { radius: f64 },
    /// Triangle given by three vertices relative to the center.
    Triangle { points: [Vector; 3] },
    /// Closed polygon given by vertices relative to the center.
    Polygon { points: Vec<Vector> },
    /// Dice; the face border and the dots are child actors.
    Dice { side: f64, num: u8 },
    /// Bare text using the actor's `text` state.
    Text { font_size: f64 },
    /// Text with an outline box around it.
    Label { font_size: f64 },
    /// Image loaded from a file.
    Bitmap { path: PathBuf },
}

impl Shape {
    /// Default square side.
    pub const DEFAULT_SIDE: f64 = 50.0;
    /// Default circle/star radius.
    pub const DEFAULT_RADIUS: f64 = 50.0;
    /// Default rounded-corner radius.
    pub const DEFAULT_CORNER: f64 = 10.0;
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 32.0;

    /// Lowercase shape name used in logs and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Group => "group",
            Shape::Square { .. } => "square",
            Shape::Rect { .. } => "rect",
            Shape::RoundRect { .. } => "roundrect",
            Shape::Circle { .. } => "circle",
            Shape::Star { .. } => "star",
            Shape::Triangle { .. } => "triangle",
            Shape::Polygon { .. } => "polygon",
            Shape::Dice { .. } => "dice",
            Shape::Text { .. } => "text",
            Shape::Label { .. } => "label",
            Shape::Bitmap { .. } => "bitmap",
        }
    }

    fn validate(&self) -> GrafelResult<()> {
        let positive = |what: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(GrafelError::validation(format!(
                    "{} {what} must be a positive number, got {v}",
                    self.name()
                )))
            }
        };
        match self {
            Shape::Group => Ok(()),
            Shape::Square { side } => positive("side", *side),
            Shape::Rect { width, height } => {
                positive("width", *width)?;
                positive("height", *height)
            }
            Shape::RoundRect {
                width,
                height,
                radius,
            } => {
                positive("width", *width)?;
                positive("height", *height)?;
                if *radius < 0.0 {
                    return Err(GrafelError::validation("roundrect radius must be >= 0"));
                }
                Ok(())
            }
            Shape::Circle { radius } | Shape::Star { radius } => positive("radius", *radius),
            Shape::Triangle { .. } => Ok(()),
            Shape::Polygon { points } => {
                if points.len() < 3 {
                    return Err(GrafelError::validation(format!(
                        "polygon needs at least 3 points, got {}",
                        points.len()
                    )));
                }
                Ok(())
            }
            Shape::Dice { side, num } => {
                positive("side", *side)?;
                if !(1..=6).contains(num) {
                    return Err(GrafelError::validation(format!(
                        "dice face must be between 1 and 6, got {num}"
                    )));
                }
                Ok(())
            }
            Shape::Text { font_size } | Shape::Label { font_size } => {
                positive("font size", *font_size)
            }
            Shape::Bitmap { path } => {
                if path.as_os_str().is_empty() {
                    return Err(GrafelError::validation("bitmap needs a file name"));
                }
                Ok(())
            }
        }
    }
}

/// A named drawable element.
///
/// The construction-time state is kept aside so that [`Actor::reset`] can restore it; only the
/// scheduler's actions mutate [`Actor::state`] afterwards.
#[derive(Clone, Debug)]
pub struct Actor {
    name: String,
    shape: Shape,
    state: ActorState,
    initial: ActorState,
    pub(crate) parent: Option<ActorId>,
    pub(crate) children: Vec<ActorId>,
}

impl Actor {
    /// Create an actor at the origin with default state.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        let state = ActorState::default();
        Self {
            name: name.into(),
            shape,
            initial: state.clone(),
            state,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the construction-time position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.place(x, y);
        self
    }

    /// Move both the current and the construction-time position.
    pub fn place(&mut self, x: f64, y: f64) {
        self.initial.position = Vector::new(x, y);
        self.state.position = self.initial.position;
    }

    /// Set the construction-time position from a vector.
    pub fn with_position(self, position: Vector) -> Self {
        self.at(position.x, position.y)
    }

    /// Set the construction-time color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.initial.color = color;
        self.state.color = color;
        self
    }

    /// Set the construction-time opacity (clamped).
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.initial.set_opacity(opacity);
        self.state.opacity = self.initial.opacity;
        self
    }

    /// Set the construction-time scale.
    pub fn with_scale(mut self, scale: Vector) -> Self {
        self.initial.scale = scale;
        self.state.scale = scale;
        self
    }

    /// Set the construction-time level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.initial.level = level;
        self.state.level = level;
        self
    }

    /// Set the construction-time text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.initial.text = text.into();
        self.state.text = self.initial.text.clone();
        self
    }

    /// Check that the shape geometry makes sense.
    pub fn validate(&self) -> GrafelResult<()> {
        if self.name.trim().is_empty() {
            return Err(GrafelError::validation("actor name must be non-empty"));
        }
        self.shape.validate()
    }

    /// Unique actor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Current state.
    pub fn state(&self) -> &ActorState {
        &self.state
    }

    /// Mutable current state.
    pub fn state_mut(&mut self) -> &mut ActorState {
        &mut self.state
    }

    /// Construction-time state.
    pub fn initial(&self) -> &ActorState {
        &self.initial
    }

    /// Current position relative to the parent.
    pub fn position(&self) -> Vector {
        self.state.position
    }

    /// Current color.
    pub fn color(&self) -> Color {
        self.state.color
    }

    /// Current opacity.
    pub fn opacity(&self) -> f64 {
        self.state.opacity
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.state.level
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// Parent actor, if any.
    pub fn parent(&self) -> Option<ActorId> {
        self.parent
    }

    /// Child actors in insertion order.
    pub fn children(&self) -> &[ActorId] {
        &self.children
    }

    /// Restore the construction-time state. Children are handled by [`crate::Cast::reset`].
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) at {} {} {:?}",
            self.name,
            self.shape.name(),
            self.state.position,
            self.state.color,
            self.state.level
        )
    }
}
