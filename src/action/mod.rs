pub(crate) mod ease;
pub(crate) mod registry;

use crate::action::ease::MotionCurve;
use crate::actor::cast::ActorId;
use crate::actor::model::{Actor, Level};
use crate::foundation::color::Color;
use crate::foundation::core::{Interval, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};

/// Actor state field an action writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Position,
    Color,
    Opacity,
    Level,
    Text,
}

/// What an action does to its actor.
///
/// Values captured in [`Action::start`] (`from`, `original`, ...) are `None` until the action is
/// started and are refreshed on every restart.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    /// Move to `target` along an easing curve.
    Motion {
        curve: MotionCurve,
        target: Vector,
        from: Option<Vector>,
    },
    /// Put the actor on stage at `target` on every frame.
    Enter { target: Vector },
    /// Blend the color towards `target`.
    Colorize { target: Color, from: Option<Color> },
    /// Alternate between the original color and its inverse.
    Blink { original: Option<Color> },
    /// Linear opacity ramp down to 0.
    FadeOut { from: Option<f64> },
    /// Linear opacity ramp up to 1.
    FadeIn { from: Option<f64> },
    /// Switch the drawing level once, at start.
    SetLevel(Level),
    /// Render the current frame as `MM:SS.FF` into the actor's text.
    Timer,
}

impl ActionKind {
    pub fn motion(curve: MotionCurve, target: Vector) -> Self {
        Self::Motion {
            curve,
            target,
            from: None,
        }
    }

    pub fn enter(target: Vector) -> Self {
        Self::Enter { target }
    }

    pub fn exit() -> Self {
        Self::SetLevel(Level::OffStage)
    }

    pub fn background() -> Self {
        Self::SetLevel(Level::OnBackground)
    }

    pub fn foreground() -> Self {
        Self::SetLevel(Level::OnForeground)
    }

    pub fn colorize(target: Color) -> Self {
        Self::Colorize { target, from: None }
    }

    pub fn blink() -> Self {
        Self::Blink { original: None }
    }

    pub fn fade_out() -> Self {
        Self::FadeOut { from: None }
    }

    pub fn fade_in() -> Self {
        Self::FadeIn { from: None }
    }

    /// Display name, as used in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Motion { curve, .. } => curve.name(),
            Self::Enter { .. } => "Enter",
            Self::Colorize { .. } => "Colorize",
            Self::Blink { .. } => "Blink",
            Self::FadeOut { .. } => "FadeOut",
            Self::FadeIn { .. } => "FadeIn",
            Self::SetLevel(Level::OffStage) => "Exit",
            Self::SetLevel(Level::OnBackground) => "Background",
            Self::SetLevel(Level::OnForeground) => "Foreground",
            Self::SetLevel(Level::OnStage) => "OnStage",
            Self::Timer => "Timer",
        }
    }

    /// Actor fields written while the action runs.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Motion { .. } => &[Field::Position],
            Self::Enter { .. } => &[Field::Position, Field::Level],
            Self::Colorize { .. } | Self::Blink { .. } => &[Field::Color],
            Self::FadeOut { .. } | Self::FadeIn { .. } => &[Field::Opacity],
            Self::SetLevel(_) => &[Field::Level],
            Self::Timer => &[Field::Text],
        }
    }
}

/// Format a frame number as `MM:SS.FF` assuming 25 frames per second.
pub fn timer_text(frame: u64) -> String {
    let minutes = frame / (60 * 25);
    let seconds = (frame / 25) % 60;
    let frames = frame % 25;
    format!("{minutes:02}:{seconds:02}.{frames:02}")
}

/// A time-bounded change applied to one actor.
///
/// The scheduler calls [`Action::start`] once at the lower bound, [`Action::step`] on every
/// frame of the interval (the start frame included) and [`Action::end`] once at the upper
/// bound, after the last step.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    actor: ActorId,
    interval: Interval,
    kind: ActionKind,
}

impl Action {
    pub fn new(actor: ActorId, interval: Interval, kind: ActionKind) -> Self {
        Self {
            actor,
            interval,
            kind,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn fields(&self) -> &'static [Field] {
        self.kind.fields()
    }

    pub fn is_last(&self, frame: u64) -> GrafelResult<bool> {
        self.interval.is_last(frame)
    }

    /// Capture the actor values the action interpolates from.
    #[tracing::instrument(
        level = "debug",
        skip(self, actor),
        fields(action = self.name(), actor = actor.name())
    )]
    pub fn start(&mut self, frame: u64, actor: &mut Actor) -> GrafelResult<()> {
        self.interval.relative_frame(frame)?;
        let state = actor.state_mut();
        match &mut self.kind {
            ActionKind::Motion { from, .. } => *from = Some(state.position),
            ActionKind::Enter { .. } => {}
            ActionKind::Colorize { from, .. } => *from = Some(state.color),
            ActionKind::Blink { original } => *original = Some(state.color),
            ActionKind::FadeOut { from } | ActionKind::FadeIn { from } => {
                *from = Some(state.opacity)
            }
            ActionKind::SetLevel(level) => state.level = *level,
            ActionKind::Timer => state.text = timer_text(0),
        }
        Ok(())
    }

    /// Apply the action's effect for `frame`.
    pub fn step(&mut self, frame: u64, actor: &mut Actor) -> GrafelResult<()> {
        let interval = self.interval;
        let rel = interval.relative_frame(frame)?;
        let t = interval.progress(frame)?;
        let name = self.kind.name();
        let state = actor.state_mut();
        match &self.kind {
            ActionKind::Motion {
                curve,
                target,
                from,
            } => {
                let from = started(*from, name)?;
                state.position = from + (*target - from) * curve.ease().apply(t);
            }
            ActionKind::Enter { target } => {
                state.position = *target;
                state.level = Level::OnStage;
            }
            ActionKind::Colorize { target, from } => {
                state.color = started(*from, name)?.lerp(*target, t);
            }
            ActionKind::Blink { original } => {
                let original = started(*original, name)?;
                state.color = if frame % 2 == 1 {
                    original
                } else {
                    original.inverse()
                };
            }
            ActionKind::FadeOut { from } => {
                let from = started(*from, name)?;
                let steps = interval.num_steps();
                let opacity = if steps == 0 {
                    0.0
                } else {
                    from - (from / steps as f64) * rel as f64
                };
                state.set_opacity(opacity.max(0.0));
            }
            ActionKind::FadeIn { from } => {
                let from = started(*from, name)?;
                let steps = interval.num_steps();
                let opacity = if steps == 0 {
                    1.0
                } else {
                    from + ((1.0 - from) / steps as f64) * rel as f64
                };
                state.set_opacity(opacity.min(1.0));
            }
            ActionKind::SetLevel(_) => {}
            ActionKind::Timer => state.text = timer_text(frame),
        }
        Ok(())
    }

    /// Snap the actor to the action's final value.
    pub fn end(&mut self, frame: u64, actor: &mut Actor) -> GrafelResult<()> {
        self.interval.relative_frame(frame)?;
        let name = self.kind.name();
        let state = actor.state_mut();
        match &self.kind {
            ActionKind::Motion { target, .. } => state.position = *target,
            ActionKind::Enter { target } => state.position = *target,
            ActionKind::Colorize { target, .. } => state.color = *target,
            ActionKind::Blink { original } => state.color = started(*original, name)?,
            ActionKind::FadeOut { .. } => state.set_opacity(0.0),
            ActionKind::FadeIn { .. } => state.set_opacity(1.0),
            ActionKind::SetLevel(_) | ActionKind::Timer => {}
        }
        tracing::debug!(action = name, actor = actor.name(), frame, "action ended");
        Ok(())
    }
}

fn started<T>(value: Option<T>, name: &str) -> GrafelResult<T> {
    value.ok_or_else(|| GrafelError::validation(format!("{name} action used before start")))
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.name(), self.interval)?;
        match &self.kind {
            ActionKind::Motion { target, .. } => write!(f, " to {target}"),
            ActionKind::Enter { target } => write!(f, " at {target}"),
            ActionKind::Colorize { target, .. } => write!(f, " to {target}"),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/mod.rs"]
mod tests;
