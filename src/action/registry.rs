use std::collections::BTreeMap;

use crate::action::ease::MotionCurve;
use crate::action::{Action, ActionKind};
use crate::actor::cast::ActorId;
use crate::foundation::color::Color;
use crate::foundation::core::{Interval, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};

/// Argument passed to an action constructor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionArg {
    Vector(Vector),
    Color(Color),
}

impl std::fmt::Display for ActionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionArg::Vector(v) => write!(f, "{}x{}", v.x, v.y),
            ActionArg::Color(c) => write!(f, "{c}"),
        }
    }
}

/// Builds an [`ActionKind`] from script arguments.
pub type ActionCtor = fn(&[ActionArg]) -> GrafelResult<ActionKind>;

/// Name to constructor table used when turning script action lines into [`Action`]s.
///
/// Names are stored lowercase and matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    ctors: BTreeMap<String, ActionCtor>,
}

impl ActionRegistry {
    /// Registry without any kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind.
    pub fn standard() -> Self {
        let ctors = STANDARD
            .iter()
            .map(|(name, ctor)| ((*name).to_owned(), *ctor))
            .collect();
        Self { ctors }
    }

    /// Add a kind. Fails if the name is taken.
    pub fn register(&mut self, name: &str, ctor: ActionCtor) -> GrafelResult<()> {
        let key = name.to_ascii_lowercase();
        if key.is_empty() {
            return Err(GrafelError::validation("action kind name must be non-empty"));
        }
        if self.ctors.contains_key(&key) {
            return Err(GrafelError::validation(format!(
                "action kind '{name}' is already registered"
            )));
        }
        self.ctors.insert(key, ctor);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ctors.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    /// Build the kind called `name` from `args`.
    pub fn kind(&self, name: &str, args: &[ActionArg]) -> GrafelResult<ActionKind> {
        let ctor = self
            .ctors
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| GrafelError::unknown_action(name))?;
        ctor(args)
    }

    /// Build a complete action.
    pub fn create(
        &self,
        name: &str,
        actor: ActorId,
        interval: Interval,
        args: &[ActionArg],
    ) -> GrafelResult<Action> {
        Ok(Action::new(actor, interval, self.kind(name, args)?))
    }
}

const STANDARD: &[(&str, ActionCtor)] = &[
    ("move", move_ctor),
    ("fall", fall_ctor),
    ("land", land_ctor),
    ("easein", ease_in_ctor),
    ("easeout", ease_out_ctor),
    ("swing", swing_ctor),
    ("enter", enter_ctor),
    ("colorize", colorize_ctor),
    ("blink", blink_ctor),
    ("fadeout", fade_out_ctor),
    ("fadein", fade_in_ctor),
    ("exit", exit_ctor),
    ("background", background_ctor),
    ("foreground", foreground_ctor),
    ("timer", timer_ctor),
];

fn vector_arg(kind: &str, args: &[ActionArg]) -> GrafelResult<Vector> {
    match args {
        [ActionArg::Vector(v)] => Ok(*v),
        _ => Err(GrafelError::validation(format!(
            "{kind} takes exactly one vector argument, got {}",
            describe(args)
        ))),
    }
}

fn color_arg(kind: &str, args: &[ActionArg]) -> GrafelResult<Color> {
    match args {
        [ActionArg::Color(c)] => Ok(*c),
        _ => Err(GrafelError::validation(format!(
            "{kind} takes exactly one color argument, got {}",
            describe(args)
        ))),
    }
}

fn no_args(kind: &str, args: &[ActionArg]) -> GrafelResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(GrafelError::validation(format!(
            "{kind} takes no arguments, got {}",
            describe(args)
        )))
    }
}

fn describe(args: &[ActionArg]) -> String {
    if args.is_empty() {
        return "none".to_owned();
    }
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn motion(curve: MotionCurve, args: &[ActionArg]) -> GrafelResult<ActionKind> {
    Ok(ActionKind::motion(curve, vector_arg(curve.name(), args)?))
}

fn move_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    motion(MotionCurve::Move, args)
}

fn fall_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    motion(MotionCurve::Fall, args)
}

fn land_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    motion(MotionCurve::Land, args)
}

fn ease_in_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    motion(MotionCurve::EaseIn, args)
}

fn ease_out_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    motion(MotionCurve::EaseOut, args)
}

fn swing_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    motion(MotionCurve::Swing, args)
}

fn enter_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    Ok(ActionKind::enter(vector_arg("Enter", args)?))
}

fn colorize_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    Ok(ActionKind::colorize(color_arg("Colorize", args)?))
}

fn blink_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("Blink", args)?;
    Ok(ActionKind::blink())
}

fn fade_out_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("FadeOut", args)?;
    Ok(ActionKind::fade_out())
}

fn fade_in_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("FadeIn", args)?;
    Ok(ActionKind::fade_in())
}

fn exit_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("Exit", args)?;
    Ok(ActionKind::exit())
}

fn background_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("Background", args)?;
    Ok(ActionKind::background())
}

fn foreground_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("Foreground", args)?;
    Ok(ActionKind::foreground())
}

fn timer_ctor(args: &[ActionArg]) -> GrafelResult<ActionKind> {
    no_args("Timer", args)?;
    Ok(ActionKind::Timer)
}
