use std::collections::HashSet;
use std::path::PathBuf;

use crate::action::registry::ActionRegistry;
use crate::actor::model::{Actor, Level, Shape};
use crate::foundation::color::Color;
use crate::foundation::core::{Interval, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::script::model::{Attr, CastLine, Role, Script};
use crate::stage::{Stage, StageSettings};

/// Default triangle: a right-pointing wedge around the actor position.
const DEFAULT_TRIANGLE: [Vector; 3] = [
    Vector::new(0.0, -25.0),
    Vector::new(50.0, 0.0),
    Vector::new(0.0, 25.0),
];

impl Script {
    /// Build a stage: every cast line becomes a roster actor (dice with their children), every
    /// action line is created through `registry` and scheduled.
    #[tracing::instrument(level = "debug", skip(self, settings, registry))]
    pub fn build(&self, settings: StageSettings, registry: &ActionRegistry) -> GrafelResult<Stage> {
        settings.validate()?;
        let mut stage = Stage::new(settings);

        for line in &self.cast {
            let actor = self.actor_for(line)?;
            if line.role == Role::Dice {
                stage.add_dice(actor)?;
            } else {
                stage.add_actor(actor)?;
            }
        }

        for line in &self.actions {
            let actor = stage.cast().id(&line.actor).ok_or_else(|| {
                GrafelError::validation(format!(
                    "action '{}' refers to unknown actor '{}'",
                    line.action, line.actor
                ))
            })?;
            // deserialized intervals skip the constructor check
            let interval =
                Interval::new(line.interval.lower_bound(), line.interval.upper_bound())?;
            let action = registry.create(&line.action, actor, interval, &line.args)?;
            stage.add_action(action)?;
        }

        tracing::debug!(
            actors = stage.cast().len(),
            actions = stage.scheduler().len(),
            "stage built from script"
        );
        Ok(stage)
    }

    fn actor_for(&self, line: &CastLine) -> GrafelResult<Actor> {
        let attrs = Attrs::collect(line)?;
        let shape = match line.role {
            Role::Square => Shape::Square {
                side: attrs.side()?.unwrap_or(Shape::DEFAULT_SIDE),
            },
            Role::Rect => {
                let (width, height) = attrs.extent()?;
                Shape::Rect { width, height }
            }
            Role::RoundRect => {
                let (width, height) = attrs.extent()?;
                Shape::RoundRect {
                    width,
                    height,
                    radius: attrs.radius.unwrap_or(Shape::DEFAULT_CORNER),
                }
            }
            Role::Circle => Shape::Circle {
                radius: attrs.radius.unwrap_or(Shape::DEFAULT_RADIUS),
            },
            Role::Star => Shape::Star {
                radius: attrs.radius.unwrap_or(Shape::DEFAULT_RADIUS),
            },
            Role::Dice => Shape::Dice {
                side: attrs.side()?.unwrap_or(Shape::DEFAULT_SIDE),
                num: attrs.num.unwrap_or(1),
            },
            Role::Text => Shape::Text {
                font_size: attrs.font_size.unwrap_or(Shape::DEFAULT_FONT_SIZE),
            },
            Role::Label => Shape::Label {
                font_size: attrs.font_size.unwrap_or(Shape::DEFAULT_FONT_SIZE),
            },
            Role::Triangle => match &attrs.points {
                None => Shape::Triangle {
                    points: DEFAULT_TRIANGLE,
                },
                Some(points) => Shape::Triangle {
                    points: <[Vector; 3]>::try_from(points.as_slice()).map_err(|_| {
                        GrafelError::validation(format!(
                            "triangle '{}' needs exactly 3 points, got {}",
                            line.name,
                            points.len()
                        ))
                    })?,
                },
            },
            Role::Polygon => Shape::Polygon {
                points: attrs.points.clone().ok_or_else(|| {
                    GrafelError::validation(format!("polygon '{}' needs points", line.name))
                })?,
            },
            Role::Bitmap => {
                let name = attrs.filename.as_deref().ok_or_else(|| {
                    GrafelError::validation(format!("bitmap '{}' needs a filename", line.name))
                })?;
                Shape::Bitmap {
                    path: self.resolve(name),
                }
            }
        };

        let default_color = if line.role == Role::Dice {
            Color::GHOSTGRAY
        } else {
            Color::SILVER
        };
        let level = if attrs.pos.is_some() {
            Level::OnStage
        } else {
            Level::OffStage
        };
        let mut actor = Actor::new(line.name.clone(), shape)
            .with_position(attrs.pos.unwrap_or(Vector::ZERO))
            .with_color(attrs.color.unwrap_or(default_color))
            .with_opacity(attrs.alpha.unwrap_or(1.0))
            .with_level(level);
        if matches!(line.role, Role::Text | Role::Label) {
            let text = attrs.text.clone().unwrap_or_else(|| line.name.clone());
            actor = actor.with_text(text);
        }
        Ok(actor)
    }

    fn resolve(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }
}

/// Attributes of one cast line, checked against its role.
#[derive(Default)]
struct Attrs<'a> {
    name: &'a str,
    size: Option<Vector>,
    pos: Option<Vector>,
    num: Option<u8>,
    side: Option<f64>,
    font_size: Option<f64>,
    radius: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    text: Option<String>,
    filename: Option<String>,
    alpha: Option<f64>,
    points: Option<Vec<Vector>>,
    color: Option<Color>,
}

fn allowed(role: Role) -> &'static [&'static str] {
    match role {
        Role::Square => &["side", "size"],
        Role::Rect => &["size", "width", "height"],
        Role::RoundRect => &["size", "width", "height", "radius"],
        Role::Circle | Role::Star => &["radius"],
        Role::Dice => &["side", "size", "num"],
        Role::Text | Role::Label => &["text", "fontsize"],
        Role::Triangle | Role::Polygon => &["points"],
        Role::Bitmap => &["filename"],
    }
}

impl<'a> Attrs<'a> {
    fn collect(line: &'a CastLine) -> GrafelResult<Self> {
        const COMMON: [&str; 3] = ["pos", "color", "alpha"];
        let mut out = Attrs {
            name: &line.name,
            ..Attrs::default()
        };
        let mut seen = HashSet::new();
        for attr in &line.attrs {
            let keyword = attr.keyword();
            if !COMMON.contains(&keyword) && !allowed(line.role).contains(&keyword) {
                return Err(GrafelError::validation(format!(
                    "attribute '{keyword}' does not apply to {} '{}'",
                    line.role, line.name
                )));
            }
            if !seen.insert(keyword) {
                return Err(GrafelError::validation(format!(
                    "attribute '{keyword}' given twice for '{}'",
                    line.name
                )));
            }
            match attr {
                Attr::Size(v) => out.size = Some(*v),
                Attr::Pos(v) => out.pos = Some(*v),
                Attr::Num(n) => out.num = Some(*n),
                Attr::Side(v) => out.side = Some(*v),
                Attr::FontSize(v) => out.font_size = Some(*v),
                Attr::Radius(v) => out.radius = Some(*v),
                Attr::Width(v) => out.width = Some(*v),
                Attr::Height(v) => out.height = Some(*v),
                Attr::Text(s) => out.text = Some(s.clone()),
                Attr::Filename(s) => out.filename = Some(s.clone()),
                Attr::Alpha(a) => out.alpha = Some(*a),
                Attr::Points(p) => out.points = Some(p.clone()),
                Attr::Color(c) => out.color = Some(*c),
            }
        }
        Ok(out)
    }

    /// `side N`, or `size NxN` with equal components.
    fn side(&self) -> GrafelResult<Option<f64>> {
        match (self.side, self.size) {
            (Some(_), Some(_)) => Err(GrafelError::validation(format!(
                "'{}' sets both side and size",
                self.name
            ))),
            (Some(side), None) => Ok(Some(side)),
            (None, Some(size)) if size.x == size.y => Ok(Some(size.x)),
            (None, Some(size)) => Err(GrafelError::validation(format!(
                "'{}' needs a square size, got {}x{}",
                self.name, size.x, size.y
            ))),
            (None, None) => Ok(None),
        }
    }

    /// `size WxH`, or `width`/`height` (each defaulting to the standard side).
    fn extent(&self) -> GrafelResult<(f64, f64)> {
        match self.size {
            Some(_) if self.width.is_some() || self.height.is_some() => {
                Err(GrafelError::validation(format!(
                    "'{}' sets both size and width/height",
                    self.name
                )))
            }
            Some(size) => Ok((size.x, size.y)),
            None => Ok((
                self.width.unwrap_or(Shape::DEFAULT_SIDE),
                self.height.unwrap_or(Shape::DEFAULT_SIDE),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/loader.rs"]
mod tests;
