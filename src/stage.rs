use std::collections::BTreeMap;

use crate::action::Action;
use crate::actor::cast::{ActorId, Cast};
use crate::actor::draw::draw_actor;
use crate::actor::model::{Actor, Level};
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Fps, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::render::backend::DrawBackend;
use crate::scheduler::{ActionId, Scheduler};

/// Grid spacing in pixels when [`StageSettings::grid`] is on.
pub const GRID_STEP: u32 = 50;

/// Output and playback configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageSettings {
    pub canvas: Canvas,
    pub fps: Fps,
    pub num_frames: u64,
    pub background: Color,
    pub foreground: Color,
    pub grid: bool,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            num_frames: 150,
            background: Color::BLACK,
            foreground: Color::WHITE,
            grid: false,
        }
    }
}

impl StageSettings {
    pub fn validate(&self) -> GrafelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(GrafelError::validation("canvas width/height must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.num_frames == 0 {
            return Err(GrafelError::validation("num_frames must be > 0"));
        }
        Ok(())
    }
}

/// A cast, its scheduled actions and the actors drawn as roots.
///
/// Frames are drawn in three passes (background, stage, foreground). Within a pass actors are
/// drawn in roster order, each immediately followed by its children.
#[derive(Clone, Debug)]
pub struct Stage {
    settings: StageSettings,
    cast: Cast,
    scheduler: Scheduler,
    roster: Vec<ActorId>,
}

impl Stage {
    pub fn new(settings: StageSettings) -> Self {
        Self {
            settings,
            cast: Cast::new(),
            scheduler: Scheduler::new(),
            roster: Vec::new(),
        }
    }

    pub fn settings(&self) -> &StageSettings {
        &self.settings
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    pub fn cast_mut(&mut self) -> &mut Cast {
        &mut self.cast
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Root actors in insertion order.
    pub fn roster(&self) -> &[ActorId] {
        &self.roster
    }

    /// Frame the next [`Stage::render_next`] call will produce.
    pub fn frame(&self) -> u64 {
        self.scheduler.frame()
    }

    /// Insert `actor` into the cast and put it on the roster.
    pub fn add_actor(&mut self, actor: Actor) -> GrafelResult<ActorId> {
        let id = self.cast.insert(actor)?;
        self.roster.push(id);
        Ok(id)
    }

    /// Insert a dice (with its children) and put it on the roster.
    pub fn add_dice(&mut self, dice: Actor) -> GrafelResult<ActorId> {
        let id = self.cast.insert_dice(dice)?;
        self.roster.push(id);
        Ok(id)
    }

    /// Put an actor that is already in the cast on the roster. Children are drawn through their
    /// parent and cannot be enrolled on their own.
    pub fn enroll(&mut self, id: ActorId) -> GrafelResult<()> {
        let actor = self.cast.get(id)?;
        if actor.parent().is_some() {
            return Err(GrafelError::validation(format!(
                "actor '{}' has a parent and is drawn with it",
                actor.name()
            )));
        }
        if !self.roster.contains(&id) {
            self.roster.push(id);
        }
        Ok(())
    }

    /// Attach `child` under `parent`. A child leaves the roster.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) -> GrafelResult<()> {
        self.cast.add_child(parent, child)?;
        self.roster.retain(|id| *id != child);
        Ok(())
    }

    /// Schedule an action on an actor of this stage.
    pub fn add_action(&mut self, action: Action) -> GrafelResult<ActionId> {
        self.cast.get(action.actor())?;
        Ok(self.scheduler.add_action(action))
    }

    /// Process the current frame without drawing it.
    pub fn advance(&mut self) -> GrafelResult<u64> {
        self.scheduler.next(&mut self.cast)
    }

    /// Roster actors in drawing order for the current state.
    pub fn draw_order(&self) -> Vec<ActorId> {
        Level::PASSES
            .iter()
            .flat_map(|level| {
                self.roster
                    .iter()
                    .copied()
                    .filter(move |id| self.cast[*id].level() == *level)
            })
            .collect()
    }

    /// Draw the current actor state as frame `frame`.
    #[tracing::instrument(level = "debug", skip(self, backend))]
    pub fn draw(&self, backend: &mut dyn DrawBackend, frame: u64) -> GrafelResult<()> {
        backend.clear(frame)?;
        if self.settings.grid {
            backend.grid(self.settings.canvas, GRID_STEP, self.settings.foreground)?;
        }
        for id in self.draw_order() {
            draw_actor(&self.cast, id, backend)?;
        }
        backend.end()
    }

    /// Process the current frame, then draw it. Returns the frame drawn.
    pub fn render_next(&mut self, backend: &mut dyn DrawBackend) -> GrafelResult<u64> {
        let frame = self.scheduler.frame();
        self.scheduler.next(&mut self.cast)?;
        self.draw(backend, frame)?;
        Ok(frame)
    }

    /// Render `count` consecutive frames.
    pub fn render(&mut self, backend: &mut dyn DrawBackend, count: u64) -> GrafelResult<()> {
        for _ in 0..count {
            self.render_next(backend)?;
        }
        Ok(())
    }

    /// Rewind to frame 0 with every actor back in its construction-time state.
    pub fn reset(&mut self) -> GrafelResult<()> {
        self.scheduler.reset(&mut self.cast)?;
        self.cast.reset_all();
        Ok(())
    }

    /// Named reference points of the canvas.
    pub fn refs(&self) -> BTreeMap<&'static str, Vector> {
        let size = self.settings.canvas.size();
        BTreeMap::from([
            ("center", size / 2.0),
            ("top_left", Vector::ZERO),
            ("top_right", Vector::new(size.x, 0.0)),
            ("bottom_left", Vector::new(0.0, size.y)),
            ("bottom_right", size),
        ])
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
