use std::collections::HashMap;
use std::fmt::Write as _;

use crate::action::{Action, Field};
use crate::actor::cast::{ActorId, Cast};
use crate::foundation::error::GrafelResult;

/// Handle to an action registered with a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(usize);

impl ActionId {
    /// Registration index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Two actions on the same actor with overlapping intervals that write the same field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub first: ActionId,
    pub second: ActionId,
    pub actor: ActorId,
    pub field: Field,
}

/// Frame-driven action sequencer.
///
/// Each call to [`Scheduler::next`] processes the current frame `f`: actions whose interval
/// begins at `f` are started, every active action is stepped, actions whose interval ends at `f`
/// are ended and dropped, then the frame counter advances.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    frame: u64,
    actions: Vec<Action>,
    index: HashMap<(ActorId, u64), Vec<usize>>,
    actors: Vec<ActorId>,
    active: Vec<usize>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame the next call to [`Scheduler::next`] will process.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Registered actions in registration order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    /// Actors with at least one action, in first-registration order.
    pub fn actors(&self) -> &[ActorId] {
        &self.actors
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active actions in activation order.
    pub fn active_actions(&self) -> impl Iterator<Item = &Action> {
        self.active.iter().map(|&i| &self.actions[i])
    }

    /// Register an action. Overlapping writes to the same field are reported with a warning but
    /// accepted; the action activated last wins.
    pub fn add_action(&mut self, action: Action) -> ActionId {
        let idx = self.actions.len();
        let actor = action.actor();
        let lower = action.interval().lower_bound();

        for (other, field) in self.clashes(&action) {
            tracing::warn!(
                action = %action,
                other = %self.actions[other],
                ?field,
                ?actor,
                "overlapping actions write the same field"
            );
        }

        if !self.actors.contains(&actor) {
            self.actors.push(actor);
        }
        self.index.entry((actor, lower)).or_default().push(idx);
        self.actions.push(action);
        ActionId(idx)
    }

    fn clashes(&self, action: &Action) -> Vec<(usize, Field)> {
        self.actions
            .iter()
            .enumerate()
            .filter(|(_, other)| {
                other.actor() == action.actor() && other.interval().overlaps(action.interval())
            })
            .filter_map(|(i, other)| {
                action
                    .fields()
                    .iter()
                    .find(|f| other.fields().contains(f))
                    .map(|f| (i, *f))
            })
            .collect()
    }

    /// Every pair of registered actions that would write the same field of the same actor on a
    /// shared frame.
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut out = Vec::new();
        for (j, action) in self.actions.iter().enumerate() {
            for (i, field) in self.clashes(action) {
                if i < j {
                    out.push(Conflict {
                        first: ActionId(i),
                        second: ActionId(j),
                        actor: action.actor(),
                        field,
                    });
                }
            }
        }
        out
    }

    /// Process the current frame and advance. Returns the new frame counter.
    #[tracing::instrument(level = "debug", skip_all, fields(frame = self.frame))]
    pub fn next(&mut self, cast: &mut Cast) -> GrafelResult<u64> {
        let frame = self.frame;

        for actor_id in &self.actors {
            let Some(starting) = self.index.get(&(*actor_id, frame)) else {
                continue;
            };
            for &idx in starting {
                self.actions[idx].start(frame, cast.get_mut(*actor_id)?)?;
                self.active.push(idx);
            }
        }

        for &idx in &self.active {
            let action = &mut self.actions[idx];
            action.step(frame, cast.get_mut(action.actor())?)?;
        }

        let mut finished = Vec::new();
        for &idx in &self.active {
            let action = &mut self.actions[idx];
            if action.is_last(frame)? {
                action.end(frame, cast.get_mut(action.actor())?)?;
                finished.push(idx);
            }
        }
        if !finished.is_empty() {
            self.active.retain(|idx| !finished.contains(idx));
        }

        self.frame = frame + 1;
        Ok(self.frame)
    }

    /// Drop every active action, rewind to frame 0 and restore all scheduled actors (and their
    /// children) to their construction-time state.
    pub fn reset(&mut self, cast: &mut Cast) -> GrafelResult<()> {
        self.active.clear();
        self.frame = 0;
        for &actor in &self.actors {
            cast.reset(actor)?;
        }
        tracing::debug!("scheduler reset");
        Ok(())
    }

    /// Human readable list of the frames on which actions start.
    pub fn timeline(&self, cast: &Cast, num_frames: u64) -> GrafelResult<String> {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "--[scheduler: {} actors, {} actions]--",
            self.actors.len(),
            self.actions.len()
        );
        for frame in 0..num_frames {
            for actor_id in &self.actors {
                let Some(starting) = self.index.get(&(*actor_id, frame)) else {
                    continue;
                };
                let name = cast.get(*actor_id)?.name();
                for &idx in starting {
                    let _ = writeln!(out, "{frame:>6}  {name}: {}", self.actions[idx]);
                }
            }
        }
        let late = self
            .actions
            .iter()
            .filter(|a| a.interval().lower_bound() >= num_frames)
            .count();
        if late > 0 {
            let _ = writeln!(out, "({late} actions start after frame {num_frames})");
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/scheduler.rs"]
mod tests;
