use std::collections::HashMap;

use crate::actor::model::{Actor, Shape};
use crate::foundation::color::Color;
use crate::foundation::core::Vector;
use crate::foundation::error::{GrafelError, GrafelResult};

/// Stable handle to an actor stored in a [`Cast`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ActorId(pub(crate) usize);

impl ActorId {
    /// Arena slot of this actor.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena owning every actor of a scene, addressed by [`ActorId`] or by unique name.
///
/// Parent/child links are stored as ids, so the tree has no owning cycles.
#[derive(Clone, Debug, Default)]
pub struct Cast {
    actors: Vec<Actor>,
    by_name: HashMap<String, ActorId>,
}

impl Cast {
    /// Empty cast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actors, children included.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the cast has no actors.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Add an actor. Names must be unique.
    pub fn insert(&mut self, actor: Actor) -> GrafelResult<ActorId> {
        actor.validate()?;
        if self.by_name.contains_key(actor.name()) {
            return Err(GrafelError::validation(format!(
                "duplicate actor name '{}'",
                actor.name()
            )));
        }
        let id = ActorId(self.actors.len());
        self.by_name.insert(actor.name().to_owned(), id);
        self.actors.push(actor);
        Ok(id)
    }

    /// Id of the actor called `name`.
    pub fn id(&self, name: &str) -> Option<ActorId> {
        self.by_name.get(name).copied()
    }

    /// Like [`Cast::id`] but fails with a validation error.
    pub fn lookup(&self, name: &str) -> GrafelResult<ActorId> {
        self.id(name)
            .ok_or_else(|| GrafelError::validation(format!("unknown actor '{name}'")))
    }

    /// Borrow an actor.
    pub fn get(&self, id: ActorId) -> GrafelResult<&Actor> {
        self.actors
            .get(id.0)
            .ok_or_else(|| GrafelError::validation(format!("unknown actor id {id}")))
    }

    /// Mutably borrow an actor.
    pub fn get_mut(&mut self, id: ActorId) -> GrafelResult<&mut Actor> {
        self.actors
            .get_mut(id.0)
            .ok_or_else(|| GrafelError::validation(format!("unknown actor id {id}")))
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        (0..self.actors.len()).map(ActorId)
    }

    /// All actors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter().enumerate().map(|(i, a)| (ActorId(i), a))
    }

    /// Attach `child` under `parent`.
    ///
    /// Rejects self-parenting, a child that already has a parent, and links that would make
    /// `parent` a descendant of `child`.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) -> GrafelResult<()> {
        self.get(parent)?;
        let child_name = self.get(child)?.name().to_owned();
        if parent == child {
            return Err(GrafelError::validation(format!(
                "actor '{child_name}' cannot be its own child"
            )));
        }
        if let Some(existing) = self.get(child)?.parent {
            return Err(GrafelError::validation(format!(
                "actor '{child_name}' already has parent '{}'",
                self.get(existing)?.name()
            )));
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(GrafelError::validation(format!(
                    "attaching '{child_name}' would create a cycle"
                )));
            }
            cursor = self.get(id)?.parent;
        }

        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Sum of the positions of every ancestor of `id`.
    pub fn offset(&self, id: ActorId) -> GrafelResult<Vector> {
        let mut offset = Vector::ZERO;
        let mut cursor = self.get(id)?.parent;
        while let Some(parent) = cursor {
            let actor = self.get(parent)?;
            offset += actor.position();
            cursor = actor.parent;
        }
        Ok(offset)
    }

    /// Position of `id` in canvas coordinates.
    pub fn absolute_position(&self, id: ActorId) -> GrafelResult<Vector> {
        Ok(self.offset(id)? + self.get(id)?.position())
    }

    /// Restore the construction-time state of `id` and all of its descendants.
    pub fn reset(&mut self, id: ActorId) -> GrafelResult<()> {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let actor = self.get_mut(id)?;
            actor.reset();
            stack.extend(actor.children.iter().copied());
        }
        Ok(())
    }

    /// Reset every actor.
    pub fn reset_all(&mut self) {
        for actor in &mut self.actors {
            actor.reset();
        }
    }

    /// Insert a dice actor together with its face children.
    ///
    /// `dice` must carry a [`Shape::Dice`]. The face is a rounded square `<name>.border` in the
    /// dice's color, followed by dots `<name>.dot1` .. `<name>.dotN` laid out on a
    /// quarter/third grid. Children stay on stage; the dice's own level decides visibility.
    pub fn insert_dice(&mut self, dice: Actor) -> GrafelResult<ActorId> {
        let Shape::Dice { side, num } = *dice.shape() else {
            return Err(GrafelError::validation(format!(
                "actor '{}' is not a dice",
                dice.name()
            )));
        };
        let color = dice.initial().color;
        let name = dice.name().to_owned();
        let id = self.insert(dice)?;

        let border = Actor::new(
            format!("{name}.border"),
            Shape::RoundRect {
                width: side,
                height: side,
                radius: (side / 10.0).floor(),
            },
        )
        .with_color(color);
        let border_id = self.insert(border)?;
        self.add_child(id, border_id)?;

        let radius = if num == 1 {
            (side / 5.0).floor()
        } else {
            (side / 10.0).floor()
        };
        for (i, pos) in dice_layout(side, num).into_iter().enumerate() {
            let dot = Actor::new(format!("{name}.dot{}", i + 1), Shape::Circle { radius })
                .with_position(pos)
                .with_color(Color::DIMGRAY);
            let dot_id = self.insert(dot)?;
            self.add_child(id, dot_id)?;
        }
        Ok(id)
    }
}

impl std::ops::Index<ActorId> for Cast {
    type Output = Actor;

    fn index(&self, id: ActorId) -> &Actor {
        &self.actors[id.0]
    }
}

fn dice_layout(side: f64, num: u8) -> Vec<Vector> {
    let q = (side / 4.0).floor();
    let t = (side / 3.0).floor();
    let v = Vector::new;
    match num {
        1 => vec![v(0.0, 0.0)],
        2 => vec![v(0.0, -q), v(0.0, q)],
        3 => vec![v(q, -q), v(0.0, 0.0), v(-q, q)],
        4 => vec![v(-q, -q), v(q, -q), v(-q, q), v(q, q)],
        5 => vec![v(-q, -q), v(q, -q), v(0.0, 0.0), v(-q, q), v(q, q)],
        _ => vec![
            v(-q, -t),
            v(-q, 0.0),
            v(-q, t),
            v(q, -t),
            v(q, 0.0),
            v(q, t),
        ],
    }
}
