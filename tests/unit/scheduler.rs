use super::*;
use crate::action::ActionKind;
use crate::action::ease::MotionCurve;
use crate::actor::model::{Actor, Level, Shape};
use crate::foundation::color::Color;
use crate::foundation::core::{Interval, Vector};

fn cast_with(names: &[&str]) -> (Cast, Vec<ActorId>) {
    let mut cast = Cast::new();
    let ids = names
        .iter()
        .map(|n| cast.insert(Actor::new(*n, Shape::Square { side: 10.0 })).unwrap())
        .collect();
    (cast, ids)
}

fn moving(actor: ActorId, lower: u64, upper: u64, x: f64, y: f64) -> Action {
    Action::new(
        actor,
        Interval::new(lower, upper).unwrap(),
        ActionKind::motion(MotionCurve::Move, Vector::new(x, y)),
    )
}

#[test]
fn next_advances_frame_counter() {
    let (mut cast, _) = cast_with(&[]);
    let mut s = Scheduler::new();
    assert_eq!(s.frame(), 0);
    assert_eq!(s.next(&mut cast).unwrap(), 1);
    assert_eq!(s.next(&mut cast).unwrap(), 2);
    assert!(s.is_empty());
}

#[test]
fn overlapping_actions_activate_and_retire_in_order() {
    let (mut cast, ids) = cast_with(&["a", "b"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 0, 5, 10.0, 0.0));
    s.add_action(moving(ids[1], 6, 10, 10.0, 0.0));
    s.add_action(Action::new(
        ids[0],
        Interval::new(8, 11).unwrap(),
        ActionKind::blink(),
    ));

    let mut counts = vec![s.active_count()];
    for _ in 0..15 {
        s.next(&mut cast).unwrap();
        counts.push(s.active_count());
    }
    assert_eq!(counts, vec![0, 1, 1, 1, 1, 1, 0, 1, 1, 2, 2, 1, 0, 0, 0, 0]);
}

#[test]
fn overlap_regression_sequence() {
    let (mut cast, ids) = cast_with(&["a", "b"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 5, 10, 1.0, 0.0));
    s.add_action(Action::new(
        ids[1],
        Interval::new(8, 12).unwrap(),
        ActionKind::fade_out(),
    ));

    let mut counts = vec![s.active_count()];
    for _ in 0..15 {
        s.next(&mut cast).unwrap();
        counts.push(s.active_count());
    }
    assert_eq!(counts, vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 2, 2, 1, 1, 0, 0, 0]);
}

#[test]
fn start_and_first_step_share_a_call() {
    let (mut cast, ids) = cast_with(&["bob"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 1, 14, 100.0, 0.0));

    s.next(&mut cast).unwrap();
    assert_eq!(cast[ids[0]].position().x, 0.0);
    let mut xs = Vec::new();
    for _ in 1..=14 {
        s.next(&mut cast).unwrap();
        xs.push(cast[ids[0]].position().x);
    }
    assert!((xs[0] - 100.0 / 13.0).abs() < 1e-9);
    assert_eq!(xs[12], 100.0, "reaches target on frame 13");
    assert_eq!(xs[13], 100.0);
    assert_eq!(s.active_count(), 0);
}

#[test]
fn two_actors_move_independently() {
    let (mut cast, _) = cast_with(&[]);
    let a = cast
        .insert(Actor::new("faller", Shape::Circle { radius: 5.0 }).at(100.0, 0.0))
        .unwrap();
    let b = cast
        .insert(Actor::new("mover", Shape::Circle { radius: 5.0 }))
        .unwrap();
    let mut s = Scheduler::new();
    s.add_action(Action::new(
        a,
        Interval::new(0, 5).unwrap(),
        ActionKind::motion(MotionCurve::Fall, Vector::new(100.0, 300.0)),
    ));
    s.add_action(moving(b, 0, 5, 100.0, 100.0));

    let want_fall = [12.0, 48.0, 108.0, 192.0, 300.0];
    for (i, want) in want_fall.iter().enumerate() {
        s.next(&mut cast).unwrap();
        let step = (i + 1) as f64 * 20.0;
        assert!((cast[a].position().y - want).abs() < 1e-9);
        assert_eq!(cast[a].position().x, 100.0);
        assert_eq!(cast[b].position(), Vector::new(step, step));
    }
}

#[test]
fn back_to_back_actions_never_meet() {
    let (mut cast, ids) = cast_with(&["bob"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 0, 2, 30.0, 0.0));
    s.add_action(moving(ids[0], 3, 5, 30.0, 60.0));
    assert!(s.conflicts().is_empty());
    for _ in 0..6 {
        s.next(&mut cast).unwrap();
        assert!(s.active_count() <= 1);
    }
    assert_eq!(cast[ids[0]].position(), Vector::new(30.0, 60.0));
}

#[test]
fn conflicts_report_shared_fields() {
    let (_, ids) = cast_with(&["bob", "amy"]);
    let mut s = Scheduler::new();
    let first = s.add_action(moving(ids[0], 0, 10, 1.0, 1.0));
    s.add_action(Action::new(
        ids[0],
        Interval::new(2, 4).unwrap(),
        ActionKind::colorize(Color::WHITE),
    ));
    let third = s.add_action(Action::new(
        ids[0],
        Interval::new(5, 6).unwrap(),
        ActionKind::enter(Vector::ZERO),
    ));
    s.add_action(moving(ids[1], 0, 10, 1.0, 1.0));

    let conflicts = s.conflicts();
    assert_eq!(
        conflicts,
        vec![Conflict {
            first,
            second: third,
            actor: ids[0],
            field: Field::Position,
        }]
    );
}

#[test]
fn last_activated_writer_wins() {
    let (mut cast, ids) = cast_with(&["bob"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 0, 4, 100.0, 0.0));
    s.add_action(moving(ids[0], 0, 4, 0.0, 100.0));
    s.next(&mut cast).unwrap();
    assert_eq!(cast[ids[0]].position(), Vector::new(0.0, 25.0));
}

#[test]
fn actors_and_actions_keep_registration_order() {
    let (_, ids) = cast_with(&["a", "b"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[1], 0, 1, 0.0, 0.0));
    let id = s.add_action(moving(ids[0], 0, 1, 0.0, 0.0));
    s.add_action(moving(ids[1], 3, 4, 0.0, 0.0));
    assert_eq!(s.actors(), &[ids[1], ids[0]]);
    assert_eq!(s.len(), 3);
    assert_eq!(s.action(id).unwrap().actor(), ids[0]);
    assert_eq!(id.index(), 1);
}

#[test]
fn starts_follow_actor_registration_order() {
    let (mut cast, ids) = cast_with(&["a", "b"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[1], 0, 3, 5.0, 0.0));
    s.add_action(moving(ids[0], 0, 3, 5.0, 0.0));
    s.add_action(Action::new(
        ids[1],
        Interval::new(0, 3).unwrap(),
        ActionKind::blink(),
    ));
    s.next(&mut cast).unwrap();
    let order: Vec<_> = s.active_actions().map(|a| (a.actor(), a.name())).collect();
    assert_eq!(
        order,
        vec![(ids[1], "Move"), (ids[1], "Blink"), (ids[0], "Move")]
    );
}

#[test]
fn reset_is_idempotent_and_restores_state() {
    let (mut cast, ids) = cast_with(&["bob"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 0, 10, 100.0, 0.0));
    s.add_action(Action::new(
        ids[0],
        Interval::new(2, 3).unwrap(),
        ActionKind::exit(),
    ));

    let mut first = Vec::new();
    for _ in 0..6 {
        s.next(&mut cast).unwrap();
        first.push((cast[ids[0]].position(), cast[ids[0]].level()));
    }
    assert_eq!(cast[ids[0]].level(), Level::OffStage);

    s.reset(&mut cast).unwrap();
    s.reset(&mut cast).unwrap();
    assert_eq!(s.frame(), 0);
    assert_eq!(s.active_count(), 0);
    assert_eq!(cast[ids[0]].position(), Vector::ZERO);
    assert_eq!(cast[ids[0]].level(), Level::OnStage);

    let mut second = Vec::new();
    for _ in 0..6 {
        s.next(&mut cast).unwrap();
        second.push((cast[ids[0]].position(), cast[ids[0]].level()));
    }
    assert_eq!(first, second);
}

#[test]
fn timeline_lists_starts_per_frame() {
    let (cast, ids) = cast_with(&["bob", "amy"]);
    let mut s = Scheduler::new();
    s.add_action(moving(ids[0], 0, 5, 3.0, 4.0));
    s.add_action(Action::new(
        ids[1],
        Interval::single(7),
        ActionKind::fade_out(),
    ));
    s.add_action(Action::new(
        ids[1],
        Interval::single(70),
        ActionKind::fade_in(),
    ));
    let text = s.timeline(&cast, 10).unwrap();
    assert!(text.starts_with("--[scheduler: 2 actors, 3 actions]--"));
    assert!(text.contains("     0  bob: Move [0, 5] to Vector(3.000, 4.000)"));
    assert!(text.contains("     7  amy: FadeOut [7, 7]"));
    assert!(text.contains("(1 actions start after frame 10)"));
}
