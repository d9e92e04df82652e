use super::ease::MotionCurve;
use super::registry::*;
use super::*;
use crate::actor::cast::Cast;
use crate::actor::model::Shape;

fn setup(actor: Actor) -> (Cast, ActorId) {
    let mut cast = Cast::new();
    let id = cast.insert(actor).unwrap();
    (cast, id)
}

fn bob() -> Actor {
    Actor::new("bob", Shape::Square { side: 50.0 })
}

/// Drive one action the way the scheduler does.
fn run(action: &mut Action, cast: &mut Cast, mut each: impl FnMut(u64, &Actor)) {
    let iv = action.interval();
    let id = action.actor();
    for f in iv.lower_bound()..=iv.upper_bound() {
        let actor = cast.get_mut(id).unwrap();
        if f == iv.lower_bound() {
            action.start(f, actor).unwrap();
        }
        action.step(f, actor).unwrap();
        if action.is_last(f).unwrap() {
            action.end(f, actor).unwrap();
        }
        each(f, &cast[id]);
    }
}

#[test]
fn move_reaches_target_linearly() {
    let (mut cast, id) = setup(bob());
    let mut a = Action::new(
        id,
        Interval::new(0, 5).unwrap(),
        ActionKind::motion(MotionCurve::Move, Vector::new(50.0, 0.0)),
    );
    let mut xs = Vec::new();
    run(&mut a, &mut cast, |_, actor| xs.push(actor.position().x));
    assert_eq!(xs, vec![10.0, 20.0, 30.0, 40.0, 50.0, 50.0]);
}

#[test]
fn fall_accelerates_quadratically() {
    let (mut cast, id) = setup(bob());
    let mut a = Action::new(
        id,
        Interval::new(0, 5).unwrap(),
        ActionKind::motion(MotionCurve::Fall, Vector::new(0.0, 100.0)),
    );
    let mut ys = Vec::new();
    run(&mut a, &mut cast, |_, actor| ys.push(actor.position().y));
    for (got, want) in ys.iter().zip([4.0, 16.0, 36.0, 64.0, 100.0, 100.0]) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }
}

#[test]
fn motion_is_relative_to_start_position() {
    let (mut cast, id) = setup(bob().at(100.0, 0.0));
    let mut a = Action::new(
        id,
        Interval::new(0, 4).unwrap(),
        ActionKind::motion(MotionCurve::Swing, Vector::new(100.0, 400.0)),
    );
    let mut ys = Vec::new();
    run(&mut a, &mut cast, |_, actor| ys.push(actor.position().y));
    assert_eq!(ys[1], 200.0);
    assert_eq!(cast[id].position(), Vector::new(100.0, 400.0));
}

#[test]
fn zero_length_interval_applies_final_value() {
    let (mut cast, id) = setup(bob());
    let mut a = Action::new(
        id,
        Interval::single(3),
        ActionKind::motion(MotionCurve::Land, Vector::new(7.0, 8.0)),
    );
    run(&mut a, &mut cast, |_, _| {});
    assert_eq!(cast[id].position(), Vector::new(7.0, 8.0));

    let mut fade = Action::new(id, Interval::single(3), ActionKind::fade_out());
    let mut seen = Vec::new();
    run(&mut fade, &mut cast, |_, actor| seen.push(actor.opacity()));
    assert_eq!(seen, vec![0.0]);
}

#[test]
fn colorize_rounds_channel_deltas() {
    let from = Color::parse("#0080ff").unwrap();
    let (mut cast, id) = setup(bob().with_color(from));
    let mut a = Action::new(
        id,
        Interval::new(0, 4).unwrap(),
        ActionKind::colorize(Color::parse("#ff9000").unwrap()),
    );
    let mut hex = Vec::new();
    run(&mut a, &mut cast, |_, actor| hex.push(actor.color().to_hex()));
    assert_eq!(hex, ["#4084bf", "#80887f", "#bf8c40", "#ff9000", "#ff9000"]);
}

#[test]
fn blink_uses_absolute_frame_parity_and_restores() {
    let red = Color::rgb(255, 0, 0);
    let (mut cast, id) = setup(bob().with_color(red));
    let mut a = Action::new(id, Interval::new(3, 6).unwrap(), ActionKind::blink());
    let mut seen = Vec::new();
    run(&mut a, &mut cast, |f, actor| seen.push((f, actor.color())));
    assert_eq!(seen[0], (3, red));
    assert_eq!(seen[1], (4, red.inverse()));
    assert_eq!(seen[2], (5, red));
    assert_eq!(seen[3], (6, red), "end restores the original color");
}

#[test]
fn fade_out_ramps_to_zero() {
    let (mut cast, id) = setup(bob());
    let mut a = Action::new(id, Interval::new(10, 15).unwrap(), ActionKind::fade_out());
    let mut seen = Vec::new();
    run(&mut a, &mut cast, |_, actor| seen.push(actor.opacity()));
    let want = [0.8, 0.6, 0.4, 0.2, 0.0, 0.0];
    for (got, want) in seen.iter().zip(want) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }
    assert!(seen.iter().all(|o| (0.0..=1.0).contains(o)));
}

#[test]
fn fade_in_starts_from_current_opacity() {
    let (mut cast, id) = setup(bob().with_opacity(0.5));
    let mut a = Action::new(id, Interval::new(0, 2).unwrap(), ActionKind::fade_in());
    let mut seen = Vec::new();
    run(&mut a, &mut cast, |_, actor| seen.push(actor.opacity()));
    assert_eq!(seen, vec![0.75, 1.0, 1.0]);
}

#[test]
fn enter_and_level_kinds() {
    let (mut cast, id) = setup(bob().with_level(Level::OffStage));
    let mut enter = Action::new(
        id,
        Interval::new(0, 1).unwrap(),
        ActionKind::enter(Vector::new(30.0, 40.0)),
    );
    run(&mut enter, &mut cast, |_, actor| {
        assert_eq!(actor.level(), Level::OnStage);
        assert_eq!(actor.position(), Vector::new(30.0, 40.0));
    });

    for (kind, level) in [
        (ActionKind::background(), Level::OnBackground),
        (ActionKind::foreground(), Level::OnForeground),
        (ActionKind::exit(), Level::OffStage),
    ] {
        let mut a = Action::new(id, Interval::single(2), kind);
        run(&mut a, &mut cast, |_, _| {});
        assert_eq!(cast[id].level(), level);
    }
}

#[test]
fn timer_formats_minutes_seconds_frames() {
    assert_eq!(timer_text(0), "00:00.00");
    assert_eq!(timer_text(24), "00:00.24");
    assert_eq!(timer_text(25), "00:01.00");
    assert_eq!(timer_text(1525), "01:01.00");

    let (mut cast, id) = setup(Actor::new("t", Shape::Text { font_size: 20.0 }));
    let mut a = Action::new(id, Interval::new(1520, 1525).unwrap(), ActionKind::Timer);
    let actor = cast.get_mut(id).unwrap();
    a.start(1520, actor).unwrap();
    assert_eq!(actor.text(), "00:00.00");
    run(&mut a, &mut cast, |_, _| {});
    assert_eq!(cast[id].text(), "01:01.00");
}

#[test]
fn calls_outside_interval_fail() {
    let (mut cast, id) = setup(bob());
    let mut a = Action::new(
        id,
        Interval::new(5, 8).unwrap(),
        ActionKind::motion(MotionCurve::Move, Vector::ZERO),
    );
    let actor = cast.get_mut(id).unwrap();
    assert!(matches!(
        a.start(4, actor),
        Err(GrafelError::OutOfInterval { frame: 4, .. })
    ));
    a.start(5, actor).unwrap();
    assert!(matches!(
        a.step(9, actor),
        Err(GrafelError::OutOfInterval { .. })
    ));
    assert!(a.end(12, actor).is_err());
    assert!(a.is_last(2).is_err());
}

#[test]
fn step_before_start_is_an_error() {
    let (mut cast, id) = setup(bob());
    let mut a = Action::new(id, Interval::new(0, 3).unwrap(), ActionKind::blink());
    assert!(a.step(1, cast.get_mut(id).unwrap()).is_err());
}

#[test]
fn fields_drive_conflict_detection() {
    assert_eq!(ActionKind::blink().fields(), &[Field::Color]);
    assert_eq!(
        ActionKind::enter(Vector::ZERO).fields(),
        &[Field::Position, Field::Level]
    );
    assert_eq!(ActionKind::Timer.fields(), &[Field::Text]);
}

#[test]
fn standard_registry_knows_every_kind() {
    let reg = ActionRegistry::standard();
    let names: Vec<_> = reg.names().collect();
    assert_eq!(names.len(), 15);
    for name in ["Move", "FALL", "easeIn", "Colorize", "timer", "Foreground"] {
        assert!(reg.contains(name), "{name}");
    }
}

#[test]
fn create_resolves_case_insensitively() {
    let reg = ActionRegistry::standard();
    let a = reg
        .create(
            "EaseOut",
            ActorId(0),
            Interval::new(0, 10).unwrap(),
            &[ActionArg::Vector(Vector::new(1.0, 2.0))],
        )
        .unwrap();
    assert_eq!(a.name(), "EaseOut");
    assert_eq!(a.to_string(), "EaseOut [0, 10] to Vector(1.000, 2.000)");
}

#[test]
fn create_rejects_unknown_kinds_and_bad_args() {
    let reg = ActionRegistry::standard();
    let iv = Interval::single(0);
    assert!(matches!(
        reg.create("teleport", ActorId(0), iv, &[]),
        Err(GrafelError::UnknownAction(name)) if name == "teleport"
    ));
    assert!(matches!(
        reg.create("move", ActorId(0), iv, &[]),
        Err(GrafelError::Validation(_))
    ));
    assert!(
        reg.create("colorize", ActorId(0), iv, &[ActionArg::Vector(Vector::ZERO)])
            .is_err()
    );
    assert!(
        reg.create("blink", ActorId(0), iv, &[ActionArg::Color(Color::WHITE)])
            .is_err()
    );
}

#[test]
fn register_rejects_duplicates() {
    fn spin(_: &[ActionArg]) -> GrafelResult<ActionKind> {
        Ok(ActionKind::blink())
    }

    let mut reg = ActionRegistry::standard();
    assert!(reg.register("Move", spin).is_err());
    reg.register("Spin", spin).unwrap();
    assert!(reg.contains("spin"));
    assert!(ActionRegistry::new().names().next().is_none());
}
