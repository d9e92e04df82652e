use super::*;

const SAMPLE: &str = "\
// demo
Cast:
    bob = Square side 50 pos 100x100 color red
    d = Dice num 3 pos 300x300
    tri = Triangle points (0x-10, 20x0, 0x10) alpha 0.5
    t = Label text \"hello\" fontsize 24
Actions:
    0-25 bob Move 400x300
    10+5 bob Colorize #ff8800
    30 bob Exit
";

fn parse_err(src: &str) -> (usize, usize, String) {
    match parse_script(src).unwrap_err() {
        GrafelError::Parse {
            line,
            column,
            message,
        } => (line, column, message),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn parses_cast_lines() {
    let script = parse_script(SAMPLE).unwrap();
    assert_eq!(script.cast.len(), 4);

    let bob = &script.cast[0];
    assert_eq!(bob.name, "bob");
    assert_eq!(bob.role, Role::Square);
    assert_eq!(
        bob.attrs,
        vec![
            Attr::Side(50.0),
            Attr::Pos(Vector::new(100.0, 100.0)),
            Attr::Color(Color::rgb(255, 0, 0)),
        ]
    );

    assert_eq!(script.cast[1].attrs[0], Attr::Num(3));
    assert_eq!(
        script.cast[2].attrs,
        vec![
            Attr::Points(vec![
                Vector::new(0.0, -10.0),
                Vector::new(20.0, 0.0),
                Vector::new(0.0, 10.0),
            ]),
            Attr::Alpha(0.5),
        ]
    );
    assert_eq!(
        script.cast[3].attrs,
        vec![Attr::Text("hello".into()), Attr::FontSize(24.0)]
    );
}

#[test]
fn parses_action_lines_and_intervals() {
    let script = parse_script(SAMPLE).unwrap();
    let intervals: Vec<_> = script.actions.iter().map(|a| a.interval).collect();
    assert_eq!(
        intervals,
        vec![
            Interval::new(0, 25).unwrap(),
            Interval::new(10, 15).unwrap(),
            Interval::single(30),
        ]
    );
    assert_eq!(script.actions[0].action, "Move");
    assert_eq!(
        script.actions[0].args,
        vec![ActionArg::Vector(Vector::new(400.0, 300.0))]
    );
    assert_eq!(
        script.actions[1].args,
        vec![ActionArg::Color(Color::rgb(255, 136, 0))]
    );
    assert!(script.actions[2].args.is_empty());
}

#[test]
fn section_line_may_share_the_header_row() {
    let script = parse_script("Cast: a = Circle\nActions: 1 a Exit").unwrap();
    assert_eq!(script.cast.len(), 1);
    assert_eq!(script.actions.len(), 1);
}

#[test]
fn empty_sections_are_allowed() {
    let script = parse_script("Cast:\nActions:\n").unwrap();
    assert!(script.cast.is_empty());
    assert!(script.actions.is_empty());
}

#[test]
fn syntax_errors_carry_line_and_column() {
    let (line, column, message) = parse_err("Cast:\n  bob = Hexagon\nActions:\n");
    assert_eq!((line, column), (2, 9));
    assert!(message.contains("unknown role 'Hexagon'"), "{message}");

    let (line, column, _) = parse_err("Cast:\n  bob = Square pos 10\nActions:\n");
    assert_eq!((line, column), (2, 22));

    let (line, _, message) = parse_err("Cast:\n  bob = Square color mauve\nActions:\n");
    assert_eq!(line, 2);
    assert!(message.contains("unknown color 'mauve'"));

    let (_, _, message) = parse_err("Cast:\n  bob = Square\n");
    assert!(message.contains("Actions"));

    let (line, column, _) = parse_err("bob = Square\n");
    assert_eq!((line, column), (1, 1));

    let (_, _, message) = parse_err("Cast:\n a = Dice num 7\nActions:\n");
    assert!(message.contains("between 1 and 6"));
}

#[test]
fn malformed_interval_is_a_validation_error() {
    let err = parse_script("Cast:\n a = Circle\nActions:\n 9-3 a Exit\n").unwrap_err();
    assert!(matches!(err, GrafelError::Validation(_)));
}
