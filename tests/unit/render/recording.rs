use super::*;
use crate::foundation::color::Color;
use crate::foundation::core::Canvas;

#[test]
fn calls_are_kept_in_order() {
    let mut b = RecordingBackend::new();
    let paint = Paint::solid(Color::WHITE);
    b.clear(7).unwrap();
    b.circle(Vector::new(1.0, 2.0), 3.0, paint).unwrap();
    b.text(Vector::ZERO, "hi", 12.0, paint).unwrap();
    b.end().unwrap();

    assert_eq!(
        b.calls(),
        &[
            DrawCall::Clear { frame: 7 },
            DrawCall::Circle {
                center: Vector::new(1.0, 2.0),
                radius: 3.0,
                paint
            },
            DrawCall::Text {
                anchor: Vector::ZERO,
                text: "hi".to_owned(),
                font_size: 12.0,
                paint
            },
            DrawCall::End,
        ]
    );
    assert_eq!(b.take().len(), 4);
    assert!(b.calls().is_empty());
}

#[test]
fn calls_outside_a_frame_fail() {
    let mut b = RecordingBackend::new();
    assert!(b.line(Vector::ZERO, Vector::ZERO, Paint::solid(Color::WHITE)).is_err());
    b.clear(0).unwrap();
    b.end().unwrap();
    assert!(b.end().is_err());
}

#[test]
fn grid_draws_inner_lines_at_quarter_opacity() {
    let mut b = RecordingBackend::new();
    b.clear(0).unwrap();
    b.grid(
        Canvas {
            width: 120,
            height: 50,
        },
        50,
        Color::WHITE,
    )
    .unwrap();
    b.end().unwrap();

    let lines: Vec<_> = b
        .calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::Line { from, to, paint } => Some((*from, *to, paint.opacity)),
            _ => None,
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            (Vector::new(50.0, 0.0), Vector::new(50.0, 50.0), 0.25),
            (Vector::new(100.0, 0.0), Vector::new(100.0, 50.0), 0.25),
        ]
    );
}
