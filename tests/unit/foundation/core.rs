use super::*;

#[test]
fn interval_membership_is_inclusive() {
    let r = Interval::new(5, 10).unwrap();
    assert!(!r.contains(4));
    for f in 5..=10 {
        assert!(r.contains(f));
    }
    assert!(!r.contains(11));
}

#[test]
fn interval_is_last_only_at_upper_bound() {
    let r = Interval::new(5, 10).unwrap();
    assert!(matches!(
        r.is_last(4),
        Err(GrafelError::OutOfInterval {
            frame: 4,
            lower: 5,
            upper: 10
        })
    ));
    for f in 5..10 {
        assert!(!r.is_last(f).unwrap());
    }
    assert!(r.is_last(10).unwrap());
    assert!(r.is_last(11).is_err());
}

#[test]
fn interval_rejects_inverted_bounds() {
    assert!(matches!(
        Interval::new(10, 5),
        Err(GrafelError::Validation(_))
    ));
}

#[test]
fn single_frame_interval_has_no_steps() {
    let r = Interval::single(23);
    assert_eq!(r.lower_bound(), 23);
    assert_eq!(r.upper_bound(), 23);
    assert_eq!(r.num_steps(), 0);
    assert!(r.is_last(23).unwrap());
    assert_eq!(r.progress(23).unwrap(), 1.0);
}

#[test]
fn relative_frame_is_one_based() {
    let r = Interval::new(5, 10).unwrap();
    assert_eq!(r.num_steps(), 5);
    assert_eq!(r.relative_frame(5).unwrap(), 1);
    assert_eq!(r.relative_frame(10).unwrap(), 6);
    assert_eq!(r.progress(7).unwrap(), 0.6);
    assert_eq!(r.progress(10).unwrap(), 1.0);
}

#[test]
fn interval_overlap() {
    let a = Interval::new(5, 10).unwrap();
    assert!(a.overlaps(Interval::new(8, 12).unwrap()));
    assert!(a.overlaps(Interval::single(10)));
    assert!(!a.overlaps(Interval::new(11, 20).unwrap()));
    assert_eq!(Interval::starting_at(23, 45).unwrap(), Interval::new(23, 68).unwrap());
}

#[test]
fn vector_arithmetic() {
    let a = Vector::new(3.0, 4.0);
    let b = Vector::new(1.0, -2.0);
    assert_eq!(a + b, Vector::new(4.0, 2.0));
    assert_eq!(a - b, Vector::new(2.0, 6.0));
    assert_eq!(a * 2.0, Vector::new(6.0, 8.0));
    assert_eq!(a / 2.0, Vector::new(1.5, 2.0));
    assert_eq!(-a, Vector::new(-3.0, -4.0));
    let mut c = a;
    c += b;
    assert_eq!(c, Vector::new(4.0, 2.0));
}

#[test]
fn vector_equality_is_tolerant() {
    assert_eq!(Vector::new(0.1 + 0.2, 1.0), Vector::new(0.3, 1.0));
    assert_ne!(Vector::new(0.3001, 1.0), Vector::new(0.3, 1.0));
}

#[test]
fn vector_polar_access() {
    let v = Vector::new(3.0, 4.0);
    assert_eq!(v.magnitude(), 5.0);

    let longer = v.with_magnitude(10.0);
    assert_eq!(longer, Vector::new(6.0, 8.0));
    assert!((longer.angle() - v.angle()).abs() < 1e-9);

    let turned = Vector::new(2.0, 0.0).with_angle(std::f64::consts::FRAC_PI_2);
    assert_eq!(turned, Vector::new(0.0, 2.0));
    assert_eq!(turned.magnitude(), 2.0);
}

#[test]
fn vector_rounds_to_pixels() {
    assert_eq!(Vector::new(7.692, -0.5001).as_rounded(), (8, -1));
}

#[test]
fn canvas_parses_size_strings() {
    assert_eq!(
        Canvas::parse("640x360").unwrap(),
        Canvas {
            width: 640,
            height: 360
        }
    );
    assert!(Canvas::parse("640").is_err());
    assert!(Canvas::parse("0x10").is_err());
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(25, 0).is_err());
    assert_eq!(Fps::default().as_f64(), 25.0);
}
