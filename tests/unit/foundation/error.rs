use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GrafelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GrafelError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert_eq!(
        GrafelError::unknown_action("Teleport").to_string(),
        "unknown action kind 'Teleport'"
    );
    assert_eq!(
        GrafelError::parse(3, 7, "expected vector").to_string(),
        "parse error at line 3, column 7: expected vector"
    );
}

#[test]
fn out_of_interval_names_bounds() {
    let err = GrafelError::OutOfInterval {
        frame: 11,
        lower: 5,
        upper: 10,
    };
    assert_eq!(err.to_string(), "frame 11 is outside interval [5, 10]");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GrafelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
