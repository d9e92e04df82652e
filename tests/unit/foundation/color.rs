use super::*;

#[test]
fn named_colors_resolve() {
    assert_eq!(Color::parse("red").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::parse("Silver").unwrap(), Color::SILVER);
    assert_eq!(Color::parse("brown4").unwrap(), Color::rgb(139, 35, 35));
    assert!(Color::names().any(|n| n == "ghostgray"));
}

#[test]
fn hex_codes_resolve_case_insensitively() {
    assert_eq!(Color::parse("#0080FF").unwrap(), Color::rgb(0, 128, 255));
    assert_eq!(Color::parse("#32bf98").unwrap(), Color::rgb(50, 191, 152));
}

#[test]
fn malformed_colors_fail() {
    assert!(matches!(
        Color::parse("chartreuse-ish"),
        Err(GrafelError::Validation(_))
    ));
    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("#zz0000").is_err());
}

#[test]
fn inverse_flips_every_channel() {
    let c = Color::rgb(0, 128, 255);
    assert_eq!(c.inverse(), Color::rgb(255, 127, 0));
    assert_eq!(c.inverse().inverse(), c);
}

#[test]
fn hex_round_trip_is_lowercase() {
    let c = Color::parse("#4084BF").unwrap();
    assert_eq!(c.to_hex(), "#4084bf");
    assert_eq!(c.to_string(), "#4084bf");
    assert_eq!(Color::parse(&c.to_hex()).unwrap(), c);
}

#[test]
fn lerp_rounds_each_channel() {
    let from = Color::parse("#0080ff").unwrap();
    let to = Color::parse("#ff9000").unwrap();
    assert_eq!(from.lerp(to, 0.25).to_hex(), "#4084bf");
    assert_eq!(from.lerp(to, 0.5).to_hex(), "#80887f");
    assert_eq!(from.lerp(to, 0.75).to_hex(), "#bf8c40");
    assert_eq!(from.lerp(to, 1.0), to);
}

#[test]
fn serde_accepts_names_hex_and_arrays() {
    let c: Color = serde_json::from_str("\"gold\"").unwrap();
    assert_eq!(c, Color::rgb(255, 215, 0));
    let c: Color = serde_json::from_str("[1, 2, 3]").unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#010203\"");
}
