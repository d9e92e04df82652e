use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "grafel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn canvas() -> Canvas {
    Canvas {
        width: 200,
        height: 100,
    }
}

fn one_frame(draw: impl FnOnce(&mut SvgBackend)) -> String {
    let mut backend = SvgBackend::new(canvas(), Color::BLACK);
    backend.clear(0).unwrap();
    draw(&mut backend);
    backend.end().unwrap();
    let mut frames = backend.take_frames();
    assert_eq!(frames.len(), 1);
    frames.remove(0).svg
}

#[test]
fn frame_has_header_and_background() {
    let svg = one_frame(|_| {});
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"width="200" height="100" viewBox="0 0 200 100""#));
    assert!(svg.contains(r##"<rect x="0" y="0" width="200" height="100" fill="#000000"/>"##));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn shapes_become_elements() {
    let svg = one_frame(|b| {
        b.rect(
            Vector::new(10.0, 20.0),
            Vector::new(30.0, 40.0),
            Paint::solid(Color::WHITE),
        )
        .unwrap();
        b.circle(Vector::new(50.0, 50.0), 12.5, Paint::new(Color::SILVER, 0.5))
            .unwrap();
    });
    assert!(svg.contains(r##"<rect x="10" y="20" width="30" height="40" fill="#ffffff"/>"##));
    assert!(svg.contains(
        r##"<circle cx="50" cy="50" r="12.5" fill="#c0c0c0" fill-opacity="0.5"/>"##
    ));
}

#[test]
fn numbers_are_rounded_to_three_decimals() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(0.33333), "0.333");
    assert_eq!(num(-0.0001), "0");
}

#[test]
fn text_is_escaped() {
    let svg = one_frame(|b| {
        b.text(
            Vector::new(5.0, 5.0),
            "a < b & \"c\"",
            32.0,
            Paint::solid(Color::WHITE),
        )
        .unwrap();
    });
    assert!(svg.contains(">a &lt; b &amp; &quot;c&quot;</text>"));
    assert!(svg.contains(r#"font-size="32""#));
}

#[test]
fn polygons_are_closed_paths() {
    let path = polygon_path(
        Vector::new(0.0, 0.0),
        &[Vector::new(10.0, 0.0), Vector::new(0.0, 10.0)],
    );
    let bbox = kurbo::Shape::bounding_box(&path);
    assert_eq!((bbox.x1, bbox.y1), (10.0, 10.0));

    let svg = one_frame(|b| {
        b.polygon(
            Vector::new(0.0, 0.0),
            &[Vector::new(10.0, 0.0), Vector::new(0.0, 10.0)],
            Paint::solid(Color::WHITE),
        )
        .unwrap();
    });
    assert!(svg.contains(r#"<path d="M"#));
    assert!(svg.contains('Z'));
}

#[test]
fn directory_backend_writes_numbered_files() {
    let dir = temp_dir("svg_dir");
    let mut backend = SvgBackend::in_dir(canvas(), Color::BLACK, &dir);
    for frame in 0..2 {
        backend.clear(frame).unwrap();
        backend
            .line(
                Vector::ZERO,
                Vector::new(10.0, 10.0),
                Paint::solid(Color::WHITE),
            )
            .unwrap();
        backend.end().unwrap();
    }
    assert_eq!(backend.written().len(), 2);
    assert!(backend.take_frames().is_empty());
    let first = std::fs::read_to_string(dir.join("frame_00000.svg")).unwrap();
    assert!(first.contains("<line "));
    assert!(dir.join("frame_00001.svg").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_bitmap_is_an_error() {
    let mut backend = SvgBackend::new(canvas(), Color::BLACK);
    backend.clear(0).unwrap();
    let err = backend
        .bitmap(
            Vector::ZERO,
            Path::new("definitely/not/here.png"),
            Vector::new(1.0, 1.0),
            1.0,
        )
        .unwrap_err();
    assert!(matches!(err, GrafelError::Render(_)));
}

#[test]
fn bitmap_is_copied_next_to_frames() {
    let dir = temp_dir("svg_bitmap");
    std::fs::create_dir_all(&dir).unwrap();
    let src = dir.join("src.png");
    image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
        .save(&src)
        .unwrap();

    let out = dir.join("out");
    let mut backend = SvgBackend::in_dir(canvas(), Color::BLACK, &out);
    backend.clear(0).unwrap();
    backend
        .bitmap(Vector::new(10.0, 10.0), &src, Vector::new(1.0, 1.0), 0.5)
        .unwrap();
    backend.end().unwrap();

    assert!(out.join("src.png").exists());
    let svg = std::fs::read_to_string(out.join("frame_00000.svg")).unwrap();
    assert!(svg.contains(
        r#"<image x="8" y="9" width="4" height="2" xlink:href="src.png" opacity="0.5"/>"#
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

fn write_image(path: &Path, w: u32, h: u32, rgba: [u8; 4]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
        .save(path)
        .unwrap();
}

#[test]
fn bitmaps_sharing_a_file_name_get_distinct_copies() {
    let dir = temp_dir("svg_bitmap_names");
    let red = dir.join("a").join("logo.png");
    let blue = dir.join("b").join("logo.png");
    write_image(&red, 2, 2, [255, 0, 0, 255]);
    write_image(&blue, 2, 2, [0, 0, 255, 255]);

    let out = dir.join("out");
    let one = Vector::new(1.0, 1.0);
    let mut backend = SvgBackend::in_dir(canvas(), Color::BLACK, &out);
    for frame in 0..2 {
        backend.clear(frame).unwrap();
        backend.bitmap(Vector::new(10.0, 10.0), &red, one, 1.0).unwrap();
        backend.bitmap(Vector::new(20.0, 10.0), &blue, one, 1.0).unwrap();
        backend.end().unwrap();
    }

    for frame in ["frame_00000.svg", "frame_00001.svg"] {
        let svg = std::fs::read_to_string(out.join(frame)).unwrap();
        assert!(svg.contains(r#"xlink:href="logo.png""#), "{svg}");
        assert!(svg.contains(r#"xlink:href="1_logo.png""#), "{svg}");
    }
    let copied = |name: &str| image::open(out.join(name)).unwrap().to_rgba8().get_pixel(0, 0).0;
    assert_eq!(copied("logo.png"), [255, 0, 0, 255]);
    assert_eq!(copied("1_logo.png"), [0, 0, 255, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bitmap_size_follows_scale() {
    let dir = temp_dir("svg_bitmap_scale");
    let src = dir.join("src.png");
    write_image(&src, 4, 2, [0, 255, 0, 255]);

    let svg = one_frame(|b| {
        b.bitmap(Vector::new(10.0, 10.0), &src, Vector::new(2.0, 0.5), 1.0)
            .unwrap();
    });
    assert!(svg.contains(r#"x="6" y="9.5" width="8" height="1""#), "{svg}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn draw_outside_frame_is_rejected() {
    let mut backend = SvgBackend::new(canvas(), Color::BLACK);
    assert!(backend
        .circle(Vector::ZERO, 1.0, Paint::solid(Color::WHITE))
        .is_err());
    assert!(backend.end().is_err());
}
