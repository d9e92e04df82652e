use crate::actor::cast::{ActorId, Cast};
use crate::actor::model::{Actor, Level, Shape};
use crate::foundation::core::Vector;
use crate::foundation::error::GrafelResult;
use crate::render::backend::{DrawBackend, Paint};

/// Draw `id` and its descendants.
///
/// Children are drawn right after their parent, offset by the parent's absolute position and
/// with the parent's opacity multiplied in. Children whose own level is [`Level::OffStage`] are
/// skipped together with their subtree.
pub(crate) fn draw_actor(
    cast: &Cast,
    id: ActorId,
    backend: &mut dyn DrawBackend,
) -> GrafelResult<()> {
    let offset = cast.offset(id)?;
    let inherited = inherited_opacity(cast, id)?;
    draw_subtree(cast, id, offset, inherited, backend)
}

fn inherited_opacity(cast: &Cast, id: ActorId) -> GrafelResult<f64> {
    let mut opacity = 1.0;
    let mut cursor = cast.get(id)?.parent();
    while let Some(parent) = cursor {
        let actor = cast.get(parent)?;
        opacity *= actor.opacity();
        cursor = actor.parent();
    }
    Ok(opacity)
}

fn draw_subtree(
    cast: &Cast,
    id: ActorId,
    offset: Vector,
    inherited: f64,
    backend: &mut dyn DrawBackend,
) -> GrafelResult<()> {
    let actor = cast.get(id)?;
    let opacity = inherited * actor.opacity();
    let center = offset + actor.position();
    draw_shape(actor, center, opacity, backend)?;
    for &child in actor.children() {
        if cast.get(child)?.level() == Level::OffStage {
            continue;
        }
        draw_subtree(cast, child, center, opacity, backend)?;
    }
    Ok(())
}

fn draw_shape(
    actor: &Actor,
    center: Vector,
    opacity: f64,
    backend: &mut dyn DrawBackend,
) -> GrafelResult<()> {
    let state = actor.state();
    let paint = Paint::new(state.color, opacity);
    let scale = state.scale;
    let sized = |w: f64, h: f64| Vector::new(w, h).scale_by(scale);

    match actor.shape() {
        Shape::Group | Shape::Dice { .. } => Ok(()),
        Shape::Square { side } => {
            let size = sized(*side, *side);
            backend.rect(center - size / 2.0, size, paint)
        }
        Shape::Rect { width, height } => {
            let size = sized(*width, *height);
            backend.rect(center - size / 2.0, size, paint)
        }
        Shape::RoundRect {
            width,
            height,
            radius,
        } => {
            let size = sized(*width, *height);
            backend.round_rect(center - size / 2.0, size, *radius, paint)
        }
        Shape::Circle { radius } => backend.circle(center, radius * scale.x, paint),
        Shape::Star { radius } => {
            let points = star_points(*radius);
            draw_points(&points, center, scale, paint, backend)
        }
        Shape::Triangle { points } => draw_points(points, center, scale, paint, backend),
        Shape::Polygon { points } => draw_points(points, center, scale, paint, backend),
        Shape::Text { font_size } => {
            backend.text(center, &state.text, font_size * scale.y, paint)
        }
        Shape::Label { font_size } => {
            let font_size = font_size * scale.y;
            let size = label_box(&state.text, font_size);
            backend.outline_rect(center - size / 2.0, size, paint)?;
            backend.text(center, &state.text, font_size, paint)
        }
        Shape::Bitmap { path } => backend.bitmap(center, path, scale, opacity),
    }
}

/// Vertices of a five-pointed star, alternating outer and inner radius every 36 degrees.
pub(crate) fn star_points(radius: f64) -> Vec<Vector> {
    (1..=10)
        .map(|k| {
            let angle = f64::from(k * 36).to_radians();
            let r = if k % 2 == 1 { radius } else { radius / 2.0 };
            Vector::new(angle.sin() * r, angle.cos() * r)
        })
        .collect()
}

fn label_box(text: &str, font_size: f64) -> Vector {
    let chars = text.chars().count().max(1) as f64;
    Vector::new(chars * font_size * 0.6 + font_size, font_size * 1.5)
}

fn draw_points(
    points: &[Vector],
    center: Vector,
    scale: Vector,
    paint: Paint,
    backend: &mut dyn DrawBackend,
) -> GrafelResult<()> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    let mut prev = first.scale_by(scale);
    let offsets: Vec<Vector> = rest
        .iter()
        .map(|p| {
            let p = p.scale_by(scale);
            let d = p - prev;
            prev = p;
            d
        })
        .collect();
    backend.polygon(center + first.scale_by(scale), &offsets, paint)
}
