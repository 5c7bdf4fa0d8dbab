use cgmath::{InnerSpace, Vector2};
use stipple::data::{
    Color, Document, FillRule, LineCap, LineJoin, Paint, PaintStyle, Rgb, Shape, Transform,
};
use stipple::render::math::AxisScale;
use stipple::render::stroke_tess::{self, StrokeStyle};
use stipple::render::{
    RenderSettings, TessOptions, Tessellator, VertexBuffer, VertexBufferFactory,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stroke_only(width: f32) -> PaintStyle {
    PaintStyle::default()
        .with_fill(Paint::None)
        .with_stroke(Paint::Color(Rgb::BLACK))
        .with_stroke_width(width)
}

fn v(x: f32, y: f32) -> Vector2<f32> {
    Vector2::new(x, y)
}

fn distance_to_segment(p: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.magnitude2()).max(0.).min(1.);
    (p - (a + ab * t)).magnitude()
}

fn distance_to_path(p: Vector2<f32>, path: &[Vector2<f32>], closed: bool) -> f32 {
    let mut best = std::f32::INFINITY;
    for i in 0..path.len() - 1 {
        best = best.min(distance_to_segment(p, path[i], path[i + 1]));
    }
    if closed {
        best = best.min(distance_to_segment(p, path[path.len() - 1], path[0]));
    }
    best
}

fn stroke(
    points: &[Vector2<f32>],
    closed: bool,
    style: StrokeStyle,
    scale: AxisScale,
) -> (VertexBuffer, stroke_tess::StrokeSummary) {
    let mut buf = VertexBuffer::new();
    let summary = stroke_tess::stroke_path(
        &mut buf,
        points,
        closed,
        style,
        scale,
        false,
        &TessOptions::default(),
    );
    (buf, summary)
}

fn style(half_width: f32, linecap: LineCap, linejoin: LineJoin, miter_limit: f32) -> StrokeStyle {
    StrokeStyle {
        half_width,
        linecap,
        linejoin,
        miter_limit,
        color: Color::BLACK,
    }
}

#[test]
fn red_square_is_two_triangles() {
    init_logger();
    let shape = Shape::rect(0., 0., 10., 10.).with_paint(
        PaintStyle::default()
            .with_fill(Paint::Color(Rgb::RED))
            .with_fill_opacity(0.5),
    );
    let mut factory = VertexBufferFactory::default();
    let buffers = Tessellator::new()
        .tessellate(&shape, &RenderSettings::default(), &mut factory)
        .unwrap();

    assert_eq!(buffers.len(), 1);
    let buf = &buffers[0];
    assert!(buf.stencil.is_none());
    assert_eq!(buf.triangle_count(), 2);
    assert_eq!(buf.vertices.len(), 6);
    for vertex in &buf.vertices {
        assert_eq!(vertex.color, Rgb::RED.with_opacity(0.5));
    }
}

#[test]
fn butt_line_is_single_quad() {
    init_logger();
    let shape = Shape::line(0., 0., 10., 0.)
        .with_paint(stroke_only(2.).with_linecap(LineCap::Butt));
    let mut factory = VertexBufferFactory::default();
    let buffers = Tessellator::new()
        .tessellate(&shape, &RenderSettings::default(), &mut factory)
        .unwrap();

    assert_eq!(buffers.len(), 1);
    let buf = &buffers[0];
    assert_eq!(buf.triangle_count(), 2);
    let ys: Vec<f32> = buf.vertices.iter().map(|v| v.position.y).collect();
    let top = ys.iter().cloned().fold(std::f32::NEG_INFINITY, f32::max);
    let bottom = ys.iter().cloned().fold(std::f32::INFINITY, f32::min);
    assert!((top - bottom - 2.).abs() < 1e-5);
    assert!((top + bottom).abs() < 1e-5);
}

#[test]
fn circle_stroke_gets_finer_when_zoomed() {
    init_logger();
    let shape = Shape::circle(0., 0., 5.)
        .with_paint(stroke_only(1.).with_linejoin(LineJoin::Round));
    let tessellator = Tessellator::new();

    let mut counts = Vec::new();
    for &zoom in &[1., 4.] {
        let settings = RenderSettings::default().with_scale(zoom, zoom);
        let mut factory = VertexBufferFactory::default();
        let buffers = tessellator.tessellate(&shape, &settings, &mut factory).unwrap();
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].scale, Vector2::new(zoom, zoom));
        counts.push(buffers[0].triangle_count());
    }
    assert!(counts[1] >= counts[0]);
}

#[test]
fn closed_paths_join_every_vertex() {
    let hexagon: Vec<_> = (0..6)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::PI / 3.;
            v(angle.cos() * 10., angle.sin() * 10.)
        })
        .collect();
    for &linejoin in &[LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
        let (_, summary) = stroke(
            &hexagon,
            true,
            style(1., LineCap::Round, linejoin, 4.),
            AxisScale::new(1., 1.),
        );
        assert_eq!(summary.joins, 6);
        assert_eq!(summary.caps, 0);
    }
}

#[test]
fn open_paths_cap_both_ends() {
    let zigzag = [v(0., 0.), v(5., 5.), v(10., 0.), v(15., 5.), v(20., 0.)];
    for &linecap in &[LineCap::Butt, LineCap::Round, LineCap::Square] {
        let (_, summary) = stroke(
            &zigzag,
            false,
            style(1., linecap, LineJoin::Miter, 4.),
            AxisScale::new(1., 1.),
        );
        assert_eq!(summary.caps, 2);
        assert_eq!(summary.joins, 3);
    }

    // a closed path with only two points has nothing to wrap around
    let (_, summary) = stroke(
        &zigzag[..2],
        true,
        style(1., LineCap::Butt, LineJoin::Miter, 4.),
        AxisScale::new(1., 1.),
    );
    assert_eq!(summary.caps, 2);
    assert_eq!(summary.joins, 0);
}

#[test]
fn miter_degrades_exactly_past_the_limit() {
    let half_width = 1.;
    for step in 1..36 {
        let turn = step as f32 * 5f32.to_radians();
        let corner = std::f32::consts::PI - turn;
        let miter_distance = half_width / (corner / 2.).sin();
        let path = [v(-10., 0.), v(0., 0.), v(10. * turn.cos(), 10. * turn.sin())];

        for &limit in &[1., 1.5, 2., 4., 10.] {
            let bound = limit * half_width;
            if (miter_distance - bound).abs() < 1e-3 * bound {
                continue;
            }
            let (_, summary) = stroke(
                &path,
                false,
                style(half_width, LineCap::Butt, LineJoin::Miter, limit),
                AxisScale::new(1., 1.),
            );
            let expected = if miter_distance > bound { 1 } else { 0 };
            assert_eq!(
                summary.miter_fallbacks, expected,
                "turn {} limit {}",
                turn, limit
            );
        }
    }
}

#[test]
fn stroke_stays_within_its_width() {
    let paths: Vec<(Vec<Vector2<f32>>, bool)> = vec![
        (vec![v(0., 0.), v(10., 0.)], false),
        (vec![v(0., 0.), v(10., 0.), v(10., 10.), v(0., 10.)], true),
        (vec![v(0., 0.), v(10., 2.), v(0., 4.), v(8., 30.)], false),
        (vec![v(0., 0.), v(20., 0.), v(2., 3.)], true),
    ];
    let scales = [AxisScale::new(1., 1.), AxisScale::new(1., 3.)];
    let half_width = 1.5;

    for (path, closed) in &paths {
        for scale in &scales {
            for &linejoin in &[LineJoin::Round, LineJoin::Bevel] {
                for &linecap in &[LineCap::Butt, LineCap::Round] {
                    let (buf, summary) = stroke(
                        path,
                        *closed,
                        style(half_width, linecap, linejoin, 4.),
                        *scale,
                    );
                    assert!(summary.triangles > 0);
                    let bound = half_width * scale.max() + 1e-3;
                    for vertex in &buf.vertices {
                        let d = distance_to_path(vertex.xy(), path, *closed);
                        assert!(
                            d <= bound,
                            "{:?} is {} away from {:?} ({:?} {:?})",
                            vertex.xy(),
                            d,
                            path,
                            linejoin,
                            linecap
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn stroke_width_is_uniform_under_anisotropic_scale() {
    let scale = AxisScale::new(1., 4.);
    let st = style(1., LineCap::Butt, LineJoin::Miter, 4.);

    let (horizontal, _) = stroke(&[v(0., 0.), v(10., 0.)], false, st, scale);
    let (vertical, _) = stroke(&[v(0., 0.), v(0., 10.)], false, st, scale);

    let extent = |buf: &VertexBuffer, axis: usize| {
        let values: Vec<f32> = buf.vertices.iter().map(|v| v.position[axis]).collect();
        let max = values.iter().cloned().fold(std::f32::NEG_INFINITY, f32::max);
        let min = values.iter().cloned().fold(std::f32::INFINITY, f32::min);
        max - min
    };
    // thickness in output pixels
    let h = extent(&horizontal, 1) * 4.;
    let w = extent(&vertical, 0) * 1.;
    assert!((h - w).abs() < 1e-4, "{} vs {}", h, w);
}

#[test]
fn invisible_paint_produces_nothing() {
    init_logger();
    let tessellator = Tessellator::new();
    let settings = RenderSettings::default().with_anti_aliasing(true);
    let mut factory = VertexBufferFactory::default();

    let hidden = [
        Shape::rect(0., 0., 10., 10.).with_paint(PaintStyle::default().with_fill(Paint::None)),
        Shape::rect(0., 0., 10., 10.).with_paint(stroke_only(0.)),
        Shape::line(0., 0., 10., 10.).with_paint(PaintStyle::default()),
        Shape::circle(0., 0., 0.).with_paint(stroke_only(1.)),
        Shape::polyline(vec![v(1., 1.)]).with_paint(stroke_only(1.)),
    ];
    for shape in &hidden {
        let buffers = tessellator.tessellate(shape, &settings, &mut factory).unwrap();
        assert!(buffers.is_empty(), "{:?}", shape);
    }

    // fill none still draws the stroke, without any fill geometry
    let outlined = Shape::rect(0., 0., 10., 10.).with_paint(stroke_only(2.));
    let buffers = tessellator
        .tessellate(&outlined, &RenderSettings::default(), &mut factory)
        .unwrap();
    assert_eq!(buffers.len(), 1);
    assert_eq!(buffers[0].triangle_count(), 8);
}

#[test]
fn concave_polygons_use_a_stencil_buffer() {
    init_logger();
    let star = Shape::polygon(vec![v(0., 0.), v(10., 10.), v(10., 0.), v(0., 10.)]).with_paint(
        PaintStyle::default()
            .with_fill(Paint::Color(Rgb::from_u32(0x3366ff)))
            .with_fill_rule(FillRule::EvenOdd)
            .with_stroke(Paint::Color(Rgb::BLACK)),
    );
    let settings = RenderSettings::default().with_alpha(0.5);
    let mut factory = VertexBufferFactory::default();
    let buffers = Tessellator::new()
        .tessellate(&star, &settings, &mut factory)
        .unwrap();

    assert_eq!(buffers.len(), 2);
    let stencil = buffers[0].stencil.expect("first buffer should be a stencil fill");
    assert_eq!(stencil.rule, FillRule::EvenOdd);
    assert_eq!(buffers[0].cover_vertices().len(), 6);
    assert!(buffers[1].stencil.is_none());
    assert!(buffers[1].triangle_count() > 0);
    for buf in &buffers {
        assert_eq!(buf.alpha, 0.5);
    }
}

#[test]
fn buffers_carry_the_combined_transform() {
    let shape = Shape::circle(5., 6., 2.).with_transform(Transform::from_scale(2., 3.));
    let mut factory = VertexBufferFactory::default();
    let buffers = Tessellator::new()
        .tessellate(&shape, &RenderSettings::default(), &mut factory)
        .unwrap();
    assert_eq!(buffers.len(), 1);

    let expected = Transform::from_translation(5., 6.)
        .then(&Transform::from_scale(2., 3.))
        .to_matrix4();
    assert_eq!(buffers[0].transform, expected);

    // outline points are centered on the origin before the transform
    for vertex in &buffers[0].vertices {
        assert!(vertex.xy().magnitude() <= 2. + 1e-3);
    }
}

#[test]
fn documents_tessellate_in_paint_order() {
    init_logger();
    let document = Document::new(100., 100.)
        .with_shape(Shape::rect(0., 0., 100., 100.))
        .with_shape(Shape::line(0., 0., 100., 100.).with_paint(stroke_only(0.)))
        .with_shape(Shape::ellipse(50., 50., 20., 10.).with_paint(stroke_only(1.)));
    let settings = RenderSettings::fit(&document, 200., 100.).with_anti_aliasing(true);
    let mut factory = VertexBufferFactory::default();
    let buffers = Tessellator::new()
        .tessellate_document(&document, &settings, &mut factory)
        .unwrap();

    assert_eq!(buffers.len(), 2);
    assert_eq!(buffers[0].transform, Transform::identity().to_matrix4());
    assert!(buffers.iter().all(|buf| buf.clip == settings.clip));
    // the ellipse stroke fades out on both sides
    assert!(buffers[1].vertices.iter().any(|v| v.color.a == 0.));
}

#[test]
fn stroke_half_width_follows_the_local_axes() {
    use std::f32::consts::FRAC_PI_2;

    init_logger();
    let scale_then_rotate = Transform::from_scale(1., 5.).then(&Transform::from_rotation(FRAC_PI_2));
    let rotate_then_scale = Transform::from_rotation(FRAC_PI_2).then(&Transform::from_scale(1., 5.));

    for transform in &[scale_then_rotate, rotate_then_scale] {
        let shape = Shape::line(0., 0., 10., 0.)
            .with_paint(stroke_only(2.).with_linecap(LineCap::Butt))
            .with_transform(*transform);
        let mut factory = VertexBufferFactory::default();
        let buffers = Tessellator::new()
            .tessellate(&shape, &RenderSettings::default(), &mut factory)
            .unwrap();
        assert_eq!(buffers.len(), 1);

        let a = transform.transform_point(v(0., 0.));
        let b = transform.transform_point(v(10., 0.));
        let along = (b - a).normalize();
        for vertex in &buffers[0].vertices {
            // distance from the line in output pixels
            let p = transform.transform_point(vertex.xy());
            let distance = (p - a).perp_dot(along).abs();
            assert!((distance - 5.).abs() < 1e-3, "{:?}: {}", transform, distance);
        }
    }
}

#[test]
fn buffers_are_only_allocated_when_drawn() {
    init_logger();
    let bowtie = Shape::polygon(vec![v(0., 0.), v(10., 10.), v(10., 0.), v(0., 10.)]);
    let cases = [
        (bowtie.clone(), false, 1),
        (bowtie.clone(), true, 2),
        (bowtie.with_paint(stroke_only(1.)), false, 1),
        (Shape::rect(0., 0., 10., 10.), false, 1),
        (Shape::rect(0., 0., 10., 10.), true, 1),
        (Shape::line(0., 0., 10., 10.), true, 0),
    ];
    for (shape, anti_aliasing, expected) in &cases {
        let settings = RenderSettings::default().with_anti_aliasing(*anti_aliasing);
        let mut factory = VertexBufferFactory::default();
        let buffers = Tessellator::new()
            .tessellate(shape, &settings, &mut factory)
            .unwrap();
        assert_eq!(buffers.len(), *expected, "{:?}", shape);
        assert_eq!(factory.created, buffers.len(), "{:?}", shape);
        assert!(buffers.iter().all(|buf| buf.triangle_count() > 0));
    }
}

#[test]
fn anti_aliased_fill_does_not_overlap_its_fringe() {
    let shape = Shape::rect(0., 0., 10., 10.).with_paint(PaintStyle::default().with_fill_opacity(0.5));
    let settings = RenderSettings::default().with_anti_aliasing(true);
    let mut factory = VertexBufferFactory::default();
    let buffers = Tessellator::new()
        .tessellate(&shape, &settings, &mut factory)
        .unwrap();
    assert_eq!(buffers.len(), 1);

    // four fringe quads around a fan over the inset square
    assert_eq!(buffers[0].triangle_count(), 10);
    for vertex in buffers[0].vertices.iter().filter(|v| v.color.a > 0.) {
        let p = vertex.xy();
        assert!(p.x >= 0.5 - 1e-5 && p.x <= 9.5 + 1e-5, "{:?}", p);
        assert!(p.y >= 0.5 - 1e-5 && p.y <= 9.5 + 1e-5, "{:?}", p);
    }
}
