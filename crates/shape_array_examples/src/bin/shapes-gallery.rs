use glam::{UVec3, Vec2, Vec3};
use shape_array::prelude::*;
use shape_array_examples::{init_tracing, Canvas, MarkerStyle, Projection, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new();
    let config = GeneratorConfig::default().with_initial_count(24);

    let shapes = [
        (
            ShapeParams::Line(LineShape {
                start: Vec3::new(-18.0, 0.0, -16.0),
                offset: Vec3::new(1.5, 0.0, 0.0),
            }),
            [200, 40, 40],
        ),
        (
            ShapeParams::Grid(GridShape {
                plane: GridPlane::XZ,
                counts: UVec3::new(6, 1, 4),
                offset: Vec3::splat(1.5),
            }),
            [40, 120, 200],
        ),
        (ShapeKind::Circle.default_params(), [40, 160, 60]),
        (ShapeKind::Ellipse.default_params(), [160, 60, 160]),
        (
            ShapeParams::Path(BezierPath::new(vec![
                Vec3::new(-18.0, 0.0, 14.0),
                Vec3::new(-10.0, 0.0, 4.0),
                Vec3::new(-2.0, 0.0, 24.0),
                Vec3::new(6.0, 0.0, 14.0),
                Vec3::new(10.0, 0.0, 9.0),
                Vec3::new(14.0, 0.0, 18.0),
                Vec3::new(18.0, 0.0, 12.0),
            ])?),
            [220, 140, 20],
        ),
    ];

    let mut canvas = Canvas::new(
        RenderConfig::new((900, 900), Vec2::splat(44.0)).with_background([235, 235, 235]),
    );

    for (i, (shape, color)) in shapes.into_iter().enumerate() {
        let container = scene.create_container();
        let mut generator = Generator::new(GeneratorId(i as u32), container, shape, config)?;
        if generator.shape().supports(Capability::Tangent) {
            generator.add_modifier(ModifierParams::FollowCurve(FollowCurve::default()), None)?;
        }
        let report = generator.refresh(&mut scene);
        tracing::info!(kind = generator.kind().name(), elements = report.elements, "laid out");

        let mut style = MarkerStyle::disc(color, 5);
        if generator.shape().supports(Capability::Tangent) {
            style = style.with_facing();
        }
        canvas.draw(generator.proxies(), style);
    }
    canvas.save("shapes-gallery.png")?;

    let sphere_container = scene.create_container();
    let mut sphere = Generator::new(
        GeneratorId(99),
        sphere_container,
        ShapeParams::Sphere(SphereShape {
            sectors: 16,
            stacks: 8,
            ..Default::default()
        }),
        config,
    )?;
    sphere.refresh(&mut scene);
    tracing::info!(elements = sphere.elements().len(), "sphere laid out");

    let mut front = Canvas::new(
        RenderConfig::new((500, 500), Vec2::splat(14.0)).with_projection(Projection::Front),
    );
    front.draw(sphere.proxies(), MarkerStyle::disc([30, 30, 120], 4));
    front.save("shapes-gallery-sphere.png")?;
    Ok(())
}
