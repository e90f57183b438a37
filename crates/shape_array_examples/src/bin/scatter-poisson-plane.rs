use glam::Vec2;
use shape_array::prelude::*;
use shape_array_examples::{init_tracing, Canvas, MarkerStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new();
    let container = scene.create_container();
    let config = GeneratorConfig::default()
        .with_initial_count(120)
        .with_seed(7);
    let shape = ShapeParams::Scatter(ScatterShape {
        bound: ScatterBound::Plane {
            size: Vec2::splat(40.0),
        },
        settings: ScatterSettings::new(2.5),
    });

    let mut generator = Generator::new(GeneratorId(0), container, shape, config)?;
    let mut events = VecSink::new();
    generator.refresh_with_events(&mut scene, &mut events);
    let first = generator.proxies().to_vec();

    // Growing keeps the first 120 points and adds new ones next to them.
    generator.set_count(220)?;
    let report = generator.refresh_with_events(&mut scene, &mut events);
    tracing::info!(
        elements = report.elements,
        fallback = report.fallback,
        "scatter grown"
    );
    for event in events.as_slice() {
        if let ArrayEvent::ScatterFallback { sampled, target, .. } = event {
            tracing::warn!(sampled, target, "separation could not be kept");
        }
    }

    let mut canvas = Canvas::new(RenderConfig::new((800, 800), Vec2::splat(42.0)));
    canvas
        .draw(&generator.proxies()[first.len()..], MarkerStyle::disc([220, 120, 30], 6))
        .draw(&first, MarkerStyle::disc([30, 110, 200], 6));
    canvas.save("scatter-poisson-plane.png")?;

    generator.rescatter()?;
    generator.refresh(&mut scene);
    let mut reseeded = Canvas::new(RenderConfig::new((800, 800), Vec2::splat(42.0)));
    reseeded.draw(generator.proxies(), MarkerStyle::disc([30, 160, 90], 6));
    reseeded.save("scatter-poisson-plane-reseeded.png")?;
    Ok(())
}
