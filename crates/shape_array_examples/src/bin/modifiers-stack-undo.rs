use glam::{Vec2, Vec3};
use shape_array::prelude::*;
use shape_array_examples::{init_tracing, Canvas, MarkerStyle, RenderConfig};

fn snapshot(generator: &Generator, name: &str) -> anyhow::Result<()> {
    let mut canvas = Canvas::new(RenderConfig::new((600, 600), Vec2::splat(18.0)));
    canvas.draw(generator.defaults(), MarkerStyle::disc([200, 200, 200], 4));
    canvas.draw(generator.proxies(), MarkerStyle::disc([40, 90, 190], 4).with_facing());
    canvas.save(format!("modifiers-stack-undo-{name}.png"))
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new();
    let container = scene.create_container();
    let mut session = Session::default();
    let id = session.create(container, ShapeKind::Circle.default_params())?;

    let mut log = FnSink::new(|event: ArrayEvent| tracing::debug!(?event, "array event"));

    {
        let generator = session.get_mut(id)?;
        generator.set_count(24)?;
        generator.add_modifier(ModifierParams::FollowCurve(FollowCurve::default()), None)?;
        generator.add_modifier(
            ModifierParams::RadialNoise(RadialNoise {
                min: -0.8,
                max: 1.6,
            }),
            None,
        )?;
        generator.add_modifier(
            ModifierParams::IncrementalScale(IncrementalScale {
                target: Vec3::splat(2.0),
            }),
            None,
        )?;
    }
    session.refresh_all(&mut scene, &mut log);
    snapshot(session.get(id)?, "stacked")?;

    let noise = session.get(id)?.modifiers().ids()[1];
    session.get_mut(id)?.randomize_modifier(noise)?;
    session.refresh_all(&mut scene, &mut log);
    snapshot(session.get(id)?, "randomized")?;

    while let Some(label) = session.undo()? {
        tracing::info!(%label, "undone");
        if session.get(id)?.modifiers().is_empty() {
            break;
        }
    }
    session.refresh_all(&mut scene, &mut log);
    snapshot(session.get(id)?, "undone")?;

    let removed = session.get_mut(id)?.set_kind(ShapeKind::Line);
    tracing::info!(removed = removed.len(), "switched to line");
    Ok(())
}
