use shape_array::prelude::*;
use shape_array::sampling::seed_for_element;

fn main() -> anyhow::Result<()> {
    shape_array_examples::init_tracing();

    let mut scene = MemoryScene::new();
    let container = scene.create_container();
    let config = GeneratorConfig::default().with_seed(seed_for_element(1, 0, 0));

    let mut generator = Generator::new(
        GeneratorId(0),
        container,
        ShapeKind::ScatterBox.default_params(),
        config,
    )?;
    generator.set_count(40)?;
    generator.add_modifier(ModifierParams::RandomRotation(RandomRotation::default()), None)?;
    generator.refresh(&mut scene);
    generator.save(&mut scene)?;
    println!("{}", to_ron(&generator.state())?);

    // The host keeps the elements; a new generator adopts them.
    let mut resumed = Generator::resume(GeneratorId(1), container, config, &scene, &scene)?
        .ok_or_else(|| anyhow::anyhow!("no record stored for container"))?;
    let report = resumed.refresh(&mut scene);
    anyhow::ensure!(report.created == 0, "resume recreated elements");
    anyhow::ensure!(
        resumed.proxies() == generator.proxies(),
        "resumed transforms differ"
    );
    tracing::info!(elements = report.elements, "resumed without churn");
    Ok(())
}
