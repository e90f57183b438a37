//! Saving and resuming generators through a host persistence slot.
//!
//! Records are [`GeneratorState`] values encoded as RON and attached to the
//! generator's container by the host.
use crate::element::ElementHandle;
#[cfg(feature = "serde")]
use crate::element::HostScene;
#[cfg(feature = "serde")]
use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use crate::generator::{Generator, GeneratorConfig, GeneratorId, GeneratorState};

/// Opaque per-container record storage offered by the host.
pub trait PersistenceSlot {
    fn store_record(&mut self, container: ElementHandle, record: String);

    fn load_record(&self, container: ElementHandle) -> Option<String>;
}

/// Encodes a state as pretty RON.
#[cfg(feature = "serde")]
pub fn to_ron(state: &GeneratorState) -> Result<String> {
    ron::ser::to_string_pretty(state, ron::ser::PrettyConfig::default())
        .map_err(|e| Error::Persistence(e.to_string()))
}

#[cfg(feature = "serde")]
pub fn from_ron(text: &str) -> Result<GeneratorState> {
    ron::from_str(text).map_err(|e| Error::Persistence(e.to_string()))
}

#[cfg(feature = "serde")]
impl Generator {
    /// Writes the committed state into the slot of this generator's container.
    pub fn save(&self, slot: &mut dyn PersistenceSlot) -> Result<()> {
        let record = to_ron(&self.state())?;
        slot.store_record(self.container(), record);
        Ok(())
    }

    /// Resumes the generator saved for `container`, if the slot has one.
    ///
    /// Existing children of the container are adopted; the next
    /// [`Generator::refresh`] reconciles them against the saved count.
    pub fn resume(
        id: GeneratorId,
        container: ElementHandle,
        config: GeneratorConfig,
        host: &dyn HostScene,
        slot: &dyn PersistenceSlot,
    ) -> Result<Option<Self>> {
        let Some(record) = slot.load_record(container) else {
            return Ok(None);
        };
        let state = from_ron(&record)?;
        Generator::from_state(id, container, state, config, host).map(Some)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::element::MemoryScene;
    use crate::modifier::{ModifierParams, RandomRotation};
    use crate::sampling::{ScatterBound, ScatterSettings};
    use crate::shape::{BezierPath, ScatterShape, ShapeKind, ShapeParams};

    fn round_trip(shape: ShapeParams) {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let mut g = Generator::new(GeneratorId(0), container, shape, GeneratorConfig::default())
            .expect("valid");
        g.add_modifier(
            ModifierParams::RandomRotation(RandomRotation::default()),
            None,
        )
        .expect("supported");
        g.refresh(&mut scene);
        g.save(&mut scene).expect("saved");

        let resumed = Generator::resume(
            GeneratorId(1),
            container,
            GeneratorConfig::default(),
            &scene,
            &scene,
        )
        .expect("decoded")
        .expect("record present");
        assert_eq!(resumed.state(), g.state());
        assert_eq!(resumed.elements().handles(), g.elements().handles());
    }

    #[test]
    fn every_kind_persists() {
        for kind in ShapeKind::ALL {
            round_trip(kind.default_params());
        }
    }

    #[test]
    fn multi_segment_path_persists() {
        let mut path = BezierPath::default();
        path.push_segment(
            Vec3::new(10.0, 0.0, 4.0),
            Vec3::new(12.0, 0.0, 4.0),
            Vec3::new(14.0, 0.0, 0.0),
        );
        round_trip(ShapeParams::Path(path));
    }

    #[test]
    fn resumed_scatter_keeps_its_points() {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let shape = ShapeParams::Scatter(ScatterShape {
            bound: ScatterBound::Plane {
                size: Vec2::splat(20.0),
            },
            settings: ScatterSettings::new(1.5).with_seed(5),
        });
        let mut g = Generator::new(GeneratorId(0), container, shape, GeneratorConfig::default())
            .expect("valid");
        g.refresh(&mut scene);
        g.save(&mut scene).expect("saved");
        let before = scene.transforms(container);

        let mut resumed = Generator::resume(
            GeneratorId(0),
            container,
            GeneratorConfig::default(),
            &scene,
            &scene,
        )
        .expect("decoded")
        .expect("record present");
        let report = resumed.refresh(&mut scene);
        assert_eq!(report.created, 0);
        assert_eq!(scene.transforms(container), before);
    }

    #[test]
    fn missing_record_resumes_nothing() {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let resumed = Generator::resume(
            GeneratorId(0),
            container,
            GeneratorConfig::default(),
            &scene,
            &scene,
        )
        .expect("no error");
        assert!(resumed.is_none());
    }

    #[test]
    fn garbage_is_a_persistence_error() {
        assert!(matches!(from_ron("(nope"), Err(Error::Persistence(_))));
    }
}
