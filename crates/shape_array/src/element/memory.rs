//! In-memory [`HostScene`] used by tests, benches and the demo binaries.
use std::collections::{BTreeMap, HashMap};

use glam::{Quat, Vec3};

use crate::element::{ElementHandle, HostScene};
use crate::modifier::{SurfaceHit, SurfaceQuery};
use crate::persistence::PersistenceSlot;
use crate::transform::TransformProxy;

/// One object of a [`MemoryScene`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemoryInstance {
    /// `None` for containers.
    pub parent: Option<ElementHandle>,
    pub transform: TransformProxy,
}

/// Flat scene graph with an optional ground plane.
///
/// Handles are issued in increasing order, so iterating the map yields
/// children in creation order.
#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    next: u64,
    instances: BTreeMap<ElementHandle, MemoryInstance>,
    records: HashMap<ElementHandle, String>,
    ground: Option<f32>,
    collider_offsets: HashMap<ElementHandle, f32>,
    created: usize,
    destroyed: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a horizontal surface at height `y` for ray queries.
    pub fn with_ground(mut self, y: f32) -> Self {
        self.ground = Some(y);
        self
    }

    pub fn set_ground(&mut self, y: Option<f32>) {
        self.ground = y;
    }

    /// Creates a root object that elements can be parented to.
    pub fn create_container(&mut self) -> ElementHandle {
        self.issue(None)
    }

    pub fn set_collider_offset(&mut self, handle: ElementHandle, offset: f32) {
        self.collider_offsets.insert(handle, offset);
    }

    pub fn instance(&self, handle: ElementHandle) -> Option<&MemoryInstance> {
        self.instances.get(&handle)
    }

    pub fn children(&self, container: ElementHandle) -> Vec<ElementHandle> {
        self.instances
            .iter()
            .filter(|(_, i)| i.parent == Some(container))
            .map(|(h, _)| *h)
            .collect()
    }

    /// Transforms of the children of `container`, in creation order.
    pub fn transforms(&self, container: ElementHandle) -> Vec<TransformProxy> {
        self.instances
            .values()
            .filter(|i| i.parent == Some(container))
            .map(|i| i.transform)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Total instances created and destroyed since construction.
    pub fn churn(&self) -> (usize, usize) {
        (self.created, self.destroyed)
    }

    fn issue(&mut self, parent: Option<ElementHandle>) -> ElementHandle {
        let handle = ElementHandle(self.next);
        self.next += 1;
        self.instances.insert(
            handle,
            MemoryInstance {
                parent,
                transform: TransformProxy::IDENTITY,
            },
        );
        handle
    }
}

impl HostScene for MemoryScene {
    fn create_instance(&mut self, container: ElementHandle) -> ElementHandle {
        self.created += 1;
        self.issue(Some(container))
    }

    fn destroy_instance(&mut self, handle: ElementHandle) {
        if self.instances.remove(&handle).is_some() {
            self.destroyed += 1;
        }
        self.collider_offsets.remove(&handle);
    }

    fn set_local_transform(
        &mut self,
        handle: ElementHandle,
        position: mint::Vector3<f32>,
        rotation: mint::Quaternion<f32>,
        scale: mint::Vector3<f32>,
    ) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            instance.transform = TransformProxy {
                position: Vec3::from(position),
                rotation: Quat::from(rotation),
                scale: Vec3::from(scale),
            };
        }
    }

    fn existing_children(&self, container: ElementHandle) -> Vec<ElementHandle> {
        self.children(container)
    }

    fn surface(&self) -> Option<&dyn SurfaceQuery> {
        self.ground.map(|_| self as &dyn SurfaceQuery)
    }
}

impl SurfaceQuery for MemoryScene {
    fn raycast_down(
        &self,
        origin: mint::Vector3<f32>,
        max_distance: f32,
        _layer_mask: u32,
    ) -> Vec<SurfaceHit> {
        let Some(ground) = self.ground else {
            return Vec::new();
        };
        let distance = origin.y - ground;
        if !(0.0..=max_distance).contains(&distance) {
            return Vec::new();
        }
        vec![SurfaceHit {
            point: mint::Vector3 {
                x: origin.x,
                y: ground,
                z: origin.z,
            },
            distance,
            owner: None,
        }]
    }

    fn collider_offset(&self, handle: ElementHandle) -> Option<f32> {
        self.collider_offsets.get(&handle).copied()
    }
}

impl PersistenceSlot for MemoryScene {
    fn store_record(&mut self, container: ElementHandle, record: String) {
        self.records.insert(container, record);
    }

    fn load_record(&self, container: ElementHandle) -> Option<String> {
        self.records.get(&container).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_are_listed_in_creation_order() {
        let mut scene = MemoryScene::new();
        let a = scene.create_container();
        let b = scene.create_container();
        let a0 = scene.create_instance(a);
        let _b0 = scene.create_instance(b);
        let a1 = scene.create_instance(a);
        assert_eq!(scene.existing_children(a), vec![a0, a1]);
        scene.destroy_instance(a0);
        assert_eq!(scene.existing_children(a), vec![a1]);
        assert_eq!(scene.churn(), (3, 1));
    }

    #[test]
    fn ground_answers_downward_rays() {
        let scene = MemoryScene::new().with_ground(1.0);
        let query = scene.surface().expect("ground");
        let hits = query.raycast_down(Vec3::new(2.0, 4.0, 0.0).into(), 10.0, u32::MAX);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, 3.0);
        assert!(query
            .raycast_down(Vec3::new(0.0, 0.5, 0.0).into(), 10.0, u32::MAX)
            .is_empty());
        assert!(MemoryScene::new().surface().is_none());
    }
}
