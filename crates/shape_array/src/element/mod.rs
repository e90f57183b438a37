//! Host scene boundary and element set reconciliation.
//!
//! The crate never owns scene objects. It talks to the host through
//! [`HostScene`] and keeps an ordered list of the handles it created in an
//! [`ElementSet`]. Reconciliation only appends or truncates, so an element's
//! index never changes while it is alive.
use tracing::debug;

use crate::modifier::SurfaceQuery;
use crate::transform::TransformProxy;

pub mod memory;

pub use memory::{MemoryInstance, MemoryScene};

/// Opaque handle issued by the host for an instance or a container.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

/// Scene operations the engine needs from its host.
pub trait HostScene {
    /// Instantiates the container's element template as a child of `container`.
    fn create_instance(&mut self, container: ElementHandle) -> ElementHandle;

    fn destroy_instance(&mut self, handle: ElementHandle);

    fn set_local_transform(
        &mut self,
        handle: ElementHandle,
        position: mint::Vector3<f32>,
        rotation: mint::Quaternion<f32>,
        scale: mint::Vector3<f32>,
    );

    /// Children previously created under `container`, in creation order.
    fn existing_children(&self, container: ElementHandle) -> Vec<ElementHandle>;

    /// Ray queries for surface snapping, if the host has any colliders.
    fn surface(&self) -> Option<&dyn SurfaceQuery> {
        None
    }
}

/// Outcome of one [`ElementSet::reconcile`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub created: usize,
    pub destroyed: usize,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.destroyed == 0
    }
}

/// Ordered handles of the live elements under one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementSet {
    container: ElementHandle,
    handles: Vec<ElementHandle>,
}

impl ElementSet {
    pub fn new(container: ElementHandle) -> Self {
        Self {
            container,
            handles: Vec::new(),
        }
    }

    /// Adopts the children the host already has under `container`.
    pub fn rehydrate(container: ElementHandle, host: &dyn HostScene) -> Self {
        Self {
            container,
            handles: host.existing_children(container),
        }
    }

    pub fn container(&self) -> ElementHandle {
        self.container
    }

    pub fn handles(&self) -> &[ElementHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Destroys from the end or appends new elements at `interim` until the
    /// set holds `desired` elements.
    pub fn reconcile(
        &mut self,
        desired: usize,
        host: &mut dyn HostScene,
        interim: &TransformProxy,
    ) -> Reconciliation {
        let mut outcome = Reconciliation::default();

        while self.handles.len() > desired {
            if let Some(handle) = self.handles.pop() {
                host.destroy_instance(handle);
                outcome.destroyed += 1;
            }
        }

        if self.handles.len() < desired {
            let (p, r, s) = interim.to_mint();
            self.handles.reserve(desired - self.handles.len());
            while self.handles.len() < desired {
                let handle = host.create_instance(self.container);
                host.set_local_transform(handle, p, r, s);
                self.handles.push(handle);
                outcome.created += 1;
            }
        }

        if !outcome.is_noop() {
            debug!(
                created = outcome.created,
                destroyed = outcome.destroyed,
                len = self.handles.len(),
                "reconciled element set"
            );
        }
        outcome
    }

    /// Writes one transform per element, pairing by index.
    pub fn apply(&self, host: &mut dyn HostScene, proxies: &[TransformProxy]) {
        debug_assert_eq!(self.handles.len(), proxies.len());
        for (handle, proxy) in self.handles.iter().zip(proxies) {
            let (p, r, s) = proxy.to_mint();
            host.set_local_transform(*handle, p, r, s);
        }
    }

    /// Destroys every element.
    pub fn clear(&mut self, host: &mut dyn HostScene) {
        for handle in self.handles.drain(..) {
            host.destroy_instance(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn reconcile_appends_and_truncates_without_reordering() {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let mut set = ElementSet::new(container);
        let interim = TransformProxy::from_position(Vec3::new(1.0, 0.0, 0.0));

        let grow = set.reconcile(5, &mut scene, &interim);
        assert_eq!(grow, Reconciliation { created: 5, destroyed: 0 });
        let first_three = set.handles()[..3].to_vec();

        let shrink = set.reconcile(3, &mut scene, &interim);
        assert_eq!(shrink.destroyed, 2);
        assert_eq!(set.handles(), first_three.as_slice());

        set.reconcile(6, &mut scene, &interim);
        assert_eq!(&set.handles()[..3], first_three.as_slice());
        assert_eq!(scene.children(container).len(), 6);

        let fresh = set.handles()[5];
        let placed = scene.instance(fresh).expect("created").transform;
        assert_eq!(placed.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rehydrate_adopts_existing_children() {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let mut set = ElementSet::new(container);
        set.reconcile(4, &mut scene, &TransformProxy::IDENTITY);

        let resumed = ElementSet::rehydrate(container, &scene);
        assert_eq!(resumed, set);
    }

    #[test]
    fn clear_destroys_everything() {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let mut set = ElementSet::new(container);
        set.reconcile(3, &mut scene, &TransformProxy::IDENTITY);
        set.clear(&mut scene);
        assert!(set.is_empty());
        assert!(scene.children(container).is_empty());
    }
}
