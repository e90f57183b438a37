//! Ordered modifier arena with upstream queries.
use crate::modifier::{Channel, Modifier, ModifierContext, ModifierId};
use crate::transform::TransformProxy;

/// Modifiers of one generator.
///
/// Slots are addressed by [`ModifierId`] and never reused, so a detached
/// modifier can come back into its old slot on undo. `order` is the run order.
#[derive(Debug, Default)]
pub struct ModifierStack {
    slots: Vec<Option<Modifier>>,
    order: Vec<ModifierId>,
    outputs: Vec<Vec<TransformProxy>>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a fresh id.
    pub fn allocate_id(&mut self) -> ModifierId {
        let id = ModifierId(self.slots.len() as u32);
        self.slots.push(None);
        self.outputs.push(Vec::new());
        id
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in run order.
    pub fn ids(&self) -> &[ModifierId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    pub fn get(&self, id: ModifierId) -> Option<&Modifier> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ModifierId) -> Option<&mut Modifier> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Whether `id` was ever allocated by this stack.
    pub fn is_known(&self, id: ModifierId) -> bool {
        (id.0 as usize) < self.slots.len()
    }

    pub fn position(&self, id: ModifierId) -> Option<usize> {
        self.order.iter().position(|o| *o == id)
    }

    /// Puts `modifier` into its slot and at `position` in the run order
    /// (clamped to the end).
    pub fn insert(&mut self, position: usize, modifier: Modifier) {
        let slot = modifier.id().0 as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
            self.outputs.resize_with(slot + 1, Vec::new);
        }
        let id = modifier.id();
        self.slots[slot] = Some(modifier);
        self.order.retain(|o| *o != id);
        let position = position.min(self.order.len());
        self.order.insert(position, id);
    }

    /// Takes a modifier out of the stack; returns its former position.
    pub fn remove(&mut self, id: ModifierId) -> Option<(usize, Modifier)> {
        let position = self.position(id)?;
        let modifier = self.slots.get_mut(id.0 as usize)?.take()?;
        self.order.remove(position);
        if let Some(out) = self.outputs.get_mut(id.0 as usize) {
            out.clear();
        }
        Some((position, modifier))
    }

    /// Moves a modifier to `position`; returns its previous position.
    pub fn move_to(&mut self, id: ModifierId, position: usize) -> Option<usize> {
        let from = self.position(id)?;
        self.order.remove(from);
        let position = position.min(self.order.len());
        self.order.insert(position, id);
        Some(from)
    }

    /// Removes every modifier, in run order.
    pub fn drain(&mut self) -> Vec<Modifier> {
        let order = std::mem::take(&mut self.order);
        self.outputs.iter_mut().for_each(Vec::clear);
        order
            .into_iter()
            .filter_map(|id| self.slots.get_mut(id.0 as usize).and_then(Option::take))
            .collect()
    }

    /// Nearest modifier before `position` that writes `channel`.
    pub fn upstream(&self, position: usize, channel: Channel) -> Option<ModifierId> {
        self.order[..position.min(self.order.len())]
            .iter()
            .rev()
            .copied()
            .find(|id| self.get(*id).is_some_and(|m| m.channel() == channel))
    }

    /// Output of `id` from the last [`ModifierStack::apply`].
    pub fn output(&self, id: ModifierId) -> Option<&[TransformProxy]> {
        self.outputs.get(id.0 as usize).map(Vec::as_slice)
    }

    /// Runs every modifier in order and returns the final transforms.
    pub fn apply(&mut self, ctx: &ModifierContext<'_>) -> Vec<TransformProxy> {
        let mut proxies = ctx.defaults.to_vec();

        for position in 0..self.order.len() {
            let id = self.order[position];
            let Some(channel) = self.get(id).map(Modifier::channel) else {
                continue;
            };
            let upstream = self.upstream(position, channel);

            let Self { slots, outputs, .. } = self;
            let base: &[TransformProxy] = match upstream {
                Some(u) => &outputs[u.0 as usize],
                None => ctx.defaults,
            };
            if let Some(Some(modifier)) = slots.get_mut(id.0 as usize) {
                modifier.process(ctx, base, &mut proxies);
            }
            outputs[id.0 as usize].clone_from(&proxies);
        }

        proxies
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::generator::GeneratorId;
    use crate::modifier::{
        FollowCurve, ModifierParams, PositionNoise, RandomRotation, UniformRotation, UniformScale,
    };
    use crate::shape::{ShapeKind, ShapeParams};

    fn push(stack: &mut ModifierStack, shape: &ShapeParams, params: ModifierParams) -> ModifierId {
        let id = stack.allocate_id();
        let m = Modifier::new(id, GeneratorId(0), params, shape, 11).expect("supported");
        stack.insert(usize::MAX, m);
        id
    }

    fn ring_defaults(shape: &ShapeParams, n: usize) -> Vec<TransformProxy> {
        shape
            .as_analytic()
            .expect("analytic")
            .points(n)
            .into_iter()
            .map(TransformProxy::from_position)
            .collect()
    }

    #[test]
    fn upstream_finds_nearest_same_channel() {
        let shape = ShapeKind::Circle.default_params();
        let mut stack = ModifierStack::new();
        let follow = push(
            &mut stack,
            &shape,
            ModifierParams::FollowCurve(FollowCurve::default()),
        );
        let scale = push(
            &mut stack,
            &shape,
            ModifierParams::UniformScale(UniformScale::default()),
        );
        let random = push(
            &mut stack,
            &shape,
            ModifierParams::RandomRotation(RandomRotation::default()),
        );

        assert_eq!(stack.upstream(2, Channel::Rotation), Some(follow));
        assert_eq!(stack.upstream(2, Channel::Scale), Some(scale));
        assert_eq!(stack.upstream(0, Channel::Rotation), None);
        assert_eq!(stack.upstream(3, Channel::Rotation), Some(random));
        assert_eq!(stack.upstream(1, Channel::Position), None);
    }

    #[test]
    fn rotation_layers_onto_follow_curve() {
        let shape = ShapeKind::Circle.default_params();
        let defaults = ring_defaults(&shape, 8);
        let mut stack = ModifierStack::new();
        let follow = push(
            &mut stack,
            &shape,
            ModifierParams::FollowCurve(FollowCurve::default()),
        );
        push(
            &mut stack,
            &shape,
            ModifierParams::UniformRotation(UniformRotation {
                angles: Vec3::new(0.0, 0.0, 45.0),
            }),
        );

        let ctx = ModifierContext::new(&shape, &defaults);
        let out = stack.apply(&ctx);
        let facing = stack.output(follow).expect("ran").to_vec();
        for (o, f) in out.iter().zip(&facing) {
            let expected = f.rotation * Quat::from_rotation_z(45f32.to_radians());
            assert!(o.rotation.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn apply_is_idempotent_without_changes() {
        let shape = ShapeKind::Line.default_params();
        let defaults = ring_defaults(&shape, 12);
        let mut stack = ModifierStack::new();
        push(
            &mut stack,
            &shape,
            ModifierParams::PositionNoise(PositionNoise::default()),
        );
        push(
            &mut stack,
            &shape,
            ModifierParams::RandomRotation(RandomRotation::default()),
        );
        let ctx = ModifierContext::new(&shape, &defaults);
        assert_eq!(stack.apply(&ctx), stack.apply(&ctx));
    }

    #[test]
    fn remove_and_reinsert_keeps_slot() {
        let shape = ShapeKind::Line.default_params();
        let mut stack = ModifierStack::new();
        let a = push(
            &mut stack,
            &shape,
            ModifierParams::UniformScale(UniformScale::default()),
        );
        let b = push(
            &mut stack,
            &shape,
            ModifierParams::PositionNoise(PositionNoise::default()),
        );
        let (pos, m) = stack.remove(a).expect("attached");
        assert_eq!(pos, 0);
        assert_eq!(stack.ids(), &[b]);
        stack.insert(pos, m);
        assert_eq!(stack.ids(), &[a, b]);

        assert_eq!(stack.move_to(a, 5), Some(0));
        assert_eq!(stack.ids(), &[b, a]);
        assert_eq!(stack.drain().len(), 2);
        assert!(stack.is_empty());
    }
}
