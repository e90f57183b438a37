//! Edit-commit contract for a single editable value.
//!
//! A [`Property`] shows the committed value while [`PropertyState::Disabled`]
//! and a working copy while [`PropertyState::Editing`]. Committing validates
//! the working copy and hands back exactly one value for the caller to turn
//! into a command; cancelling discards it.

/// Edit state of a [`Property`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyState {
    Disabled,
    Editing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property<T> {
    committed: T,
    working: Option<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            committed: value,
            working: None,
        }
    }

    pub fn state(&self) -> PropertyState {
        if self.working.is_some() {
            PropertyState::Editing
        } else {
            PropertyState::Disabled
        }
    }

    /// The value to display: the working copy while editing.
    pub fn value(&self) -> &T {
        self.working.as_ref().unwrap_or(&self.committed)
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    /// Follows the underlying value while not editing. Returns `false` and
    /// leaves the working copy alone while editing.
    pub fn sync(&mut self, value: T) -> bool {
        if self.working.is_some() {
            return false;
        }
        self.committed = value;
        true
    }

    /// Starts editing from the committed value. No-op while already editing.
    pub fn begin_edit(&mut self) {
        if self.working.is_none() {
            self.working = Some(self.committed.clone());
        }
    }

    /// Replaces the working copy. Ignored unless editing.
    pub fn edit(&mut self, value: T) -> bool {
        match self.working.as_mut() {
            Some(w) => {
                *w = value;
                true
            }
            None => false,
        }
    }

    /// Ends editing, passing the working copy through `validate`.
    ///
    /// Returns the validated value, or `None` when not editing.
    pub fn commit(&mut self, validate: impl FnOnce(T) -> T) -> Option<T> {
        let value = validate(self.working.take()?);
        self.committed = value.clone();
        Some(value)
    }

    /// Ends editing without producing a value.
    pub fn cancel(&mut self) {
        self.working = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::MemoryScene;
    use crate::generator::{Generator, GeneratorConfig, GeneratorId};
    use crate::shape::ShapeKind;

    #[test]
    fn commit_emits_one_clamped_value() {
        let mut count = Property::new(10usize);
        assert_eq!(count.state(), PropertyState::Disabled);
        count.begin_edit();
        assert!(count.edit(1));
        assert_eq!(*count.value(), 1);
        assert_eq!(*count.committed(), 10);

        let committed = count.commit(|v| v.max(5));
        assert_eq!(committed, Some(5));
        assert_eq!(count.state(), PropertyState::Disabled);
        assert_eq!(count.commit(|v| v), None);
    }

    #[test]
    fn cancel_discards_working_copy() {
        let mut p = Property::new(2.0_f32);
        assert!(!p.edit(4.0));
        p.begin_edit();
        p.edit(4.0);
        p.cancel();
        assert_eq!(*p.value(), 2.0);
        assert_eq!(p.state(), PropertyState::Disabled);
    }

    #[test]
    fn sync_is_ignored_while_editing() {
        let mut p = Property::new(1);
        assert!(p.sync(3));
        p.begin_edit();
        assert!(!p.sync(4));
        assert_eq!(*p.value(), 3);
    }

    #[test]
    fn committed_count_drives_one_command() {
        let mut scene = MemoryScene::new();
        let container = scene.create_container();
        let mut g = Generator::new(
            GeneratorId(0),
            container,
            ShapeKind::Circle.default_params(),
            GeneratorConfig::default(),
        )
        .unwrap();
        g.refresh(&mut scene);

        let mut count = Property::new(g.count());
        count.begin_edit();
        count.edit(2);
        let shape = g.shape().clone();
        if let Some(value) = count.commit(|v| shape.clamp_count(v)) {
            g.set_count(value).unwrap();
        }
        assert_eq!(g.pending(), 1);
        g.refresh(&mut scene);
        assert_eq!(g.elements().len(), 5);
        assert!(count.sync(g.count()));
        assert_eq!(*count.value(), 5);
    }
}
