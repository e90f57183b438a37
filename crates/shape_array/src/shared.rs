//! Observable single-writer value cells.
//!
//! A [`Shared`] holds one current value and an ordered list of listeners that
//! are invoked synchronously after every [`Shared::set`]. Writes take `&mut self`
//! and listeners only ever see `&T`, so a listener cannot write back into the
//! cell it is observing.

/// Identifier returned by [`Shared::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener<T> = Box<dyn FnMut(&T)>;

/// Observable mutable cell.
pub struct Shared<T> {
    value: T,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_listener: u32,
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies every listener in subscription order.
    pub fn set(&mut self, value: T) {
        self.value = value;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.value);
        }
    }

    /// Stores `value` without notifying listeners. Returns the previous value.
    pub fn replace_silent(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&T) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `true` if it was subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Clone> Shared<T> {
    /// Returns a clone of the current value.
    #[inline]
    pub fn cloned(&self) -> T {
        self.value.clone()
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
