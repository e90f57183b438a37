//! Event types and sinks for observing recompute cycles.
//!
//! This module defines [`ArrayEvent`] and a set of sinks to emit, collect or
//! forward events while a [`crate::generator::Generator`] runs its cycle via
//! [`crate::generator::Generator::refresh_with_events`].
use crate::generator::GeneratorId;
use crate::modifier::ModifierId;
use crate::shape::ShapeKind;

/// Describes events emitted by generators.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayEvent {
    /// Emitted before the command queue is drained.
    CycleStarted {
        generator: GeneratorId,
        kind: ShapeKind,
    },

    /// Emitted after pending commands were executed.
    CommandsDrained {
        generator: GeneratorId,
        /// Labels of the executed commands, in execution order.
        labels: Vec<String>,
    },

    /// Emitted when the element set changed size.
    ElementsReconciled {
        generator: GeneratorId,
        created: usize,
        destroyed: usize,
    },

    /// Emitted when Poisson sampling ran dry and points were filled uniformly.
    ScatterFallback {
        generator: GeneratorId,
        /// Points placed by the separation-respecting sampler.
        sampled: usize,
        /// Requested element count.
        target: usize,
    },

    /// Emitted when a modifier joins the stack.
    ModifierAttached {
        generator: GeneratorId,
        modifier: ModifierId,
        name: &'static str,
    },

    /// Emitted when a modifier leaves the stack.
    ModifierRemoved {
        generator: GeneratorId,
        modifier: ModifierId,
        name: &'static str,
    },

    /// Emitted when a command was reverted.
    Undone {
        generator: GeneratorId,
        label: String,
    },

    /// Emitted when a reverted command was executed again.
    Redone {
        generator: GeneratorId,
        label: String,
    },

    /// Emitted once the host has received every transform.
    CycleFinished {
        generator: GeneratorId,
        /// Number of live elements.
        elements: usize,
    },

    /// Non-fatal warning.
    Warning {
        generator: GeneratorId,
        message: String,
    },
}

/// A generic event sink that accepts [`ArrayEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ArrayEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ArrayEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ArrayEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ArrayEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ArrayEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ArrayEvent),
{
    #[inline]
    fn send(&mut self, event: ArrayEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default, Debug)]
pub struct VecSink {
    events: Vec<ArrayEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<ArrayEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ArrayEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ArrayEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: ArrayEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(message: &str) -> ArrayEvent {
        ArrayEvent::Warning {
            generator: GeneratorId(0),
            message: message.into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send_many([warning("a"), warning("b")]);
        assert_eq!(sink.len(), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("msg"));
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks()[0].as_slice(), &[warning("msg")]);
        assert_eq!(multi.sinks()[1].len(), 1);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("msg"));
        assert_eq!(count, 1);
    }
}
