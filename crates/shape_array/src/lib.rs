#![forbid(unsafe_code)]
//! shape_array: procedural instance arrays with transactional editing.
//!
//! Modules:
//! - shape: analytic layouts (line, grid, circle, arc, ellipse, sphere, Bézier path)
//! - sampling: Poisson-disc and uniform scatter in box, sphere and plane bounds
//! - modifier: composable transform mutators with upstream queries
//! - command: reversible edits, the command queue and undo/redo history
//! - generator: the per-shape façade and the session arena
//! - element: host scene boundary and element set reconciliation
//! - property, persistence, events, shared, transform: supporting pieces
//!
//! For examples, see the README and the `shape_array_examples` crate.
pub mod command;
pub mod element;
pub mod error;
pub mod events;
pub mod generator;
pub mod modifier;
pub mod persistence;
pub mod property;
pub mod sampling;
pub mod shape;
pub mod shared;
pub mod transform;

/// Convenient re-exports for common types. Import with `use shape_array::prelude::*;`.
pub mod prelude {
    pub use crate::command::{
        AddModifier, Command, Composite, History, HistoryConfig, MoveModifier, RemoveModifier,
        SetCount, SetModifierParams, SetValue, ValueArrayChanged,
    };
    pub use crate::element::{ElementHandle, ElementSet, HostScene, MemoryScene};
    pub use crate::error::{Error, Result};
    pub use crate::events::{ArrayEvent, EventSink, FnSink, MultiSink, VecSink};
    pub use crate::generator::{
        CycleReport, Generator, GeneratorConfig, GeneratorId, GeneratorState, Session,
    };
    pub use crate::modifier::{
        Channel, DropToSurface, FollowCurve, IncrementalRotation, IncrementalScale, ModifierId,
        ModifierParams, ModifierRegistry, PositionNoise, RadialNoise, RandomRotation, RandomScale,
        SurfaceHit, SurfaceOffset, SurfaceQuery, UniformRotation, UniformScale,
    };
    #[cfg(feature = "serde")]
    pub use crate::persistence::{from_ron, to_ron};
    pub use crate::persistence::PersistenceSlot;
    pub use crate::property::{Property, PropertyState};
    pub use crate::sampling::{
        PoissonDiskSampling, PoissonScatter, ScatterBound, ScatterSettings,
        UniformRandomSampling, VolumeSampling,
    };
    pub use crate::shape::{
        AnalyticShape, ArcShape, BezierPath, Capability, CircleShape, EllipseShape, GridPlane,
        GridShape, LineShape, RadialBlock, ScatterShape, ShapeKind, ShapeParams, SphereShape,
    };
    pub use crate::shared::Shared;
    pub use crate::transform::TransformProxy;
}
