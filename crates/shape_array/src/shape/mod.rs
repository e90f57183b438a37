//! Parametric shapes that place elements.
//!
//! Every [`ShapeKind`] has one parameter struct. Analytic shapes implement
//! [`AnalyticShape`] and map an element index straight to a position; scatter
//! shapes delegate to [`crate::sampling::PoissonScatter`] and keep their points
//! in the generator.
use glam::{UVec3, Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::{ScatterBound, ScatterSettings};

pub mod bezier;
pub mod grid;
pub mod line;
pub mod radial;
pub mod sphere;

pub use bezier::BezierPath;
pub use grid::{GridPlane, GridShape};
pub use line::LineShape;
pub use radial::{ArcShape, CircleShape, EllipseShape, RadialBlock};
pub use sphere::SphereShape;

/// Closed set of supported shapes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Grid,
    Circle,
    Arc,
    Ellipse,
    Sphere,
    Path,
    ScatterBox,
    ScatterSphere,
    ScatterPlane,
}

/// Optional features a shape offers to modifiers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Has a center that elements radiate from.
    Radial,
    /// Has a per-element facing direction (tangent or outward normal).
    Tangent,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::Line,
        ShapeKind::Grid,
        ShapeKind::Circle,
        ShapeKind::Arc,
        ShapeKind::Ellipse,
        ShapeKind::Sphere,
        ShapeKind::Path,
        ShapeKind::ScatterBox,
        ShapeKind::ScatterSphere,
        ShapeKind::ScatterPlane,
    ];

    /// Smallest element count the shape accepts.
    pub fn min_count(self) -> usize {
        match self {
            ShapeKind::Line | ShapeKind::Grid => 2,
            ShapeKind::Circle | ShapeKind::Ellipse | ShapeKind::Sphere => 5,
            ShapeKind::Arc => 2,
            ShapeKind::Path => 3,
            ShapeKind::ScatterBox | ShapeKind::ScatterSphere | ShapeKind::ScatterPlane => 1,
        }
    }

    pub fn is_scatter(self) -> bool {
        matches!(
            self,
            ShapeKind::ScatterBox | ShapeKind::ScatterSphere | ShapeKind::ScatterPlane
        )
    }

    pub fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::Radial => matches!(
                self,
                ShapeKind::Circle | ShapeKind::Arc | ShapeKind::Ellipse | ShapeKind::Sphere
            ),
            Capability::Tangent => matches!(
                self,
                ShapeKind::Circle
                    | ShapeKind::Arc
                    | ShapeKind::Ellipse
                    | ShapeKind::Sphere
                    | ShapeKind::Path
            ),
        }
    }

    /// Fresh parameters used when a generator switches to this kind.
    pub fn default_params(self) -> ShapeParams {
        match self {
            ShapeKind::Line => ShapeParams::Line(LineShape::default()),
            ShapeKind::Grid => ShapeParams::Grid(GridShape::default()),
            ShapeKind::Circle => ShapeParams::Circle(CircleShape::default()),
            ShapeKind::Arc => ShapeParams::Arc(ArcShape::default()),
            ShapeKind::Ellipse => ShapeParams::Ellipse(EllipseShape::default()),
            ShapeKind::Sphere => ShapeParams::Sphere(SphereShape::default()),
            ShapeKind::Path => ShapeParams::Path(BezierPath::default()),
            ShapeKind::ScatterBox => ShapeParams::Scatter(ScatterShape {
                bound: ScatterBound::Box {
                    size: Vec3::splat(10.0),
                },
                settings: ScatterSettings::default(),
            }),
            ShapeKind::ScatterSphere => ShapeParams::Scatter(ScatterShape {
                bound: ScatterBound::Sphere {
                    radius: 5.0,
                    surface: false,
                },
                settings: ScatterSettings::default(),
            }),
            ShapeKind::ScatterPlane => ShapeParams::Scatter(ScatterShape {
                bound: ScatterBound::Plane {
                    size: Vec2::splat(10.0),
                },
                settings: ScatterSettings::default(),
            }),
        }
    }

    /// Element count a freshly switched generator starts with.
    pub fn default_count(self) -> usize {
        self.default_params().clamp_count(10)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Grid => "grid",
            ShapeKind::Circle => "circle",
            ShapeKind::Arc => "arc",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Path => "path",
            ShapeKind::ScatterBox => "scatter_box",
            ShapeKind::ScatterSphere => "scatter_sphere",
            ShapeKind::ScatterPlane => "scatter_plane",
        }
    }
}

/// Shapes whose positions are a pure function of `(index, count)`.
pub trait AnalyticShape {
    fn point(&self, index: usize, count: usize) -> Vec3;

    fn points(&self, count: usize) -> Vec<Vec3> {
        (0..count).map(|i| self.point(i, count)).collect()
    }
}

/// Poisson-disc scatter inside a bound.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterShape {
    pub bound: ScatterBound,
    pub settings: ScatterSettings,
}

impl ScatterShape {
    pub fn kind(&self) -> ShapeKind {
        match self.bound {
            ScatterBound::Box { .. } => ShapeKind::ScatterBox,
            ScatterBound::Sphere { .. } => ShapeKind::ScatterSphere,
            ScatterBound::Plane { .. } => ShapeKind::ScatterPlane,
        }
    }
}

/// Parameters of exactly one shape kind.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeParams {
    Line(LineShape),
    Grid(GridShape),
    Circle(CircleShape),
    Arc(ArcShape),
    Ellipse(EllipseShape),
    Sphere(SphereShape),
    Path(BezierPath),
    Scatter(ScatterShape),
}

impl ShapeParams {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Line(_) => ShapeKind::Line,
            ShapeParams::Grid(_) => ShapeKind::Grid,
            ShapeParams::Circle(_) => ShapeKind::Circle,
            ShapeParams::Arc(_) => ShapeKind::Arc,
            ShapeParams::Ellipse(_) => ShapeKind::Ellipse,
            ShapeParams::Sphere(_) => ShapeKind::Sphere,
            ShapeParams::Path(_) => ShapeKind::Path,
            ShapeParams::Scatter(s) => s.kind(),
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.kind().supports(capability)
    }

    /// Element count fixed by the parameters themselves (grid and sphere).
    pub fn derived_count(&self) -> Option<usize> {
        match self {
            ShapeParams::Grid(g) => Some(g.element_count()),
            ShapeParams::Sphere(s) => Some(s.element_count()),
            _ => None,
        }
    }

    /// Clamps a requested element count to what the shape accepts.
    pub fn clamp_count(&self, requested: usize) -> usize {
        match self.derived_count() {
            Some(n) => n,
            None => requested.max(self.kind().min_count()),
        }
    }

    /// Returns a copy with every parameter inside its valid range.
    pub fn clamped(&self) -> Self {
        match self {
            ShapeParams::Line(l) => ShapeParams::Line(*l),
            ShapeParams::Grid(g) => ShapeParams::Grid(g.clamped()),
            ShapeParams::Circle(c) => ShapeParams::Circle(c.clamped()),
            ShapeParams::Arc(a) => ShapeParams::Arc(a.clamped()),
            ShapeParams::Ellipse(e) => ShapeParams::Ellipse(e.clamped()),
            ShapeParams::Sphere(s) => ShapeParams::Sphere(s.clamped()),
            ShapeParams::Path(p) => ShapeParams::Path(p.clamped()),
            ShapeParams::Scatter(s) => ShapeParams::Scatter(ScatterShape {
                bound: s.bound.clamped(),
                settings: s.settings.clamped(),
            }),
        }
    }

    /// Interim position for elements created before their first layout.
    pub fn anchor(&self) -> Vec3 {
        match self {
            ShapeParams::Line(l) => l.start,
            ShapeParams::Path(p) => p.control_points().first().copied().unwrap_or(Vec3::ZERO),
            _ => self.radial().map(|r| r.center).unwrap_or(Vec3::ZERO),
        }
    }

    pub fn as_analytic(&self) -> Option<&dyn AnalyticShape> {
        match self {
            ShapeParams::Line(l) => Some(l as &dyn AnalyticShape),
            ShapeParams::Grid(g) => Some(g as &dyn AnalyticShape),
            ShapeParams::Circle(c) => Some(c as &dyn AnalyticShape),
            ShapeParams::Arc(a) => Some(a as &dyn AnalyticShape),
            ShapeParams::Ellipse(e) => Some(e as &dyn AnalyticShape),
            ShapeParams::Sphere(s) => Some(s as &dyn AnalyticShape),
            ShapeParams::Path(p) => Some(p as &dyn AnalyticShape),
            ShapeParams::Scatter(_) => None,
        }
    }

    pub fn as_scatter(&self) -> Option<&ScatterShape> {
        match self {
            ShapeParams::Scatter(s) => Some(s),
            _ => None,
        }
    }

    /// Radial parameter block of radial shapes.
    pub fn radial(&self) -> Option<&RadialBlock> {
        match self {
            ShapeParams::Circle(c) => Some(&c.radial),
            ShapeParams::Arc(a) => Some(&a.radial),
            ShapeParams::Ellipse(e) => Some(&e.radial),
            ShapeParams::Sphere(s) => Some(&s.radial),
            _ => None,
        }
    }

    /// Facing direction of element `index`: the curve tangent for rings and
    /// paths, the outward normal for spheres.
    pub fn facing(&self, index: usize, count: usize) -> Option<Vec3> {
        match self {
            ShapeParams::Circle(c) => Some(c.tangent(index, count)),
            ShapeParams::Arc(a) => Some(a.tangent(index, count)),
            ShapeParams::Ellipse(e) => Some(e.tangent(index, count)),
            ShapeParams::Sphere(s) => Some(s.normal(index)),
            ShapeParams::Path(p) => Some(p.tangent_at(p.sample_t(index, count))),
            _ => None,
        }
    }
}

impl Default for ShapeParams {
    fn default() -> Self {
        ShapeKind::Line.default_params()
    }
}

/// Helper shared by grid clamping and tests.
pub(crate) fn uvec3_product(v: UVec3) -> usize {
    v.x as usize * v.y as usize * v.z as usize
}
