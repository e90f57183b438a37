#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_transforms_to_png, Canvas, MarkerStyle, Projection, RenderConfig,
};
