use std::path::Path;

use anyhow::Context;
use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use shape_array::transform::TransformProxy;

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// World plane the renderer looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Projection {
    /// Looking down -Y: image right is +X, image down is +Z.
    #[default]
    TopDown,
    /// Looking along -Z: image right is +X, image up is +Y.
    Front,
}

impl Projection {
    fn project(self, p: Vec3) -> Vec2 {
        match self {
            Projection::TopDown => Vec2::new(p.x, p.z),
            Projection::Front => Vec2::new(p.x, -p.y),
        }
    }
}

/// How one group of transforms is drawn.
#[derive(Clone, Copy, Debug)]
pub struct MarkerStyle {
    pub color: [u8; 3],
    /// Disc radius in pixels at scale 1.
    pub radius: u32,
    /// Draw a tick along each element's local +Z.
    pub show_facing: bool,
}

impl MarkerStyle {
    pub fn disc(color: [u8; 3], radius: u32) -> Self {
        Self {
            color,
            radius,
            show_facing: false,
        }
    }

    pub fn with_facing(mut self) -> Self {
        self.show_facing = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World extent covered by the image, centered on the origin.
    pub domain_extent: Vec2,
    pub background: [u8; 3],
    pub projection: Projection,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), domain_extent: Vec2) -> Self {
        Self {
            image_size,
            domain_extent,
            background: [255, 255, 255],
            projection: Projection::TopDown,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    fn to_pixel(&self, p: Vec3) -> (i64, i64) {
        let q = self.projection.project(p);
        let (w, h) = self.image_size;
        let x = (q.x / self.domain_extent.x + 0.5) * w as f32;
        let y = (q.y / self.domain_extent.y + 0.5) * h as f32;
        (x.round() as i64, y.round() as i64)
    }
}

/// Accumulates layers of markers and writes them as one PNG.
pub struct Canvas {
    config: RenderConfig,
    image: RgbImage,
}

impl Canvas {
    pub fn new(config: RenderConfig) -> Self {
        let (w, h) = config.image_size;
        let image = RgbImage::from_pixel(w, h, Rgb(config.background));
        Self { config, image }
    }

    /// Draws every transform as a disc scaled by its X scale.
    pub fn draw(&mut self, transforms: &[TransformProxy], style: MarkerStyle) -> &mut Self {
        for t in transforms {
            let (cx, cy) = self.config.to_pixel(t.position);
            let r = (style.radius as f32 * t.scale.x.abs().max(0.1)).round() as i64;
            self.disc(cx, cy, r.max(1), style.color);
            if style.show_facing {
                let reach = self.world_per_pixel() * 3.0 * r as f32;
                let tip = t.position + t.rotation * Vec3::Z * reach;
                let (tx, ty) = self.config.to_pixel(tip);
                self.line((cx, cy), (tx, ty), [0, 0, 0]);
            }
        }
        self
    }

    fn world_per_pixel(&self) -> f32 {
        self.config.domain_extent.x / self.config.image_size.0.max(1) as f32
    }

    fn plot(&mut self, x: i64, y: i64, color: [u8; 3]) {
        let (w, h) = self.config.image_size;
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            self.image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    fn disc(&mut self, cx: i64, cy: i64, r: i64, color: [u8; 3]) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.plot(cx + dx, cy + dy, color);
                }
            }
        }
    }

    // Bresenham.
    fn line(&mut self, from: (i64, i64), to: (i64, i64), color: [u8; 3]) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, color);
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "image written");
        Ok(())
    }
}

/// Renders one set of transforms into `path`.
pub fn render_transforms_to_png(
    transforms: &[TransformProxy],
    style: MarkerStyle,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut canvas = Canvas::new(config.clone());
    canvas.draw(transforms, style);
    canvas.save(path)
}
