/// Per-frame software render pipeline
///
/// Rotates the model, moves it into camera space, drops triangles that
/// touch the near plane or face away, projects the rest and sorts them
/// back to front. Pixel filling is left to a [`DrawSurface`].
use nalgebra::Point2;

use crate::geometry::{Mesh, Vec3};
use crate::projection::{Camera, Viewport};
use crate::transform::{ModelOrientation, Transform};

/// An sRGB colour with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Composite this colour over an opaque background
    pub fn over(&self, background: Rgba) -> Rgba {
        let mix = |fg: u8, bg: u8| {
            (fg as f32 * self.a + bg as f32 * (1.0 - self.a))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` form
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Colours cycled by triangle index when colour mode is on
pub const DISPLAY_PALETTE: [Rgba; 9] = [
    Rgba::rgb(0xf2, 0xf2, 0xf2),
    Rgba::rgb(0xff, 0xd1, 0x66),
    Rgba::rgb(0x06, 0xd6, 0xa0),
    Rgba::rgb(0x11, 0x8a, 0xb2),
    Rgba::rgb(0xef, 0x47, 0x6f),
    Rgba::rgb(0x83, 0x38, 0xec),
    Rgba::rgb(0x3a, 0x86, 0xff),
    Rgba::rgb(0xff, 0x00, 0x6e),
    Rgba::rgb(0xfb, 0x56, 0x07),
];

/// Fill colour when colour mode is off
pub const FLAT_COLOR: Rgba = Rgba::rgb(0xe6, 0xe6, 0xe6);

/// Opacity applied to every filled triangle
pub const FILL_ALPHA: f32 = 0.95;

/// Thin outline drawn around every filled triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

pub const OUTLINE: Stroke = Stroke {
    color: Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.18,
    },
    width: 1.0,
};

/// Per-frame switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    pub backface_cull: bool,
    pub colors: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            backface_cull: false,
            colors: true,
        }
    }
}

/// A projected triangle ready to fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Point2<f64>; 3],
    /// Mean forward depth of the three vertices
    pub depth: f64,
    pub color: Rgba,
    /// Position of the source triangle in the mesh
    pub source: usize,
}

/// Why triangles were left out of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub near_rejected: usize,
    pub backface_culled: usize,
}

/// The ordered output of one render pass, farthest triangle first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub triangles: Vec<ScreenTriangle>,
    pub stats: FrameStats,
}

/// Anything that can fill outlined polygons in painter's order
pub trait DrawSurface {
    fn clear(&mut self);
    fn fill_polygon(&mut self, points: &[Point2<f64>], fill: Rgba, stroke: Stroke);
}

impl Frame {
    /// Fill every triangle onto the surface, back to front
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for tri in &self.triangles {
            surface.fill_polygon(&tri.points, tri.color.with_alpha(FILL_ALPHA), OUTLINE);
        }
    }
}

/// Display colour for the triangle at `index`
pub fn triangle_color(index: usize, colors: bool) -> Rgba {
    if colors {
        DISPLAY_PALETTE[index % DISPLAY_PALETTE.len()]
    } else {
        FLAT_COLOR
    }
}

/// Run the full pipeline for one frame
pub fn render_frame(
    mesh: &Mesh,
    camera: &Camera,
    orientation: &ModelOrientation,
    options: FrameOptions,
    viewport: &Viewport,
) -> Frame {
    let rotation = orientation.rotation();
    let camera_space: Vec<Vec3> = mesh
        .vertices
        .iter()
        .map(|v| camera.to_camera_space(&(rotation * v.position)))
        .collect();

    let aspect = viewport.aspect();
    let mut frame = Frame {
        triangles: Vec::with_capacity(mesh.triangles.len()),
        stats: FrameStats::default(),
    };

    for (index, triangle) in mesh.triangles.iter().enumerate() {
        let [i0, i1, i2] = triangle.indices;
        let (Some(&a), Some(&b), Some(&c)) = (
            camera_space.get(i0),
            camera_space.get(i1),
            camera_space.get(i2),
        ) else {
            continue;
        };

        if !(camera.in_front(&a) && camera.in_front(&b) && camera.in_front(&c)) {
            frame.stats.near_rejected += 1;
            continue;
        }

        // Front faces have a negative z normal in camera space
        if options.backface_cull && Transform::face_normal(&a, &b, &c).z >= 0.0 {
            frame.stats.backface_culled += 1;
            continue;
        }

        let (Some(pa), Some(pb), Some(pc)) = (
            camera.project(&a, aspect),
            camera.project(&b, aspect),
            camera.project(&c, aspect),
        ) else {
            frame.stats.near_rejected += 1;
            continue;
        };

        frame.triangles.push(ScreenTriangle {
            points: [
                viewport.to_screen(&pa),
                viewport.to_screen(&pb),
                viewport.to_screen(&pc),
            ],
            depth: (pa.depth + pb.depth + pc.depth) / 3.0,
            color: triangle_color(index, options.colors),
            source: index,
        });
    }

    // Painter's order; the sort is stable so equal depths keep mesh order
    frame
        .triangles
        .sort_by(|u, v| v.depth.total_cmp(&u.depth));

    tracing::trace!(
        emitted = frame.triangles.len(),
        near_rejected = frame.stats.near_rejected,
        backface_culled = frame.stats.backface_culled,
        "frame rendered"
    );
    frame
}
