/// Camera and projection utilities
use nalgebra::Point2;

use crate::geometry::{Bounds, Vec3};

/// Distance of the near plane in front of the camera
pub const NEAR_PLANE: f64 = 0.1;

/// Camera travel in units per second
pub const CAMERA_SPEED: f64 = 2.0;

/// Allowed camera distance along z when zooming
pub const ZOOM_RANGE: (f64, f64) = (0.2, 5000.0);

/// Camera state. The camera has no rotation; it always looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub fov_degrees: f64,
    pub near: f64,
}

/// A camera-space point after perspective division
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub ndc_x: f64,
    pub ndc_y: f64,
    /// Forward depth, positive in front of the camera
    pub depth: f64,
}

impl Camera {
    pub fn new(fov_degrees: f64) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            fov_degrees,
            near: NEAR_PLANE,
        }
    }

    /// World (model-rotated) space to camera space
    pub fn to_camera_space(&self, point: &Vec3) -> Vec3 {
        point - self.position
    }

    /// Negated camera-space z
    pub fn forward_depth(camera_point: &Vec3) -> f64 {
        -camera_point.z
    }

    /// True if the camera-space point lies strictly beyond the near plane
    pub fn in_front(&self, camera_point: &Vec3) -> bool {
        Self::forward_depth(camera_point) > self.near
    }

    /// Perspective-divide a camera-space point. `None` at or inside the near plane.
    pub fn project(&self, camera_point: &Vec3, aspect: f64) -> Option<Projected> {
        let depth = Self::forward_depth(camera_point);
        if depth <= self.near {
            return None;
        }
        let t = (self.fov_degrees.to_radians() * 0.5).tan();
        Some(Projected {
            ndc_x: camera_point.x / (depth * t * aspect),
            ndc_y: camera_point.y / (depth * t),
            depth,
        })
    }

    /// Place the camera on +Z so the whole bounding box is in view
    pub fn fit_to_bounds(&mut self, bounds: &Bounds) {
        let radius = bounds.max_extent() * 0.6 + 1e-6;
        self.position = Vec3::new(0.0, 0.0, radius * 2.2);
    }

    /// Wheel zoom: positive steps move away, negative steps move closer
    pub fn zoom(&mut self, steps: f64) {
        if steps == 0.0 {
            return;
        }
        let factor = if steps > 0.0 { 1.08 } else { 0.92 };
        self.position.z = (self.position.z * factor).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }

    /// Move along the camera axes for `dt` seconds; each axis is -1, 0 or 1
    pub fn travel(&mut self, direction: Vec3, dt: f64) {
        self.position += direction * (CAMERA_SPEED * dt);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(75.0)
    }
}

/// Target surface dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Height of one surface unit relative to its width (2.0 for terminal cells)
    pub cell_aspect: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            cell_aspect: 1.0,
        }
    }

    pub fn with_cell_aspect(mut self, cell_aspect: f64) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }

    /// Physical width over physical height
    pub fn aspect(&self) -> f64 {
        self.width / (self.height * self.cell_aspect)
    }

    /// Map NDC `[-1, 1]` to surface coordinates with y pointing down
    pub fn to_screen(&self, p: &Projected) -> Point2<f64> {
        Point2::new(
            (p.ndc_x * 0.5 + 0.5) * self.width,
            (1.0 - (p.ndc_y * 0.5 + 0.5)) * self.height,
        )
    }
}
