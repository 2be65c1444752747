/// Viewer state shared by the front ends
///
/// A [`Viewer`] owns the working mesh, the camera, the model orientation
/// and the configuration. Front ends translate their input events into
/// calls on it and ask it for a [`Frame`] once per tick.
use std::path::Path;

use crate::config::{clamp_fov, ViewerConfig};
use crate::error::Result;
use crate::export::{export_scene_inserter, export_vertex_face};
use crate::geometry::{Mesh, Vec3};
use crate::load::{self, LoadReport, LoadedMesh};
use crate::projection::{Camera, Viewport};
use crate::render::{render_frame, Frame, FrameOptions};
use crate::reduce::limit_and_reindex;
use crate::transform::ModelOrientation;

/// Summary shown in status overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerStats {
    pub vertices: usize,
    pub triangles: usize,
    pub colors: bool,
    pub backface_cull: bool,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    mesh: Mesh,
    camera: Camera,
    orientation: ModelOrientation,
    config: ViewerConfig,
}

impl Viewer {
    /// An empty viewer
    pub fn new(config: ViewerConfig) -> Self {
        let config = config.sanitized();
        Self {
            mesh: Mesh::new(),
            camera: Camera::new(config.fov_degrees),
            orientation: ModelOrientation::default(),
            config,
        }
    }

    /// A viewer showing the built-in tetrahedron
    pub fn with_demo(config: ViewerConfig) -> Self {
        let mut viewer = Self::new(config);
        let demo = limit_and_reindex(&Mesh::tetrahedron(), viewer.config.triangle_budget());
        viewer.install(demo);
        viewer
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn orientation(&self) -> &ModelOrientation {
        &self.orientation
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Replace the configuration. The triangle limit applies from the next load.
    pub fn set_config(&mut self, config: ViewerConfig) {
        self.config = config.sanitized();
        self.camera.fov_degrees = self.config.fov_degrees;
    }

    pub fn set_fov(&mut self, degrees: f64) {
        self.config.fov_degrees = clamp_fov(degrees);
        self.camera.fov_degrees = self.config.fov_degrees;
    }

    pub fn toggle_colors(&mut self) {
        self.config.colors = !self.config.colors;
    }

    pub fn toggle_cull(&mut self) {
        self.config.backface_cull = !self.config.backface_cull;
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.config.auto_rotate = !self.config.auto_rotate;
    }

    /// Swap in a new working mesh and refit the view
    pub fn install(&mut self, mesh: Mesh) {
        self.mesh = mesh;
        self.reset_view();
        tracing::info!(
            vertices = self.mesh.vertex_count(),
            triangles = self.mesh.triangle_count(),
            "mesh installed"
        );
    }

    fn install_loaded(&mut self, loaded: LoadedMesh) -> LoadReport {
        self.install(loaded.mesh);
        loaded.report
    }

    /// Parse and install mesh text
    pub fn load_str(&mut self, text: &str) -> LoadReport {
        let loaded = load::load_str(text, self.config.triangle_budget());
        self.install_loaded(loaded)
    }

    /// Load from raw bytes. On error the current mesh is kept.
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<LoadReport> {
        let loaded = load::load_bytes(data, self.config.triangle_budget())?;
        Ok(self.install_loaded(loaded))
    }

    /// Load from a file. On error the current mesh is kept.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let loaded = load::load_path(path, self.config.triangle_budget())?;
        Ok(self.install_loaded(loaded))
    }

    /// Fit the camera to the mesh and clear all rotation. No-op on the camera for an empty mesh.
    pub fn reset_view(&mut self) {
        let Some(bounds) = self.mesh.bounds() else {
            return;
        };
        self.camera.fit_to_bounds(&bounds);
        self.orientation.reset();
    }

    /// Pointer drag in pixels
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.orientation.drag(dx, dy);
    }

    /// Wheel steps; positive zooms out
    pub fn zoom(&mut self, steps: f64) {
        self.camera.zoom(steps);
    }

    /// Move the camera; each component of `direction` is -1, 0 or 1
    pub fn travel(&mut self, direction: Vec3, dt: f64) {
        self.camera.travel(direction, dt);
    }

    /// Advance time-based state by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if self.config.auto_rotate {
            self.orientation.advance_auto(dt);
        }
    }

    pub fn frame_options(&self) -> FrameOptions {
        FrameOptions {
            backface_cull: self.config.backface_cull,
            colors: self.config.colors,
        }
    }

    /// Render the current state for a viewport
    pub fn frame(&self, viewport: &Viewport) -> Frame {
        render_frame(
            &self.mesh,
            &self.camera,
            &self.orientation,
            self.frame_options(),
            viewport,
        )
    }

    pub fn stats(&self) -> ViewerStats {
        ViewerStats {
            vertices: self.mesh.vertex_count(),
            triangles: self.mesh.triangle_count(),
            colors: self.config.colors,
            backface_cull: self.config.backface_cull,
        }
    }

    /// Multi-line status text for overlays
    pub fn overlay_text(&self) -> String {
        let on_off = |b: bool| if b { "On" } else { "Off" };
        let stats = self.stats();
        format!(
            "TriInk: {} tris | {} verts\nColors: {} | Cull: {}",
            stats.triangles,
            stats.vertices,
            on_off(stats.colors),
            on_off(stats.backface_cull)
        )
    }

    pub fn export_vertex_face(&self) -> String {
        export_vertex_face(&self.mesh)
    }

    pub fn export_scene_inserter(&self) -> String {
        export_scene_inserter(&self.mesh, self.config.mesh_id, self.config.insert_backcull)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_fitted() {
        let viewer = Viewer::with_demo(ViewerConfig::default());
        assert_eq!(viewer.mesh().triangle_count(), 4);
        // Tetrahedron spans 2 units on every axis
        assert!((viewer.camera().position.z - (2.0 * 0.6 + 1e-6) * 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_load_resets_orientation() {
        let mut viewer = Viewer::with_demo(ViewerConfig::default());
        viewer.drag(40.0, 10.0);
        viewer.zoom(1.0);
        let report = viewer.load_str("v 0 0 0\nv 4 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(report.triangles, 1);
        assert_eq!(*viewer.orientation(), ModelOrientation::default());
        assert!((viewer.camera().position.z - (4.0 * 0.6 + 1e-6) * 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_travel_persists_until_reset() {
        let mut viewer = Viewer::with_demo(ViewerConfig::default());
        let fitted = *viewer.camera();
        let viewport = Viewport::new(200.0, 200.0);

        viewer.travel(Vec3::new(1.0, 0.0, -1.0), 0.5);
        viewer.frame(&viewport);
        viewer.tick(1.0 / 30.0);
        viewer.travel(Vec3::new(1.0, 0.0, -1.0), 0.5);
        viewer.frame(&viewport);

        let moved = viewer.camera().position;
        assert!((moved - (fitted.position + Vec3::new(2.0, 0.0, -2.0))).norm() < 1e-9);

        viewer.reset_view();
        assert_eq!(viewer.camera().position, fitted.position);
        assert!((viewer.camera().position.z - (2.0 * 0.6 + 1e-6) * 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_failed_load_keeps_mesh() {
        let mut viewer = Viewer::with_demo(ViewerConfig::default());
        let before = viewer.mesh().clone();
        assert!(viewer.load_path("/no/such/file.obj").is_err());
        assert!(viewer.load_bytes(&[0xff, 0xfe]).is_err());
        assert_eq!(viewer.mesh(), &before);
    }

    #[test]
    fn test_empty_load_keeps_camera() {
        let mut viewer = Viewer::with_demo(ViewerConfig::default());
        let camera = *viewer.camera();
        viewer.load_str("");
        assert!(viewer.mesh().is_empty());
        assert_eq!(*viewer.camera(), camera);
        assert!(viewer.frame(&Viewport::new(100.0, 100.0)).triangles.is_empty());
    }

    #[test]
    fn test_triangle_limit_applies_on_load() {
        let mut text = String::new();
        for i in 0..200 {
            text.push_str(&format!("v {i} 0 0\nv {i} 1 0\nv {i} 0 1\n"));
            text.push_str(&format!("f {} {} {}\n", 3 * i + 1, 3 * i + 2, 3 * i + 3));
        }
        let mut viewer = Viewer::new(ViewerConfig {
            triangle_limit: 75,
            ..ViewerConfig::default()
        });
        let report = viewer.load_str(&text);
        assert_eq!(report.parsed_triangles, 200);
        assert_eq!(report.triangles, 75);
        assert_eq!(viewer.mesh().vertex_count(), 225);
    }

    #[test]
    fn test_tick_only_rotates_when_enabled() {
        let mut viewer = Viewer::with_demo(ViewerConfig::default());
        viewer.tick(1.0);
        assert_eq!(viewer.orientation().auto, 0.0);
        viewer.toggle_auto_rotate();
        viewer.tick(0.5);
        assert!((viewer.orientation().auto - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_toggles_feed_frame_options() {
        let mut viewer = Viewer::default();
        viewer.toggle_cull();
        viewer.toggle_colors();
        assert_eq!(
            viewer.frame_options(),
            FrameOptions {
                backface_cull: true,
                colors: false
            }
        );
        assert_eq!(
            viewer.overlay_text(),
            "TriInk: 0 tris | 0 verts\nColors: Off | Cull: On"
        );
        viewer.set_fov(5.0);
        assert!((viewer.camera().fov_degrees - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_exports_use_config() {
        let viewer = Viewer::with_demo(ViewerConfig {
            mesh_id: 42,
            insert_backcull: true,
            ..ViewerConfig::default()
        });
        let script = viewer.export_scene_inserter();
        assert!(script.contains("mesh.meshID = 42"));
        assert!(script.contains("mesh.backcull = true"));
        assert!(script.contains("mesh.color = { 44, 43, 42, 41 }"));
        assert!(viewer.export_vertex_face().starts_with("[[\nv 0.000000 1.000000 0.000000\n"));
    }
}
