/// TriInk Web - browser bindings for the TriInk viewer
///
/// Wraps a [`Viewer`] for JavaScript and paints its frames onto a 2D
/// canvas context. Input wiring and file pickers live in the host page.
use nalgebra::Point2;
use triink_core::{DrawSurface, Rgba, Stroke, Vec3, Viewer, ViewerConfig, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const EMPTY_HINT: &str = "Load an OBJ to render it";

/// Last overlay line, below the viewer status
const HELP_LINE: &str = "Drag to rotate. Wheel zoom. WASD move.";

/// Background colour the canvas is cleared to
const BACKGROUND: &str = "#101014";

/// `window.devicePixelRatio`, or 1 outside a browser window
fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(1.0)
}

/// Backing-store size for a canvas laid out at `css_width` x `css_height`
fn backing_size(css_width: f64, css_height: f64, pixel_ratio: f64) -> (u32, u32) {
    let scale = |css: f64| (css * pixel_ratio).floor().max(1.0) as u32;
    (scale(css_width), scale(css_height))
}

/// Canvas-backed drawing surface. Stroke widths are given in CSS pixels.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
    pixel_ratio: f64,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(
        ctx: &'a CanvasRenderingContext2d,
        width: f64,
        height: f64,
        pixel_ratio: f64,
    ) -> Self {
        Self {
            ctx,
            width,
            height,
            pixel_ratio,
        }
    }
}

impl DrawSurface for CanvasSurface<'_> {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_fill_style(&JsValue::from_str(BACKGROUND));
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], fill: Rgba, stroke: Stroke) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();

        self.ctx.set_fill_style(&JsValue::from_str(&fill.to_css()));
        self.ctx.fill();

        if stroke.width > 0.0 {
            self.ctx.set_line_width(stroke.width * self.pixel_ratio);
            self.ctx
                .set_stroke_style(&JsValue::from_str(&stroke.color.to_css()));
            self.ctx.stroke();
        }
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    viewer: Viewer,
}

#[wasm_bindgen]
impl WebViewer {
    /// A viewer showing the demo tetrahedron with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebViewer {
        WebViewer {
            viewer: Viewer::with_demo(ViewerConfig::default()),
        }
    }

    /// Parse and install OBJ text, returning the number of skipped lines
    pub fn load_obj(&mut self, text: &str) -> usize {
        self.viewer.load_str(text).skipped_lines
    }

    /// Install a file's raw bytes. Non-UTF-8 input is rejected and the current mesh kept.
    pub fn load_obj_bytes(&mut self, data: &[u8]) -> Result<usize, JsValue> {
        self.viewer
            .load_bytes(data)
            .map(|report| report.skipped_lines)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Triangle limit for the next load (clamped to 50..=50000)
    pub fn set_triangle_limit(&mut self, limit: i32) {
        let mut config = self.viewer.config().clone();
        config.triangle_limit = limit as i64;
        self.viewer.set_config(config);
    }

    pub fn set_fov(&mut self, degrees: f64) {
        self.viewer.set_fov(degrees);
    }

    pub fn set_colors(&mut self, on: bool) {
        if self.viewer.config().colors != on {
            self.viewer.toggle_colors();
        }
    }

    pub fn set_backface_cull(&mut self, on: bool) {
        if self.viewer.config().backface_cull != on {
            self.viewer.toggle_cull();
        }
    }

    pub fn set_auto_rotate(&mut self, on: bool) {
        if self.viewer.config().auto_rotate != on {
            self.viewer.toggle_auto_rotate();
        }
    }

    /// Mesh id for the scene-insertion export (clamped to 1..=999)
    pub fn set_mesh_id(&mut self, id: i32) {
        let mut config = self.viewer.config().clone();
        config.mesh_id = id as i64;
        self.viewer.set_config(config);
    }

    pub fn set_insert_backcull(&mut self, on: bool) {
        let mut config = self.viewer.config().clone();
        config.insert_backcull = on;
        self.viewer.set_config(config);
    }

    /// Pointer drag in pixels
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.viewer.drag(dx, dy);
    }

    /// Wheel zoom; positive `delta_y` zooms out, anything else zooms in
    pub fn wheel(&mut self, delta_y: f64) {
        self.viewer.zoom(if delta_y > 0.0 { 1.0 } else { -1.0 });
    }

    /// Camera distance along +Z
    pub fn camera_distance(&self) -> f64 {
        self.viewer.camera().position.z
    }

    /// Move the camera along a unit direction for `dt` seconds
    pub fn travel(&mut self, x: f64, y: f64, z: f64, dt: f64) {
        self.viewer.travel(Vec3::new(x, y, z), dt);
    }

    pub fn reset_view(&mut self) {
        self.viewer.reset_view();
    }

    /// Advance auto-rotation by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        self.viewer.tick(dt);
    }

    pub fn vertex_count(&self) -> usize {
        self.viewer.mesh().vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.viewer.mesh().triangle_count()
    }

    /// Status lines followed by the controls hint
    pub fn overlay_text(&self) -> String {
        format!("{}\n{HELP_LINE}", self.viewer.overlay_text())
    }

    pub fn export_vertex_face(&self) -> String {
        self.viewer.export_vertex_face()
    }

    pub fn export_scene_inserter(&self) -> String {
        self.viewer.export_scene_inserter()
    }

    /// Draw one frame onto the canvas with the given element id
    pub fn render_to(&self, canvas_id: &str) -> Result<(), JsValue> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        self.render(&canvas)
    }

    /// Draw one frame onto `canvas`, resizing its backing store for HiDPI screens
    pub fn render(&self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let ratio = device_pixel_ratio();
        let (w, h) = backing_size(
            canvas.client_width() as f64,
            canvas.client_height() as f64,
            ratio,
        );
        if canvas.width() != w || canvas.height() != h {
            canvas.set_width(w);
            canvas.set_height(h);
        }

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let (width, height) = (w as f64, h as f64);
        let mut surface = CanvasSurface::new(&ctx, width, height, ratio);

        if self.viewer.mesh().is_empty() {
            surface.clear();
            ctx.set_fill_style(&JsValue::from_str("rgba(255,255,255,0.08)"));
            ctx.set_font(&format!("{}px system-ui, sans-serif", 14.0 * ratio));
            ctx.fill_text(EMPTY_HINT, 16.0 * ratio, 28.0 * ratio)?;
        } else {
            self.viewer.frame(&Viewport::new(width, height)).draw(&mut surface);
        }

        ctx.set_fill_style(&JsValue::from_str("#ffd166"));
        ctx.set_font(&format!("{}px monospace", 12.0 * ratio));
        for (row, line) in self.overlay_text().lines().enumerate() {
            let y = (16.0 + row as f64 * 14.0) * ratio;
            ctx.fill_text(line, 8.0 * ratio, y)?;
        }
        Ok(())
    }
}

impl Default for WebViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_demo() {
        let viewer = WebViewer::new();
        assert_eq!(viewer.vertex_count(), 4);
        assert_eq!(viewer.triangle_count(), 4);
    }

    #[test]
    fn test_load_and_export() {
        let mut viewer = WebViewer::new();
        let skipped = viewer.load_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 bad\nf 1 2 3\n");
        assert_eq!(skipped, 1);
        assert_eq!(viewer.triangle_count(), 1);
        assert!(viewer.export_vertex_face().ends_with("f 1 2 3\n]]"));
    }

    #[test]
    fn test_inserter_settings() {
        let mut viewer = WebViewer::new();
        viewer.load_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        viewer.set_mesh_id(5000);
        viewer.set_insert_backcull(true);
        let script = viewer.export_scene_inserter();
        assert!(script.contains("mesh.meshID = 999"));
        assert!(script.contains("mesh.backcull = true"));
    }

    #[test]
    fn test_wheel_without_delta_zooms_in() {
        let mut viewer = WebViewer::new();
        let before = viewer.camera_distance();
        viewer.wheel(0.0);
        assert!((viewer.camera_distance() - before * 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_direction() {
        let mut viewer = WebViewer::new();
        let before = viewer.camera_distance();
        viewer.wheel(120.0);
        assert!((viewer.camera_distance() - before * 1.08).abs() < 1e-9);
        viewer.wheel(-3.0);
        assert!((viewer.camera_distance() - before * 1.08 * 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_ends_with_controls_hint() {
        let viewer = WebViewer::new();
        let text = viewer.overlay_text();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().last(), Some(HELP_LINE));
        assert!(text.starts_with("TriInk: 4 tris | 4 verts\n"));
    }

    #[test]
    fn test_backing_size_scales_with_pixel_ratio() {
        assert_eq!(backing_size(300.0, 150.0, 2.0), (600, 300));
        assert_eq!(backing_size(100.5, 33.3, 1.5), (150, 49));
        assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
    }

    #[test]
    fn test_toggles_are_idempotent() {
        let mut viewer = WebViewer::new();
        viewer.set_colors(false);
        viewer.set_colors(false);
        assert!(viewer.overlay_text().contains("Colors: Off"));
        viewer.set_backface_cull(true);
        assert!(viewer.overlay_text().contains("Cull: On"));
    }
}
