//! TriInk Core Library - Mesh processing and software rendering
//!
//! This library provides the stateless core of the viewer: OBJ-style
//! parsing with fan triangulation, triangle-budget reduction, the
//! transform/cull/sort render pipeline and the two text exports.

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod load;
pub mod obj;
pub mod projection;
pub mod reduce;
pub mod render;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{Result, TriinkError};
pub use export::{export_scene_inserter, export_vertex_face, INK_PALETTE};
pub use geometry::{Bounds, Mesh, Triangle, Vec3, Vertex};
pub use load::{LoadReport, LoadedMesh};
pub use obj::{parse_obj, ParseDiagnostic, ParsedMesh, SkipReason};
pub use projection::{Camera, Projected, Viewport};
pub use reduce::limit_and_reindex;
pub use render::{
    render_frame, DrawSurface, Frame, FrameOptions, Rgba, ScreenTriangle, Stroke,
    DISPLAY_PALETTE,
};
pub use transform::{ModelOrientation, Transform};
pub use viewer::{Viewer, ViewerStats};
