/// Mesh loading: read, parse, reduce.
///
/// Reading is the only fallible step. Parsing never fails; skipped lines
/// are counted in the [`LoadReport`].
use std::path::Path;

use crate::config::clamp_triangle_limit;
use crate::error::{Result, TriinkError};
use crate::geometry::Mesh;
use crate::obj::{parse_obj, parse_obj_bytes, ParsedMesh};
use crate::reduce::limit_and_reindex;

/// Counts from one load, before and after reduction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub parsed_vertices: usize,
    pub parsed_triangles: usize,
    pub skipped_lines: usize,
    pub vertices: usize,
    pub triangles: usize,
}

/// A reduced mesh plus the report describing how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMesh {
    pub mesh: Mesh,
    pub report: LoadReport,
}

/// Reduce an already-parsed mesh to `limit` triangles.
///
/// `limit` is clamped to the configured triangle budget range (50..=50000)
/// before reducing, like every other load entry point.
pub fn reduce_parsed(parsed: ParsedMesh, limit: usize) -> LoadedMesh {
    let limit = clamp_triangle_limit(i64::try_from(limit).unwrap_or(i64::MAX));
    let skipped_lines = parsed.skipped_lines();
    if skipped_lines > 0 {
        tracing::warn!(skipped_lines, "skipped malformed mesh lines");
    }
    let raw = parsed.into_mesh();
    let mesh = limit_and_reindex(&raw, limit);
    let report = LoadReport {
        parsed_vertices: raw.vertex_count(),
        parsed_triangles: raw.triangle_count(),
        skipped_lines,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
    };
    tracing::debug!(
        parsed_vertices = report.parsed_vertices,
        parsed_triangles = report.parsed_triangles,
        vertices = report.vertices,
        triangles = report.triangles,
        limit,
        "mesh reduced"
    );
    LoadedMesh { mesh, report }
}

/// Parse and reduce mesh text; `limit` is clamped as in [`reduce_parsed`]
pub fn load_str(text: &str, limit: usize) -> LoadedMesh {
    reduce_parsed(parse_obj(text), limit)
}

/// Parse and reduce UTF-8 bytes; `limit` is clamped as in [`reduce_parsed`]
pub fn load_bytes(data: &[u8], limit: usize) -> Result<LoadedMesh> {
    Ok(reduce_parsed(parse_obj_bytes(data)?, limit))
}

/// Read a mesh file. An empty file yields an empty mesh, not an error.
pub fn load_path(path: impl AsRef<Path>, limit: usize) -> Result<LoadedMesh> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| TriinkError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(&data, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// 62 vertices on a circle, one malformed vertex line and a 60-triangle fan
    fn fan_text() -> String {
        let mut text: String = (0..62)
            .map(|i| {
                let angle = i as f64 * 0.1;
                format!("v {} {} 0\n", angle.cos(), angle.sin())
            })
            .collect();
        text.push_str("v 7 7\n");
        let refs: Vec<String> = (1..=62).map(|i| i.to_string()).collect();
        text.push_str(&format!("f {}\n", refs.join(" ")));
        text
    }

    #[test]
    fn test_load_str_reports_counts() {
        let loaded = load_str(&fan_text(), 55);
        assert_eq!(
            loaded.report,
            LoadReport {
                parsed_vertices: 62,
                parsed_triangles: 60,
                skipped_lines: 1,
                vertices: 56,
                triangles: 55,
            }
        );
    }

    #[test]
    fn test_limit_is_clamped_to_budget_range() {
        let low = load_str(&fan_text(), 1);
        assert_eq!(low.report.triangles, 50);
        assert_eq!(low.report.vertices, 51);

        let quad = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        assert_eq!(load_str(quad, 0).report.triangles, 2);
        assert_eq!(load_bytes(quad.as_bytes(), usize::MAX).unwrap().report.triangles, 2);
    }

    #[test]
    fn test_load_path_distinguishes_empty_from_missing() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let empty = load_path(file.path(), 600).unwrap();
        assert!(empty.mesh.is_empty());
        assert_eq!(empty.report, LoadReport::default());

        let missing = load_path("/no/such/mesh.obj", 600);
        assert!(matches!(missing, Err(TriinkError::Read { .. })));
    }

    #[test]
    fn test_load_path_parses_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let loaded = load_path(file.path(), 600).unwrap();
        assert_eq!(loaded.mesh.triangle_count(), 1);
    }

    #[test]
    fn test_load_bytes_rejects_binary() {
        assert!(matches!(
            load_bytes(&[0xc3, 0x28], 600),
            Err(TriinkError::Encoding(_))
        ));
    }
}
