/// Triangle budget enforcement with dense vertex renumbering
use std::collections::HashMap;

use crate::geometry::{Mesh, Triangle};

/// Keep the first `limit` triangles and compact the vertices they use.
///
/// Vertices are renumbered in the order the kept triangles first reference
/// them, so the output has no unused vertices and the triangle order is
/// unchanged. Triangles pointing outside the vertex list are skipped.
pub fn limit_and_reindex(mesh: &Mesh, limit: usize) -> Mesh {
    let kept = mesh.triangles.len().min(limit);
    let mut remap: HashMap<usize, usize> = HashMap::with_capacity(kept * 3);
    let mut out = Mesh::with_capacity(kept.min(mesh.vertices.len()), kept);

    for triangle in mesh.triangles.iter().take(limit) {
        if !triangle.indices.iter().all(|&i| i < mesh.vertices.len()) {
            continue;
        }
        let mut indices = [0usize; 3];
        for (slot, &old) in indices.iter_mut().zip(triangle.indices.iter()) {
            *slot = *remap
                .entry(old)
                .or_insert_with(|| out.add_vertex(mesh.vertices[old]));
        }
        out.add_triangle(Triangle { indices });
    }

    out
}
