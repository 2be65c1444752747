/// Text exports of the working mesh
///
/// Two independent formats: a vertex/face dump wrapped in `[[ ]]`, and a
/// scene-insertion script that assigns one ink index per triangle.
use crate::config::clamp_mesh_id;
use crate::geometry::Mesh;

/// Ink indices cycled by triangle index in the scene-insertion script
pub const INK_PALETTE: [u8; 14] = [44, 43, 42, 41, 40, 39, 38, 37, 38, 39, 40, 41, 42, 43];

/// Fixed six-decimal formatting; negative zero prints as `0.000000`
fn fmt6(x: f64) -> String {
    let rounded = (x * 1e6).round() / 1e6 + 0.0;
    format!("{rounded:.6}")
}

/// Vertex/face export: `[[`, `v` lines, `f` lines (one-based), `]]`
pub fn export_vertex_face(mesh: &Mesh) -> String {
    let mut lines = Vec::with_capacity(mesh.vertices.len() + mesh.triangles.len() + 2);
    lines.push("[[".to_string());
    for v in &mesh.vertices {
        let p = v.position;
        lines.push(format!("v {} {} {}", fmt6(p.x), fmt6(p.y), fmt6(p.z)));
    }
    for t in &mesh.triangles {
        let [a, b, c] = t.one_based();
        lines.push(format!("f {a} {b} {c}"));
    }
    lines.push("]]".to_string());
    lines.join("\n")
}

/// Ink index of every triangle, in mesh order
pub fn ink_indices(triangle_count: usize) -> Vec<u8> {
    (0..triangle_count)
        .map(|i| INK_PALETTE[i % INK_PALETTE.len()])
        .collect()
}

/// Scene-insertion script. Only the triangle count of the mesh is used.
pub fn export_scene_inserter(mesh: &Mesh, mesh_id: i64, backcull: bool) -> String {
    let colors = ink_indices(mesh.triangle_count())
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    [
        "local mesh = instance.new(\"mesh\")".to_string(),
        format!("mesh.meshID = {}", clamp_mesh_id(mesh_id)),
        format!("mesh.backcull = {backcull}"),
        format!("mesh.color = {{ {colors} }}"),
        "setPosition3(mesh,{0,0,0})".to_string(),
        "setSize3(mesh,{1,1,1})".to_string(),
    ]
    .join("\n")
}
