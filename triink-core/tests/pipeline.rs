use std::collections::HashMap;

use triink_core::{
    export_vertex_face, limit_and_reindex, parse_obj, render_frame, Camera, FrameOptions, Mesh,
    ModelOrientation, Transform, Viewer, ViewerConfig, Viewport,
};

/// A small OBJ with quads, a pentagon, negative references and noise
const SAMPLE: &str = "\
# sample
o thing
v -1.0 -1.0 -1.0
v 1.0 -1.0 -1.0
v 1.0 1.0 -1.0
v -1.0 1.0 -1.0
v -1.0 -1.0 1.0
v 1.0 -1.0 1.0
v 1.0 1.0 1.0
v -1.0 1.0 1.0
vt 0.5 0.5
vn 0 0 1
f 5/1/1 6/1/1 7/1/1 8/1/1
f 1 4 3 2
f -5 -1 -2 -6
v 0.123456789 -2.5 3.14159265
v 0 0 bogus
f 9 1 2 3 4
f 2 3
";

fn sample() -> Mesh {
    parse_obj(SAMPLE).into_mesh()
}

#[test]
fn parsed_indices_are_in_range() {
    let mesh = sample();
    assert_eq!(mesh.vertex_count(), 9);
    // 2 + 2 + 2 + 3
    assert_eq!(mesh.triangle_count(), 9);
    for tri in &mesh.triangles {
        for index in tri.one_based() {
            assert!((1..=mesh.vertex_count()).contains(&index));
        }
    }
}

#[test]
fn negative_reference_is_latest_vertex() {
    let mesh = sample();
    // f -5 -1 -2 -6 with 8 vertices declared -> 4 8 7 3
    assert_eq!(mesh.triangles[4].one_based(), [4, 8, 7]);
    assert_eq!(mesh.triangles[5].one_based(), [4, 7, 3]);
}

#[test]
fn fan_shares_first_vertex() {
    let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 2 1 0\nv 1 2 0\nv 0 1 0\nv -1 0.5 0\nf 1 2 3 4 5 6\n")
        .into_mesh();
    assert_eq!(mesh.triangle_count(), 4);
    assert!(mesh.triangles.iter().all(|t| t.indices[0] == 0));
    for (i, tri) in mesh.triangles.iter().enumerate() {
        assert_eq!(tri.indices[1..], [i + 1, i + 2]);
    }
}

#[test]
fn export_reparse_export_is_identical() {
    let mesh = limit_and_reindex(&sample(), 600);
    let first = export_vertex_face(&mesh);
    let body = first
        .strip_prefix("[[\n")
        .and_then(|s| s.strip_suffix("\n]]"))
        .unwrap();
    let reparsed = parse_obj(body);
    assert_eq!(reparsed.diagnostics().count(), 0);
    assert_eq!(reparsed.mesh.vertex_count(), mesh.vertex_count());
    assert_eq!(reparsed.mesh.triangles, mesh.triangles);
    assert_eq!(export_vertex_face(&reparsed.mesh), first);
}

#[test]
fn markers_are_ignored_by_parser() {
    let mesh = limit_and_reindex(&sample(), 600);
    let reparsed = parse_obj(&export_vertex_face(&mesh));
    assert_eq!(reparsed.mesh.triangles, mesh.triangles);
}

#[test]
fn reduce_with_large_limit_is_isomorphic() {
    let mesh = sample();
    let reduced = limit_and_reindex(&mesh, mesh.triangle_count());
    assert_eq!(reduced.triangle_count(), mesh.triangle_count());

    // Build the renumbering and check it is a bijection on used vertices
    let mut forward: HashMap<usize, usize> = HashMap::new();
    for (a, b) in mesh.triangles.iter().zip(&reduced.triangles) {
        for (&old, &new) in a.indices.iter().zip(&b.indices) {
            let mapped = *forward.entry(old).or_insert(new);
            assert_eq!(mapped, new);
            assert_eq!(mesh.vertices[old], reduced.vertices[new]);
        }
    }
    let mut targets: Vec<_> = forward.values().copied().collect();
    targets.sort_unstable();
    targets.dedup();
    assert_eq!(targets.len(), forward.len());
    assert_eq!(targets.len(), reduced.vertex_count());
}

#[test]
fn reduce_is_idempotent() {
    for limit in [1, 3, 7, 100] {
        let once = limit_and_reindex(&sample(), limit);
        assert_eq!(limit_and_reindex(&once, limit), once);
    }
}

#[test]
fn limit_one_on_shared_edge_mesh() {
    let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 2 4 3\n").into_mesh();
    let reduced = limit_and_reindex(&mesh, 1);
    assert_eq!(reduced.vertex_count(), 3);
    assert_eq!(reduced.triangle_count(), 1);
    assert_eq!(reduced.triangles[0].one_based(), [1, 2, 3]);
}

#[test]
fn frame_depths_are_non_increasing_from_any_angle() {
    let mesh = sample();
    let viewport = Viewport::new(640.0, 480.0);
    let mut camera = Camera::new(60.0);
    camera.position.z = 6.0;
    for step in 0..12 {
        let orientation = ModelOrientation::new(step as f64 * 0.55, step as f64 * 0.1 - 0.6);
        let frame = render_frame(
            &mesh,
            &camera,
            &orientation,
            FrameOptions::default(),
            &viewport,
        );
        assert!(frame.triangles.windows(2).all(|w| w[0].depth >= w[1].depth));
        assert_eq!(frame.triangles.len(), mesh.triangle_count());
    }
}

#[test]
fn culling_keeps_every_front_facing_triangle() {
    let mesh = sample();
    let viewport = Viewport::new(640.0, 480.0);
    let mut camera = Camera::new(60.0);
    camera.position.z = 6.0;
    let orientation = ModelOrientation::new(0.4, 0.3);
    let frame = render_frame(
        &mesh,
        &camera,
        &orientation,
        FrameOptions {
            backface_cull: true,
            colors: true,
        },
        &viewport,
    );

    let rotation = orientation.rotation();
    let front_facing: Vec<usize> = mesh
        .triangles
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            let [a, b, c] = t
                .indices
                .map(|i| camera.to_camera_space(&(rotation * mesh.vertices[i].position)));
            Transform::face_normal(&a, &b, &c).z < 0.0
        })
        .map(|(i, _)| i)
        .collect();

    let mut emitted: Vec<usize> = frame.triangles.iter().map(|t| t.source).collect();
    emitted.sort_unstable();
    assert_eq!(emitted, front_facing);
    assert_eq!(
        frame.stats.backface_culled,
        mesh.triangle_count() - front_facing.len()
    );
}

#[test]
fn viewer_load_then_export_scenario() {
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.load_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    assert_eq!(
        viewer.export_vertex_face(),
        "[[\nv 0.000000 0.000000 0.000000\nv 1.000000 0.000000 0.000000\nv 0.000000 1.000000 0.000000\nf 1 2 3\n]]"
    );
    assert_eq!(
        viewer.export_scene_inserter(),
        "local mesh = instance.new(\"mesh\")\nmesh.meshID = 7\nmesh.backcull = false\nmesh.color = { 44 }\nsetPosition3(mesh,{0,0,0})\nsetSize3(mesh,{1,1,1})"
    );
}
